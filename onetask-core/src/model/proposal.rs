//! Proposal records
//!
//! A proposal is a freelancer's bid to perform a specific task. The
//! backend keys proposals by their own id; the client mostly works with
//! the (task, freelancer) pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::task::TaskId;
use super::user::UserId;

/// Unique proposal identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub i32);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A proposal as listed by `GET /rest/proposals`
///
/// `id` is absent on locally cached entries when the create response
/// carried no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProposalId>,
    pub task_id: TaskId,
    pub freelancer_id: UserId,
}

/// Payload for `POST /rest/proposals`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalCreation {
    pub task_id: TaskId,
    pub freelancer_id: UserId,
}

/// A proposal on an owned task, enriched client-side with the task title
/// and the freelancer's display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedProposal {
    pub id: Option<ProposalId>,
    pub task_id: TaskId,
    pub freelancer_id: UserId,
    pub task_title: String,
    pub freelancer_username: String,
}
