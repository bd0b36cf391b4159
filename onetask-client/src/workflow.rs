//! Proposal workflow controller
//!
//! Coordinates the owner/freelancer interaction around proposals: an
//! owner lists incoming proposals on their tasks, picks exactly one
//! freelancer per task, and commits that assignment; a freelancer
//! submits proposals with an advisory duplicate guard.
//!
//! Assignment state machine, per task:
//! `OPEN (no selection) -> SELECTED -> COMMITTED | REJECTED`.
//! SELECTED may be re-entered with a different freelancer any time
//! before commit; COMMITTED and REJECTED are terminal for that attempt.

use std::collections::{BTreeMap, HashMap, HashSet};

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use onetask_core::{Proposal, ProposalCreation, ReceivedProposal, Task, TaskId, UserId};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::Session;
use crate::Result;

/// Outcome of one assignment confirmation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Committed,
    Rejected { reason: String },
}

pub struct ProposalWorkflow {
    api: ApiClient,
    session: Session,
    /// Owner-side, ephemeral: the chosen freelancer per task
    selection: HashMap<TaskId, UserId>,
    /// Freelancer-side advisory cache of own proposals; populated once
    /// at load time, never re-synced
    sent: Vec<Proposal>,
}

impl ProposalWorkflow {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            selection: HashMap::new(),
            sent: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Seed the sent-proposal cache: the full collection filtered to the
    /// session's own proposals, as the task-detail view does at load
    pub async fn load_sent_proposals(&mut self) -> Result<()> {
        let all = self.api.proposals(&self.session.auth_token).await?;
        self.sent = all
            .into_iter()
            .filter(|p| p.freelancer_id == self.session.user_id)
            .collect();
        debug!(count = self.sent.len(), "sent-proposal cache seeded");
        Ok(())
    }

    pub fn sent_proposals(&self) -> &[Proposal] {
        &self.sent
    }

    /// Unexpired tasks posted by the session's owner
    pub async fn owned_tasks(&self) -> Result<Vec<Task>> {
        self.api.posted_tasks(&self.session.auth_token, false).await
    }

    /// Incoming proposals on owned tasks, grouped by task
    ///
    /// Fetches the owned tasks and the full proposal collection,
    /// intersects on task id client-side, then resolves each retained
    /// proposal's task title and freelancer name. The 2k lookups run as
    /// one concurrent batch with an all-or-nothing barrier: any failure
    /// fails the whole listing, and in-flight siblings are dropped with
    /// it. No owned tasks yields an empty map.
    pub async fn received_proposals(&self) -> Result<BTreeMap<TaskId, Vec<ReceivedProposal>>> {
        let owned = self.owned_tasks().await?;
        let proposals = self.api.proposals(&self.session.auth_token).await?;

        let owned_ids: HashSet<TaskId> = owned.iter().map(|t| t.id).collect();
        let retained: Vec<Proposal> = proposals
            .into_iter()
            .filter(|p| owned_ids.contains(&p.task_id))
            .collect();

        let enriched = try_join_all(retained.into_iter().map(|p| self.enrich(p))).await?;

        let mut grouped: BTreeMap<TaskId, Vec<ReceivedProposal>> = BTreeMap::new();
        for proposal in enriched {
            grouped.entry(proposal.task_id).or_default().push(proposal);
        }
        Ok(grouped)
    }

    async fn enrich(&self, proposal: Proposal) -> Result<ReceivedProposal> {
        let (task, freelancer) = tokio::try_join!(
            self.api.task(proposal.task_id),
            self.api.user(proposal.freelancer_id),
        )?;
        Ok(ReceivedProposal {
            id: proposal.id,
            task_id: proposal.task_id,
            freelancer_id: proposal.freelancer_id,
            task_title: task.title,
            freelancer_username: freelancer.username,
        })
    }

    /// Record the owner's choice for a task
    ///
    /// Radio semantics: one freelancer per task, re-selection overwrites
    /// the prior choice.
    pub fn select_freelancer(&mut self, task_id: TaskId, freelancer_id: UserId) {
        debug!(%task_id, %freelancer_id, "freelancer selected");
        self.selection.insert(task_id, freelancer_id);
    }

    pub fn selected(&self, task_id: TaskId) -> Option<UserId> {
        self.selection.get(&task_id).copied()
    }

    /// Commit the recorded choice for a task
    ///
    /// With no selection the attempt is rejected locally and no request
    /// is issued. A committed assignment consumes the selection; a
    /// rejected one leaves it in place, and nothing is retried here.
    pub async fn confirm_assignment(&mut self, task_id: TaskId) -> AssignmentOutcome {
        let Some(freelancer_id) = self.selected(task_id) else {
            return AssignmentOutcome::Rejected {
                reason: "select a freelancer first".to_string(),
            };
        };

        match self
            .api
            .assign_freelancer(&self.session.auth_token, task_id, freelancer_id)
            .await
        {
            Ok(()) => {
                self.selection.remove(&task_id);
                info!(%task_id, %freelancer_id, "assignment committed");
                AssignmentOutcome::Committed
            }
            Err(e) => {
                warn!(%task_id, %freelancer_id, error = %e, "assignment rejected");
                AssignmentOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Submit a proposal for a task as the session's freelancer
    ///
    /// Advisory de-duplication: a cached proposal for the same task
    /// rejects locally without touching the network. The cache is not
    /// authoritative; the backend remains the source of truth.
    pub async fn send_proposal(&mut self, task_id: TaskId) -> Result<Proposal> {
        if self.sent.iter().any(|p| p.task_id == task_id) {
            return Err(ClientError::AlreadyApplied);
        }

        let creation = ProposalCreation {
            task_id,
            freelancer_id: self.session.user_id,
        };
        let id = self
            .api
            .create_proposal(&self.session.auth_token, &creation)
            .await?;

        let proposal = Proposal {
            id,
            task_id,
            freelancer_id: self.session.user_id,
        };
        self.sent.push(proposal.clone());
        info!(%task_id, id = ?proposal.id, "proposal sent");
        Ok(proposal)
    }
}
