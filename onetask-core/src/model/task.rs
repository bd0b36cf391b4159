//! Task records as the backend serializes them

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;
use crate::error::Error;

/// Unique task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub i32);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a task
///
/// The client only ever branches on `Unassigned`/`Assigned`; the later
/// states exist so server responses for submitted work still parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Unassigned,
    Assigned,
    Submitted,
    Accepted,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Unassigned => "UNASSIGNED",
            TaskStatus::Assigned => "ASSIGNED",
            TaskStatus::Submitted => "SUBMITTED",
            TaskStatus::Accepted => "ACCEPTED",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "UNASSIGNED" => Ok(TaskStatus::Unassigned),
            "ASSIGNED" => Ok(TaskStatus::Assigned),
            "SUBMITTED" => Ok(TaskStatus::Submitted),
            "ACCEPTED" => Ok(TaskStatus::Accepted),
            other => Err(Error::UnknownTaskStatus(other.to_string())),
        }
    }
}

/// Category of work a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    TranslationAndLanguageServices,
    DataEntryAndVirtualAssistance,
    ConsultingAndBusinessServices,
    CreativeAndArtisticServices,
    GraphicDesignAndMultimedia,
    EngineeringAndArchitecture,
    WritingAndContentCreation,
    ProgrammingAndDevelopment,
    GamingAndVrArDevelopment,
    TutoringAndEducation,
    SalesAndMarketing,
    DigitalMarketing,
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| Error::UnknownTaskType(s.to_string()))
    }
}

/// A task as returned by the backend read endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub problem: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub deadline: DateTime<Utc>,
    pub payment: f64,
    pub status: TaskStatus,
    #[serde(default)]
    pub customer_id: Option<UserId>,
    #[serde(default)]
    pub customer_username: Option<String>,
    #[serde(default)]
    pub freelancer_id: Option<UserId>,
    #[serde(default)]
    pub freelancer_username: Option<String>,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_date: Option<DateTime<Utc>>,
}

/// Payload for posting a new task
///
/// The backend takes the customer from the auth principal, so
/// `customer_id` is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    pub title: String,
    pub problem: String,
    pub deadline: DateTime<Utc>,
    pub task_status: TaskStatus,
    pub payment: f64,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}
