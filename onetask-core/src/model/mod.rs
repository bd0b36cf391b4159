//! Wire types for the OneTask REST contract

pub mod proposal;
pub mod task;
pub mod user;

pub use proposal::{Proposal, ProposalCreation, ProposalId, ReceivedProposal};
pub use task::{Task, TaskCreation, TaskId, TaskStatus, TaskType};
pub use user::{LoginStatus, ProfileUpdate, Registration, Role, UserId, UserProfile};
