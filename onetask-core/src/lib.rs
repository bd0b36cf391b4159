//! OneTask Core Library
//!
//! Wire-level types for the OneTask freelance marketplace:
//! - Domain records (tasks, proposals, user profiles) as the REST
//!   backend serializes them
//! - Request payloads for registration, task posting and proposals
//! - HTTP Basic credential encoding; the encoded header value is also
//!   the opaque auth token the client persists and replays

pub mod credentials;
pub mod error;
pub mod model;

pub use credentials::{basic_credentials, decode_basic};
pub use error::Error;
pub use model::{
    LoginStatus, ProfileUpdate, Proposal, ProposalCreation, ProposalId, ReceivedProposal,
    Registration, Role, Task, TaskCreation, TaskId, TaskStatus, TaskType, UserId, UserProfile,
};

/// Result type for onetask-core operations
pub type Result<T> = std::result::Result<T, Error>;
