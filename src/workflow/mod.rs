//! Workflow module
//!
//! Ledger-executed business logic for the bike-share network: asset types,
//! world state access, and the org-gated operation engine.

pub mod assets;
pub mod engine;
pub mod error;
pub mod state;

pub use assets::{Bike, BikeStatus, DocType, Issue, IssueStatus, Repair, RepairStatus, Repairer, Ride, RideStatus, User, UserStatus};
pub use engine::{Caller, WorkflowEngine};
pub use error::{AssetKind, WorkflowError, WorkflowResult};
pub use state::{MemoryStateStore, StateStore};
