// crates/mycel-core/src/lib.rs
//
// mycel-core: Core types, errors, and collaborator traits for Mycel.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the decision-time data model, the typed records a collaboration
// source yields, the error enum, and the trait seams for the data source and
// the trust ranking oracle.

pub mod decision;
pub mod error;
pub mod event;
pub mod identity;
pub mod records;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use mycel_core::Decision;`

// Identity types
pub use identity::{LastActive, Username};

// Event types
pub use event::{CollaborationEvent, EventKind, TrustAssignment};

// Collaborator records
pub use records::{Member, PullRequest, Repository, Review};

// Decision types
pub use decision::{Decision, DecisionAction, Person, RemovalReason};

// Error type
pub use error::MycelError;

// Traits
pub use traits::{CollaborationSource, RecordStream, ScoreMap, TrustRankingOracle};
