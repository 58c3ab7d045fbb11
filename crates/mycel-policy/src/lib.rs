// crates/mycel-policy/src/lib.rs
//
// mycel-policy: Membership policy engine and evaluation pipeline for Mycel.
//
// Combines propagated trust, last-seen activity, and the current roster into
// an ordered list of proposed ADD/REMOVE actions. Nothing here mutates the
// roster; execution is left to the operator.

pub mod config;
pub mod engine;
pub mod persons;
pub mod pipeline;

pub use config::PolicyConfig;
pub use engine::{DecisionSet, MembershipPolicyEngine};
pub use persons::build_persons;
pub use pipeline::{evaluate, Evaluation, RunOutcome};
