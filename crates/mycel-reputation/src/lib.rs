// crates/mycel-reputation/src/lib.rs
//
// mycel-reputation: Decayed trust graph, activity registry, signal ingestion,
// and OpenRank for Mycel.
//
// Collaboration signals (reviews, merges) become directed trust edges whose
// weight halves for every full year since the signal. The resulting graph is
// ranked relative to a single seed identity.

pub mod activity;
pub mod decay;
pub mod ingest;
pub mod openrank;
pub mod signals;
pub mod trust_graph;

pub use activity::ActivityRegistry;
pub use ingest::{collect_signals, IngestOptions};
pub use openrank::{OpenRank, OpenRankConfig};
pub use signals::{events_for_pull_request, SignalAggregator};
pub use trust_graph::TrustGraphBuilder;
