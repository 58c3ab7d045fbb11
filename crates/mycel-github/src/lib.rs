// crates/mycel-github/src/lib.rs
//
// mycel-github: GitHub REST collaboration source for Mycel.
//
// Lists an organization's repositories, members, closed pull requests, and
// approving reviews. Every listing is a lazy stream that follows the `Link`
// header one page at a time, so a consumer that stops early never fetches
// the remaining pages.

pub mod client;
pub mod pagination;
pub mod payloads;

pub use client::{GitHubClient, GitHubConfig, DEFAULT_API_BASE_URL};
