// crates/mycel-reputation/src/ingest.rs
//
// Drives a CollaborationSource into a SignalAggregator.
//
// Repositories are scanned concurrently; each scan produces its own event
// list which is folded into the aggregator as it completes. Capping the
// number of repositories drops the repository stream early, which yields a
// smaller but still valid graph.

use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use mycel_core::{CollaborationEvent, CollaborationSource, MycelError, Repository, Username};

use crate::signals::{events_for_pull_request, SignalAggregator};

/// Tuning for signal collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Stop after this many repositories. `None` scans all of them.
    pub max_repos: Option<usize>,
    /// Repositories scanned at once. Values below 1 are treated as 1.
    pub concurrency: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_repos: None,
            concurrency: 4,
        }
    }
}

/// Collect trust and activity signals for a whole organization.
///
/// `members` are seeded with no activity before any event is applied so a
/// silent member is still represented. Any source error aborts collection.
pub async fn collect_signals<S>(
    source: &S,
    members: &[Username],
    now: DateTime<Utc>,
    options: &IngestOptions,
) -> Result<SignalAggregator, MycelError>
where
    S: CollaborationSource + ?Sized,
{
    let mut aggregator = SignalAggregator::new(now);
    aggregator.seed_members(members);

    let repos = source.repositories();
    let repos = match options.max_repos {
        Some(limit) => repos.take(limit).boxed(),
        None => repos,
    };

    let mut scans = repos
        .map_ok(|repo| scan_repository(source, repo))
        .try_buffer_unordered(options.concurrency.max(1));

    let mut scanned = 0usize;
    while let Some((repo, events)) = scans.try_next().await? {
        tracing::debug!("Scanned {}: {} events", repo.name, events.len());
        aggregator.apply_all(&events)?;
        scanned += 1;
    }

    tracing::info!(
        "Collected signals from {} repositories: {} trust edges, {} active identities",
        scanned,
        aggregator.graph.len(),
        aggregator.activity.len()
    );

    Ok(aggregator)
}

async fn scan_repository<S>(
    source: &S,
    repo: Repository,
) -> Result<(Repository, Vec<CollaborationEvent>), MycelError>
where
    S: CollaborationSource + ?Sized,
{
    tracing::info!("Scanning {}", repo.name);
    let mut events = Vec::new();
    let mut pulls = source.closed_pull_requests(&repo.name);
    while let Some(pr) = pulls.try_next().await? {
        let reviews = if pr.is_merged() {
            source
                .approved_reviews(&repo.name, pr.number)
                .try_collect::<Vec<_>>()
                .await?
        } else {
            Vec::new()
        };
        events.extend(events_for_pull_request(&repo.name, &pr, &reviews));
    }
    drop(pulls);
    Ok((repo, events))
}
