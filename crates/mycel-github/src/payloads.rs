// crates/mycel-github/src/payloads.rs
//
// Wire shapes of the GitHub REST API, and their conversion into the typed
// records the rest of the workspace consumes. Only the fields we use are
// declared; everything else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use mycel_core::{Member, PullRequest, Repository, Review};

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub name: String,
}

impl RepoPayload {
    pub fn into_record(self) -> Option<Repository> {
        Some(Repository { name: self.name })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    pub login: String,
}

impl MemberPayload {
    pub fn into_record(self) -> Option<Member> {
        Some(Member {
            username: self.login,
        })
    }
}

/// A pull request as returned by both the list and the detail endpoint.
/// `merged_by` is only populated by the detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PullPayload {
    pub number: u64,
    pub user: Option<UserPayload>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_by: Option<UserPayload>,
}

impl PullPayload {
    /// `None` for pull requests whose author account no longer exists.
    pub fn into_record(self) -> Option<PullRequest> {
        let Some(author) = self.user else {
            tracing::debug!("Skipping pull request #{} with no author", self.number);
            return None;
        };
        Some(PullRequest {
            number: self.number,
            author: author.login,
            created_at: self.created_at,
            merged_at: self.merged_at,
            merged_by: self.merged_by.map(|u| u.login),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPayload {
    pub user: Option<UserPayload>,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ReviewPayload {
    /// `Some` only for approvals by an existing account.
    pub fn into_record(self) -> Option<Review> {
        if self.state != "APPROVED" {
            return None;
        }
        Some(Review {
            reviewer: self.user?.login,
            submitted_at: self.submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_without_merge_fields_parses() {
        let json = r#"{
            "number": 12,
            "user": {"login": "bob", "id": 2},
            "created_at": "2024-02-01T10:00:00Z",
            "merged_at": null,
            "title": "ignored"
        }"#;
        let payload: PullPayload = serde_json::from_str(json).unwrap();
        let pr = payload.into_record().unwrap();
        assert_eq!(pr.number, 12);
        assert_eq!(pr.author, "bob");
        assert!(!pr.is_merged());
        assert_eq!(pr.merged_by, None);
    }

    #[test]
    fn merged_pull_detail_carries_merger() {
        let json = r#"{
            "number": 3,
            "user": {"login": "carol"},
            "created_at": "2024-02-01T10:00:00Z",
            "merged_at": "2024-02-02T10:00:00Z",
            "merged_by": {"login": "alice"}
        }"#;
        let pr = serde_json::from_str::<PullPayload>(json)
            .unwrap()
            .into_record()
            .unwrap();
        assert!(pr.is_merged());
        assert_eq!(pr.merged_by.as_deref(), Some("alice"));
    }

    #[test]
    fn ghost_author_is_dropped() {
        let json = r#"{"number": 1, "user": null, "created_at": "2024-02-01T10:00:00Z", "merged_at": null}"#;
        let payload: PullPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_record().is_none());
    }

    #[test]
    fn only_approvals_become_reviews() {
        let reviews: Vec<ReviewPayload> = serde_json::from_str(
            r#"[
                {"user": {"login": "dave"}, "state": "APPROVED", "submitted_at": "2024-03-01T00:00:00Z"},
                {"user": {"login": "erin"}, "state": "CHANGES_REQUESTED", "submitted_at": "2024-03-01T00:00:00Z"},
                {"user": {"login": "fay"}, "state": "APPROVED"},
                {"user": null, "state": "APPROVED", "submitted_at": "2024-03-01T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        let approvals: Vec<Review> = reviews
            .into_iter()
            .filter_map(ReviewPayload::into_record)
            .collect();
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals[0].reviewer, "dave");
        assert!(approvals[0].submitted_at.is_some());
        assert_eq!(approvals[1].reviewer, "fay");
        assert!(approvals[1].submitted_at.is_none());
    }
}
