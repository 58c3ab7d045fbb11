// crates/mycel-github/src/client.rs
//
// GitHub REST client implementing CollaborationSource.
// Uses reqwest to talk to the GitHub API (or a compatible Enterprise host).

use std::fmt;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use mycel_core::{
    CollaborationSource, Member, MycelError, PullRequest, RecordStream, Repository, Review,
};

use crate::pagination::next_page_url;
use crate::payloads::{MemberPayload, PullPayload, RepoPayload, ReviewPayload};

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;

/// Connection settings for one organization.
#[derive(Clone)]
pub struct GitHubConfig {
    /// Base URL of the REST API (e.g., "https://api.github.com").
    pub api_base_url: String,
    /// Organization login.
    pub org: String,
    /// Bearer token. Never logged.
    pub token: String,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_base_url", &self.api_base_url)
            .field("org", &self.org)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// GitHub collaboration source for a single organization.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    config: GitHubConfig,
    /// HTTP client instance.
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a client for the organization in `config`.
    pub fn new(mut config: GitHubConfig) -> Result<Self, MycelError> {
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("mycel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MycelError::Network(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn repos_url(&self) -> String {
        format!(
            "{}/orgs/{}/repos?type=sources&per_page={}",
            self.config.api_base_url, self.config.org, PER_PAGE
        )
    }

    fn members_url(&self) -> String {
        format!(
            "{}/orgs/{}/members?per_page={}",
            self.config.api_base_url, self.config.org, PER_PAGE
        )
    }

    fn pulls_url(&self, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/pulls?state=closed&per_page={}",
            self.config.api_base_url, self.config.org, repo, PER_PAGE
        )
    }

    fn pull_url(&self, repo: &str, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.config.api_base_url, self.config.org, repo, number
        )
    }

    fn reviews_url(&self, repo: &str, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/reviews?per_page={}",
            self.config.api_base_url, self.config.org, repo, number, PER_PAGE
        )
    }

    /// GET `url` and map transport and status failures onto `MycelError`.
    async fn get(&self, url: &str) -> Result<reqwest::Response, MycelError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .send()
            .await
            .map_err(|e| MycelError::Network(format!("GitHub request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(MycelError::Authentication(
                "GitHub API authentication failed - check the token".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MycelError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }

    async fn fetch_one<P: DeserializeOwned>(&self, url: &str) -> Result<P, MycelError> {
        let response = self.get(url).await?;
        response
            .json::<P>()
            .await
            .map_err(|e| MycelError::Serialization(format!("GitHub response from {}: {}", url, e)))
    }

    /// Fetch one page and the URL of the page after it, if any.
    async fn fetch_page<P: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<(Vec<P>, Option<String>), MycelError> {
        let response = self.get(url).await?;
        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);
        let page = response
            .json::<Vec<P>>()
            .await
            .map_err(|e| MycelError::Serialization(format!("GitHub page from {}: {}", url, e)))?;
        Ok((page, next))
    }

    /// Lazily walk every page starting at `first_url`, converting each item
    /// and dropping those `convert` rejects.
    fn paginate<'a, P, T>(
        &'a self,
        first_url: String,
        convert: fn(P) -> Option<T>,
    ) -> RecordStream<'a, T>
    where
        P: DeserializeOwned + Send + 'a,
        T: Send + 'a,
    {
        stream::try_unfold(Some(first_url), move |next| async move {
            let Some(url) = next else {
                return Ok(None);
            };
            let (page, next) = self.fetch_page::<P>(&url).await?;
            Ok::<_, MycelError>(Some((page, next)))
        })
        .map_ok(move |page: Vec<P>| stream::iter(page.into_iter().filter_map(convert).map(Ok)))
        .try_flatten()
        .boxed()
    }

    /// The list endpoint omits the merger; fetch the pull request itself.
    async fn resolve_merger(
        &self,
        repo: &str,
        mut pr: PullRequest,
    ) -> Result<PullRequest, MycelError> {
        let detail: PullPayload = self.fetch_one(&self.pull_url(repo, pr.number)).await?;
        pr.merged_by = detail.merged_by.map(|user| user.login);
        Ok(pr)
    }
}

impl CollaborationSource for GitHubClient {
    fn repositories(&self) -> RecordStream<'_, Repository> {
        self.paginate(self.repos_url(), RepoPayload::into_record)
    }

    fn members(&self) -> RecordStream<'_, Member> {
        self.paginate(self.members_url(), MemberPayload::into_record)
    }

    fn closed_pull_requests<'a>(&'a self, repo: &'a str) -> RecordStream<'a, PullRequest> {
        self.paginate(self.pulls_url(repo), PullPayload::into_record)
            .and_then(move |pr| async move {
                if pr.is_merged() && pr.merged_by.is_none() {
                    self.resolve_merger(repo, pr).await
                } else {
                    Ok(pr)
                }
            })
            .boxed()
    }

    fn approved_reviews<'a>(&'a self, repo: &'a str, number: u64) -> RecordStream<'a, Review> {
        self.paginate(self.reviews_url(repo, number), ReviewPayload::into_record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Status, extra header lines, and JSON body for one mock reply.
    type Reply = (u16, String, String);

    fn client() -> GitHubClient {
        GitHubClient::new(GitHubConfig {
            api_base_url: "https://ghe.example.com/api/v3/".to_string(),
            org: "acme".to_string(),
            token: "ghp_secret".to_string(),
        })
        .unwrap()
    }

    fn client_for(base_url: &str) -> GitHubClient {
        GitHubClient::new(GitHubConfig {
            api_base_url: base_url.to_string(),
            org: "acme".to_string(),
            token: "t".to_string(),
        })
        .unwrap()
    }

    /// Helper to start a mock GitHub server. `handler` receives the base URL
    /// and the request target and picks the reply. Each connection serves a
    /// single request and is then closed. Returns the base URL and a counter
    /// of requests served.
    async fn mock_github_server<F>(handler: F) -> (String, Arc<AtomicUsize>)
    where
        F: Fn(&str, &str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);
        let hits = Arc::new(AtomicUsize::new(0));

        let server_base = base_url.clone();
        let server_hits = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                server_hits.fetch_add(1, Ordering::SeqCst);

                let (status, headers, body) = handler(&server_base, &target);
                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
                    status,
                    body.len(),
                    headers,
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (base_url, hits)
    }

    /// Two pages of repositories joined by a `Link` header.
    fn paged_repos(base: &str, target: &str) -> Reply {
        if target.contains("page=2") {
            (200, String::new(), r#"[{"name":"r3"}]"#.to_string())
        } else {
            let link = format!(
                "Link: <{}/orgs/acme/repos?type=sources&per_page=100&page=2>; rel=\"next\", <{}/orgs/acme/repos?type=sources&per_page=100&page=2>; rel=\"last\"\r\n",
                base, base
            );
            (200, link, r#"[{"name":"r1"},{"name":"r2"}]"#.to_string())
        }
    }

    #[test]
    fn urls_are_built_against_trimmed_base() {
        let c = client();
        assert_eq!(
            c.repos_url(),
            "https://ghe.example.com/api/v3/orgs/acme/repos?type=sources&per_page=100"
        );
        assert_eq!(
            c.pulls_url("widgets"),
            "https://ghe.example.com/api/v3/repos/acme/widgets/pulls?state=closed&per_page=100"
        );
        assert_eq!(
            c.reviews_url("widgets", 9),
            "https://ghe.example.com/api/v3/repos/acme/widgets/pulls/9/reviews?per_page=100"
        );
        assert_eq!(
            c.pull_url("widgets", 9),
            "https://ghe.example.com/api/v3/repos/acme/widgets/pulls/9"
        );
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_a_network_error() {
        let c = client_for("http://127.0.0.1:9");
        let first = c.repositories().next().await;
        assert!(matches!(first, Some(Err(MycelError::Network(_)))));
    }

    #[tokio::test]
    async fn pagination_follows_link_header() {
        let (base_url, hits) = mock_github_server(paged_repos).await;
        let c = client_for(&base_url);

        let repos: Vec<Repository> = c.repositories().try_collect().await.unwrap();
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["r1", "r2", "r3"]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropping_the_stream_stops_fetching_pages() {
        let (base_url, hits) = mock_github_server(paged_repos).await;
        let c = client_for(&base_url);

        let first: Vec<Repository> = c.repositories().take(1).try_collect().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "r1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_error() {
        let (base_url, _hits) = mock_github_server(|_, _| {
            (401, String::new(), r#"{"message":"Bad credentials"}"#.to_string())
        })
        .await;
        let c = client_for(&base_url);

        let first = c.members().next().await;
        assert!(matches!(first, Some(Err(MycelError::Authentication(_)))));
    }

    #[tokio::test]
    async fn other_failures_map_to_api_error_with_status() {
        let (base_url, _hits) = mock_github_server(|_, _| {
            (404, String::new(), r#"{"message":"Not Found"}"#.to_string())
        })
        .await;
        let c = client_for(&base_url);

        match c.repositories().next().await {
            Some(Err(MycelError::Api { status, message })) => {
                assert_eq!(status, 404);
                assert!(message.contains("Not Found"));
            }
            other => panic!("expected Api error, got {:?}", other),
        };
    }

    #[tokio::test]
    async fn merged_pull_request_gets_merger_from_detail_endpoint() {
        let (base_url, hits) = mock_github_server(|_, target| {
            let path = target.split('?').next().unwrap_or(target);
            match path {
                "/repos/acme/widgets/pulls" => (
                    200,
                    String::new(),
                    r#"[
                        {"number":7,"user":{"login":"bob"},"created_at":"2025-01-02T00:00:00Z",
                         "merged_at":"2025-01-03T00:00:00Z"},
                        {"number":8,"user":{"login":"carol"},"created_at":"2025-01-04T00:00:00Z",
                         "merged_at":null}
                    ]"#
                    .to_string(),
                ),
                "/repos/acme/widgets/pulls/7" => (
                    200,
                    String::new(),
                    r#"{"number":7,"user":{"login":"bob"},"created_at":"2025-01-02T00:00:00Z",
                        "merged_at":"2025-01-03T00:00:00Z","merged_by":{"login":"alice"}}"#
                        .to_string(),
                ),
                _ => (404, String::new(), r#"{"message":"Not Found"}"#.to_string()),
            }
        })
        .await;
        let c = client_for(&base_url);

        let pulls: Vec<PullRequest> = c.closed_pull_requests("widgets").try_collect().await.unwrap();
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].number, 7);
        assert_eq!(pulls[0].merged_by.as_deref(), Some("alice"));
        assert_eq!(pulls[1].number, 8);
        assert!(pulls[1].merged_by.is_none());
        // List page plus one detail fetch; the unmerged pull request is not looked up.
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
