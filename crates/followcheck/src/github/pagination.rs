//! Paginated listing collection.
//!
//! Drains a followers/following endpoint to exhaustion one page at a time.
//! Completion is inferred purely from a short page: the listing endpoints
//! provide no trustworthy total up front, so a page shorter than the fixed
//! page size is terminal and a full page means another may exist.

use std::time::Duration;

use crate::analysis::progress::{emit, AnalysisProgress, ListKind, ProgressFn};

use super::client::{followers_route, following_route, GitHubClient};
use super::error::GitHubError;
use super::types::{Account, LOW_QUOTA_COOLDOWN_MS, LOW_QUOTA_THRESHOLD, PER_PAGE};

/// Configuration for draining one listing.
pub struct ListConfig<'a> {
    /// Which listing this walk drains.
    pub kind: ListKind,
    /// Function building the API route for a page number.
    route_fn: Box<dyn Fn(u32) -> String + Send + Sync + 'a>,
    /// Expected total items (from the resolved profile), for progress
    /// estimation only. Never used for termination.
    pub expected_total: Option<usize>,
}

impl<'a> ListConfig<'a> {
    /// Configuration for a user's followers list.
    pub fn followers(login: &'a str, expected_total: Option<usize>) -> Self {
        Self {
            kind: ListKind::Followers,
            route_fn: Box::new(move |page| followers_route(login, page)),
            expected_total,
        }
    }

    /// Configuration for the accounts a user follows.
    pub fn following(login: &'a str, expected_total: Option<usize>) -> Self {
        Self {
            kind: ListKind::Following,
            route_fn: Box::new(move |page| following_route(login, page)),
            expected_total,
        }
    }

    /// Build the route for a page number.
    #[must_use]
    pub fn route(&self, page: u32) -> String {
        (self.route_fn)(page)
    }
}

impl GitHubClient {
    /// Drain a listing to completion, accumulating accounts in encounter
    /// order.
    ///
    /// Emits one `FetchedPage` event per page with a non-decreasing running
    /// total. After a non-terminal page, if the latest tracker snapshot
    /// shows fewer than [`LOW_QUOTA_THRESHOLD`] remaining requests, pauses
    /// for [`LOW_QUOTA_COOLDOWN_MS`] before the next request; the terminal
    /// return is never delayed.
    ///
    /// Any single-page failure aborts the whole collection; partial results
    /// are discarded by construction.
    pub async fn collect_all(
        &self,
        config: &ListConfig<'_>,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<Vec<Account>, GitHubError> {
        let mut all: Vec<Account> = Vec::new();
        let mut page = 1u32;

        emit(
            on_progress,
            AnalysisProgress::FetchingList {
                kind: config.kind,
                expected_total: config.expected_total,
            },
        );

        loop {
            let accounts: Vec<Account> = self.get_json(&config.route(page)).await?;
            let count = accounts.len();
            all.extend(accounts);

            emit(
                on_progress,
                AnalysisProgress::FetchedPage {
                    kind: config.kind,
                    page,
                    count,
                    total_so_far: all.len(),
                    expected_total: config.expected_total,
                },
            );

            // A short page is terminal.
            if count < PER_PAGE {
                break;
            }

            // Another page is pending; throttle if the window is nearly gone.
            if let Some(snapshot) = self.tracker().latest() {
                if snapshot.remaining < LOW_QUOTA_THRESHOLD {
                    emit(
                        on_progress,
                        AnalysisProgress::CoolingDown {
                            remaining: snapshot.remaining,
                            resume_in_ms: LOW_QUOTA_COOLDOWN_MS,
                        },
                    );
                    tokio::time::sleep(Duration::from_millis(LOW_QUOTA_COOLDOWN_MS)).await;
                }
            }

            page += 1;
        }

        emit(
            on_progress,
            AnalysisProgress::ListComplete {
                kind: config.kind,
                total: all.len(),
            },
        );

        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use tokio::time::Instant;

    use crate::analysis::progress::ProgressCallback;
    use crate::http::{HttpResponse, MockTransport};

    use super::*;

    const BASE: &str = "https://api.github.example";

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::with_transport(Arc::new(transport.clone()), BASE, None, None)
    }

    fn accounts_page(start: u64, count: usize) -> serde_json::Value {
        let accounts: Vec<serde_json::Value> = (0..count as u64)
            .map(|i| json!({"id": start + i, "login": format!("user{}", start + i)}))
            .collect();
        json!(accounts)
    }

    fn quota_headers(remaining: u32) -> Vec<(String, String)> {
        vec![
            ("x-ratelimit-limit".to_string(), "5000".to_string()),
            ("x-ratelimit-remaining".to_string(), remaining.to_string()),
            ("x-ratelimit-reset".to_string(), "1700000000".to_string()),
        ]
    }

    fn capture_events() -> (ProgressCallback, Arc<Mutex<Vec<AnalysisProgress>>>) {
        let events: Arc<Mutex<Vec<AnalysisProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let capture = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            capture
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        });
        (callback, events)
    }

    #[tokio::test]
    async fn collects_until_the_short_page_and_stops() {
        let transport = MockTransport::new();
        let url = |page: u32| format!("{BASE}{}", followers_route("octocat", page));
        transport.push_json(url(1), quota_headers(4999), &accounts_page(0, 100));
        transport.push_json(url(2), quota_headers(4998), &accounts_page(100, 100));
        transport.push_json(url(3), quota_headers(4997), &accounts_page(200, 37));

        let client = client(&transport);
        let config = ListConfig::followers("octocat", None);
        let collected = client.collect_all(&config, None).await.expect("accounts");

        assert_eq!(collected.len(), 237);
        // Exactly three page requests, no probe past the short page.
        assert_eq!(transport.request_count(), 3);
        // Encounter order is preserved.
        assert_eq!(collected[0].id, 0);
        assert_eq!(collected[236].id, 236);
    }

    #[tokio::test]
    async fn a_short_first_page_terminates_after_one_request() {
        let transport = MockTransport::new();
        let url = format!("{BASE}{}", following_route("octocat", 1));
        transport.push_json(url, quota_headers(4999), &accounts_page(0, 12));

        let client = client(&transport);
        let config = ListConfig::following("octocat", Some(12));
        let collected = client.collect_all(&config, None).await.expect("accounts");

        assert_eq!(collected.len(), 12);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn an_empty_first_page_yields_an_empty_list() {
        let transport = MockTransport::new();
        let url = format!("{BASE}{}", followers_route("loner", 1));
        transport.push_json(url, quota_headers(4999), &json!([]));

        let client = client(&transport);
        let config = ListConfig::followers("loner", Some(0));
        let collected = client.collect_all(&config, None).await.expect("accounts");

        assert!(collected.is_empty());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn progress_fires_once_per_page_with_non_decreasing_totals() {
        let transport = MockTransport::new();
        let url = |page: u32| format!("{BASE}{}", followers_route("octocat", page));
        transport.push_json(url(1), quota_headers(4999), &accounts_page(0, 100));
        transport.push_json(url(2), quota_headers(4998), &accounts_page(100, 100));
        transport.push_json(url(3), quota_headers(4997), &accounts_page(200, 37));

        let client = client(&transport);
        let (callback, events) = capture_events();
        let config = ListConfig::followers("octocat", Some(237));
        client
            .collect_all(&config, Some(&callback))
            .await
            .expect("accounts");

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        let pages: Vec<(u32, usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                AnalysisProgress::FetchedPage {
                    page,
                    count,
                    total_so_far,
                    ..
                } => Some((*page, *count, *total_so_far)),
                _ => None,
            })
            .collect();

        assert_eq!(pages, vec![(1, 100, 100), (2, 100, 200), (3, 37, 237)]);
        assert!(matches!(
            events.first(),
            Some(AnalysisProgress::FetchingList {
                kind: ListKind::Followers,
                expected_total: Some(237),
            })
        ));
        assert!(matches!(
            events.last(),
            Some(AnalysisProgress::ListComplete { total: 237, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn low_quota_pauses_between_pages_but_not_after_the_terminal_one() {
        let transport = MockTransport::new();
        let url = |page: u32| format!("{BASE}{}", followers_route("octocat", page));
        // Quota is already low on the first page; the terminal page is also
        // low but must not delay the return.
        transport.push_json(url(1), quota_headers(5), &accounts_page(0, 100));
        transport.push_json(url(2), quota_headers(4), &accounts_page(100, 20));

        let client = client(&transport);
        let (callback, events) = capture_events();
        let config = ListConfig::followers("octocat", None);

        let started = Instant::now();
        let collected = client
            .collect_all(&config, Some(&callback))
            .await
            .expect("accounts");
        assert_eq!(collected.len(), 120);

        // Paused virtual time advanced by one cooldown: after page 1 but
        // not after the terminal page 2.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(LOW_QUOTA_COOLDOWN_MS));
        assert!(elapsed < Duration::from_millis(2 * LOW_QUOTA_COOLDOWN_MS));

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        let cooldowns: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                AnalysisProgress::CoolingDown { remaining, .. } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(cooldowns, vec![5]);
    }

    #[tokio::test]
    async fn a_healthy_quota_does_not_pause() {
        let transport = MockTransport::new();
        let url = |page: u32| format!("{BASE}{}", followers_route("octocat", page));
        transport.push_json(url(1), quota_headers(4999), &accounts_page(0, 100));
        transport.push_json(url(2), quota_headers(4998), &accounts_page(100, 1));

        let client = client(&transport);
        let (callback, events) = capture_events();
        let config = ListConfig::followers("octocat", None);
        client
            .collect_all(&config, Some(&callback))
            .await
            .expect("accounts");

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        assert!(!events
            .iter()
            .any(|e| matches!(e, AnalysisProgress::CoolingDown { .. })));
    }

    #[tokio::test]
    async fn a_mid_walk_failure_aborts_the_whole_collection() {
        let transport = MockTransport::new();
        let url = |page: u32| format!("{BASE}{}", followers_route("octocat", page));
        transport.push_json(url(1), quota_headers(4999), &accounts_page(0, 100));
        transport.push_response(
            url(2),
            HttpResponse {
                status: 500,
                headers: quota_headers(4998),
                body: br#"{"message": "Server Error"}"#.to_vec(),
            },
        );

        let client = client(&transport);
        let config = ListConfig::followers("octocat", None);
        let err = client.collect_all(&config, None).await.expect_err("abort");

        assert!(matches!(err, GitHubError::Api { status: 500, .. }));
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn list_config_builds_routes_for_its_kind() {
        let followers = ListConfig::followers("octocat", Some(500));
        assert_eq!(followers.kind, ListKind::Followers);
        assert_eq!(followers.expected_total, Some(500));
        assert_eq!(
            followers.route(2),
            "/users/octocat/followers?page=2&per_page=100"
        );

        let following = ListConfig::following("octocat", None);
        assert_eq!(following.kind, ListKind::Following);
        assert_eq!(
            following.route(1),
            "/users/octocat/following?page=1&per_page=100"
        );
    }
}
