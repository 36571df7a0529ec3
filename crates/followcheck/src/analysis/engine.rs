//! Analysis orchestration.
//!
//! Sequences resolve → collect followers → collect following → classify →
//! assemble, owns the Idle/Running/Succeeded/Failed state machine, and
//! enforces the process-wide single-flight rule: at most one running
//! analysis per `Analyzer`, a second start is rejected, never queued.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::classify::classify;
use crate::github::pagination::ListConfig;
use crate::github::{GitHubClient, GitHubError};

use super::progress::{emit, stage, stage_percent, AnalysisProgress, ListKind, ProgressFn};
use super::types::AnalysisResult;

/// Errors terminating an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A start was requested while another run is in flight. Not a pipeline
    /// failure; the running analysis proceeds unaffected.
    #[error("an analysis is already in progress")]
    AlreadyInProgress,

    /// A pipeline stage failed.
    #[error(transparent)]
    Github(#[from] GitHubError),
}

/// The run state machine.
///
/// Transitions happen only inside [`Analyzer`]: Idle→Running on start,
/// Running→Succeeded/Failed on completion, and terminal states back to
/// Running only via an explicit new start.
#[derive(Debug, Clone, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Running {
        /// Overall progress, 0–100.
        percent: u8,
        /// Human-readable description of the current stage.
        step: String,
    },
    Succeeded {
        result: AnalysisResult,
    },
    Failed {
        /// Human-readable summary of what went wrong.
        message: String,
    },
}

impl AnalysisState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Drives the analysis pipeline over a [`GitHubClient`].
pub struct Analyzer {
    client: GitHubClient,
    state: Arc<Mutex<AnalysisState>>,
}

impl Analyzer {
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(AnalysisState::Idle)),
        }
    }

    /// The client this analyzer runs over.
    #[must_use]
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Snapshot of the current run state.
    #[must_use]
    pub fn state(&self) -> AnalysisState {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Run the full pipeline for `login`.
    ///
    /// Fails fast with [`AnalysisError::AlreadyInProgress`] while a run is
    /// in flight. On success the state becomes Succeeded with the result
    /// and any prior error is cleared; on failure it becomes Failed with a
    /// human-readable message and partial progress is discarded. A caller
    /// wanting to retry simply calls `analyze` again after the terminal
    /// state is reached.
    pub async fn analyze(
        &self,
        login: &str,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.begin()?;

        let outcome = self.run(login, on_progress).await;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match outcome {
            Ok(result) => {
                *state = AnalysisState::Succeeded {
                    result: result.clone(),
                };
                Ok(result)
            }
            Err(error) => {
                *state = AnalysisState::Failed {
                    message: error.to_string(),
                };
                Err(error)
            }
        }
    }

    /// Transition into Running, rejecting a concurrent start.
    fn begin(&self) -> Result<(), AnalysisError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.is_running() {
            return Err(AnalysisError::AlreadyInProgress);
        }
        *state = AnalysisState::Running {
            percent: 0,
            step: "resolving user".to_string(),
        };
        Ok(())
    }

    fn set_running(&self, percent: u8, step: &str) {
        set_running_on(&self.state, percent, step);
    }

    async fn run(
        &self,
        login: &str,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<AnalysisResult, AnalysisError> {
        emit(
            on_progress,
            AnalysisProgress::ResolvingUser {
                login: login.to_string(),
            },
        );
        let profile = self.client.user(login).await?;
        let canonical_login = profile.account.login.clone();
        emit(
            on_progress,
            AnalysisProgress::UserResolved {
                login: canonical_login.clone(),
                followers: profile.followers,
                following: profile.following,
            },
        );
        self.set_running(stage::RESOLVE.1, "user resolved");

        let followers = self
            .collect_stage(
                &canonical_login,
                ListKind::Followers,
                usize::try_from(profile.followers).ok(),
                on_progress,
            )
            .await?;

        let following = self
            .collect_stage(
                &canonical_login,
                ListKind::Following,
                usize::try_from(profile.following).ok(),
                on_progress,
            )
            .await?;

        emit(
            on_progress,
            AnalysisProgress::Classifying {
                followers: followers.len(),
                following: following.len(),
            },
        );
        self.set_running(stage::CLASSIFY.0, "classifying relationships");
        let classification = classify(&followers, &following);

        emit(
            on_progress,
            AnalysisProgress::AssemblingResult {
                login: canonical_login.clone(),
            },
        );
        self.set_running(stage::ASSEMBLE.0, "assembling result");
        let result = AnalysisResult::assemble(&canonical_login, classification);

        emit(
            on_progress,
            AnalysisProgress::Complete {
                total_related: result.total_related(),
            },
        );
        Ok(result)
    }

    /// Drain one listing, mapping its page events into the stage's percent
    /// span while forwarding every event to the caller.
    async fn collect_stage(
        &self,
        login: &str,
        kind: ListKind,
        expected_total: Option<usize>,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<Vec<crate::github::types::Account>, GitHubError> {
        let (span, step) = match kind {
            ListKind::Followers => (stage::FOLLOWERS, "fetching followers"),
            ListKind::Following => (stage::FOLLOWING, "fetching following"),
        };
        self.set_running(span.0, step);

        let state = Arc::clone(&self.state);
        let forward = move |event: AnalysisProgress| {
            if let AnalysisProgress::FetchedPage {
                total_so_far,
                expected_total,
                ..
            } = &event
            {
                let percent = stage_percent(span, *total_so_far, *expected_total);
                set_running_on(&state, percent, step);
            }
            emit(on_progress, event);
        };

        let config = match kind {
            ListKind::Followers => ListConfig::followers(login, expected_total),
            ListKind::Following => ListConfig::following(login, expected_total),
        };
        self.client.collect_all(&config, Some(&forward)).await
    }
}

fn set_running_on(state: &Arc<Mutex<AnalysisState>>, percent: u8, step: &str) {
    let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
    if guard.is_running() {
        *guard = AnalysisState::Running {
            percent,
            step: step.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    use crate::analysis::progress::ProgressCallback;
    use crate::http::{HttpError, HttpRequest, HttpResponse, HttpTransport, MockTransport};

    use super::*;

    const BASE: &str = "https://api.github.example";

    fn url(route: String) -> String {
        format!("{BASE}{route}")
    }

    fn accounts_page(ids: &[u64]) -> serde_json::Value {
        let accounts: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| json!({"id": id, "login": format!("user{id}")}))
            .collect();
        json!(accounts)
    }

    /// Mock a complete happy-path run for `login` with one page per list.
    fn mock_run(transport: &MockTransport, login: &str, followers: &[u64], following: &[u64]) {
        transport.push_json(
            url(format!("/users/{login}")),
            Vec::new(),
            &json!({
                "id": 1000,
                "login": login,
                "followers": followers.len(),
                "following": following.len(),
            }),
        );
        transport.push_json(
            url(format!("/users/{login}/followers?page=1&per_page=100")),
            Vec::new(),
            &accounts_page(followers),
        );
        transport.push_json(
            url(format!("/users/{login}/following?page=1&per_page=100")),
            Vec::new(),
            &accounts_page(following),
        );
    }

    fn analyzer(transport: &MockTransport) -> Analyzer {
        Analyzer::new(GitHubClient::with_transport(
            Arc::new(transport.clone()),
            BASE,
            None,
            None,
        ))
    }

    #[tokio::test]
    async fn happy_path_classifies_and_succeeds() {
        let transport = MockTransport::new();
        // followers=[1,2,3], following=[2,3,4]
        mock_run(&transport, "octocat", &[1, 2, 3], &[2, 3, 4]);

        let analyzer = analyzer(&transport);
        let result = analyzer.analyze("octocat", None).await.expect("result");

        assert_eq!(result.target_login, "octocat");
        assert_eq!(result.stats.mutual_count, 2);
        assert_eq!(result.stats.following_only_count, 1);
        assert_eq!(result.stats.follower_only_count, 1);
        assert_eq!(result.stats.total_followers, 3);
        assert_eq!(result.stats.total_following, 3);

        match analyzer.state() {
            AnalysisState::Succeeded { result: stored } => {
                assert_eq!(stored.analysis_id, result.analysis_id);
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn progress_covers_every_stage_in_order() {
        let transport = MockTransport::new();
        mock_run(&transport, "octocat", &[1], &[1]);

        let events: Arc<Mutex<Vec<AnalysisProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let capture = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            capture
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event);
        });

        let analyzer = analyzer(&transport);
        analyzer
            .analyze("octocat", Some(&callback))
            .await
            .expect("result");

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        let names: Vec<&'static str> = events
            .iter()
            .map(|e| match e {
                AnalysisProgress::ResolvingUser { .. } => "resolving",
                AnalysisProgress::UserResolved { .. } => "resolved",
                AnalysisProgress::FetchingList { .. } => "fetching",
                AnalysisProgress::FetchedPage { .. } => "page",
                AnalysisProgress::ListComplete { .. } => "list-complete",
                AnalysisProgress::Classifying { .. } => "classifying",
                AnalysisProgress::AssemblingResult { .. } => "assembling",
                AnalysisProgress::Complete { .. } => "complete",
                _ => "other",
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "resolving",
                "resolved",
                "fetching",
                "page",
                "list-complete",
                "fetching",
                "page",
                "list-complete",
                "classifying",
                "assembling",
                "complete",
            ]
        );
    }

    #[tokio::test]
    async fn a_failed_stage_leaves_a_failed_state_with_a_message() {
        let transport = MockTransport::new();
        transport.push_response(
            url("/users/nobody".to_string()),
            HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: br#"{"message": "Not Found"}"#.to_vec(),
            },
        );

        let analyzer = analyzer(&transport);
        let err = analyzer.analyze("nobody", None).await.expect_err("failure");
        assert!(matches!(
            err,
            AnalysisError::Github(GitHubError::NotFound(_))
        ));

        match analyzer.state() {
            AnalysisState::Failed { message } => assert!(message.contains("not found")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_new_run_clears_a_prior_failure() {
        let transport = MockTransport::new();
        transport.push_response(
            url("/users/octocat".to_string()),
            HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );
        let analyzer = analyzer(&transport);
        analyzer
            .analyze("octocat", None)
            .await
            .expect_err("first run fails");

        mock_run(&transport, "octocat", &[1], &[2]);
        analyzer
            .analyze("octocat", None)
            .await
            .expect("second run succeeds");

        assert!(matches!(analyzer.state(), AnalysisState::Succeeded { .. }));
    }

    /// Transport that blocks every response until released.
    struct GatedTransport {
        inner: MockTransport,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl HttpTransport for GatedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.gate.notified().await;
            self.inner.send(request).await
        }
    }

    #[tokio::test]
    async fn second_start_while_running_fails_with_already_in_progress() {
        let mock = MockTransport::new();
        mock_run(&mock, "octocat", &[1, 2], &[2]);
        let gate = Arc::new(Notify::new());
        let transport = GatedTransport {
            inner: mock,
            gate: Arc::clone(&gate),
        };

        let analyzer = Arc::new(Analyzer::new(GitHubClient::with_transport(
            Arc::new(transport),
            BASE,
            None,
            None,
        )));

        // Run A parks on the gated transport inside the resolve call.
        let a = {
            let analyzer = Arc::clone(&analyzer);
            tokio::spawn(async move { analyzer.analyze("octocat", None).await })
        };
        while !analyzer.state().is_running() {
            tokio::task::yield_now().await;
        }

        // Run B must be rejected immediately, without queueing.
        let err = analyzer
            .analyze("octocat", None)
            .await
            .expect_err("second start");
        assert!(matches!(err, AnalysisError::AlreadyInProgress));

        // Release A; it proceeds unaffected. One notify per pending request.
        let release = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                loop {
                    gate.notify_waiters();
                    tokio::task::yield_now().await;
                }
            })
        };
        let result = a.await.expect("join").expect("run A result");
        release.abort();

        assert_eq!(result.stats.mutual_count, 1);
        assert_eq!(result.stats.follower_only_count, 1);
        assert!(matches!(analyzer.state(), AnalysisState::Succeeded { .. }));
    }

    #[tokio::test]
    async fn state_starts_idle() {
        let transport = MockTransport::new();
        let analyzer = analyzer(&transport);
        assert!(matches!(analyzer.state(), AnalysisState::Idle));
        assert!(!analyzer.state().is_running());
    }
}
