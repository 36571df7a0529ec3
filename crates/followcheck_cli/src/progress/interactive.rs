use std::collections::HashMap;
use std::sync::Mutex;

use followcheck::{AnalysisProgress, ListKind};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Consolidated progress state to avoid multiple mutex locks.
#[derive(Default)]
struct ProgressState {
    /// Spinner for resolving the target user.
    resolve_bar: Option<ProgressBar>,
    /// Fetch bars by list kind.
    fetch_bars: HashMap<ListKind, ProgressBar>,
    /// Spinner for the classify/assemble tail.
    classify_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub fn handle(&self, event: AnalysisProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            AnalysisProgress::ResolvingUser { login } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", "Resolving"));
                pb.set_message(format!("@{login}..."));
                state.resolve_bar = Some(pb);
            }

            AnalysisProgress::UserResolved {
                login,
                followers,
                following,
            } => {
                if let Some(ref pb) = state.resolve_bar {
                    pb.finish_with_message(format!(
                        "✓ @{login} ({followers} followers, {following} following)"
                    ));
                }
            }

            AnalysisProgress::FetchingList {
                kind,
                expected_total,
            } => {
                let pb = match expected_total {
                    Some(total) => {
                        let bar = self.multi.add(ProgressBar::new(total as u64));
                        bar.set_style(Self::bar_style());
                        bar
                    }
                    None => {
                        let bar = self.multi.add(ProgressBar::new_spinner());
                        bar.set_style(Self::counter_style());
                        bar.enable_steady_tick(std::time::Duration::from_millis(100));
                        bar
                    }
                };
                pb.set_prefix(format!("{:12}", Self::kind_label(kind)));
                pb.set_message("fetching...".to_string());
                state.fetch_bars.insert(kind, pb);
            }

            AnalysisProgress::FetchedPage {
                kind,
                page,
                count: _,
                total_so_far,
                expected_total: _,
            } => {
                if let Some(pb) = state.fetch_bars.get(&kind) {
                    if let Some(len) = pb.length() {
                        if total_so_far as u64 > len {
                            pb.set_length(total_so_far as u64);
                        }
                    }
                    pb.set_position(total_so_far as u64);
                    pb.set_message(format!("page {page} ({total_so_far} so far)"));
                }
            }

            AnalysisProgress::ListComplete { kind, total } => {
                if let Some(pb) = state.fetch_bars.get(&kind) {
                    if !pb.is_finished() {
                        pb.set_length(total as u64);
                        pb.set_position(total as u64);
                        pb.finish_with_message(format!(
                            "✓ {total} {} fetched",
                            Self::kind_label(kind).to_lowercase()
                        ));
                    }
                }
            }

            AnalysisProgress::CoolingDown {
                remaining,
                resume_in_ms,
            } => {
                // Attach the notice to whichever fetch is still running.
                for pb in state.fetch_bars.values() {
                    if !pb.is_finished() {
                        pb.set_message(format!(
                            "⏳ low quota ({remaining} left), pausing {:.1}s",
                            resume_in_ms as f64 / 1000.0
                        ));
                    }
                }
            }

            AnalysisProgress::Classifying {
                followers,
                following,
            } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", "Classifying"));
                pb.set_message(format!("{followers} followers × {following} following"));
                state.classify_bar = Some(pb);
            }

            AnalysisProgress::AssemblingResult { login: _ } => {
                if let Some(ref pb) = state.classify_bar {
                    pb.set_message("assembling result...".to_string());
                }
            }

            AnalysisProgress::Complete { total_related } => {
                if let Some(ref pb) = state.classify_bar {
                    pb.finish_with_message(format!(
                        "✓ analysis complete ({total_related} related accounts)"
                    ));
                }
            }

            _ => {}
        }
    }

    fn kind_label(kind: ListKind) -> &'static str {
        match kind {
            ListKind::Followers => "Followers",
            ListKind::Following => "Following",
        }
    }

    pub fn finish(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref pb) = state.resolve_bar {
            if !pb.is_finished() {
                pb.finish();
            }
        }
        for pb in state.fetch_bars.values() {
            if !pb.is_finished() {
                pb.finish();
            }
        }
        if let Some(ref pb) = state.classify_bar {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn counter_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {pos:>5} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>5}/{len:5} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
