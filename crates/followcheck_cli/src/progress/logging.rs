use followcheck::AnalysisProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: AnalysisProgress) {
        match event {
            AnalysisProgress::ResolvingUser { login } => {
                tracing::info!(login = %login, "Resolving user");
            }

            AnalysisProgress::UserResolved {
                login,
                followers,
                following,
            } => {
                tracing::info!(login = %login, followers, following, "User resolved");
            }

            AnalysisProgress::FetchingList {
                kind,
                expected_total,
            } => {
                tracing::info!(list = %kind, expected_total = ?expected_total, "Fetching list");
            }

            AnalysisProgress::FetchedPage {
                kind,
                page,
                count,
                total_so_far,
                expected_total,
            } => {
                tracing::debug!(list = %kind, page, count, total_so_far, expected_total = ?expected_total, "Fetched page");
            }

            AnalysisProgress::ListComplete { kind, total } => {
                tracing::info!(list = %kind, total, "List complete");
            }

            AnalysisProgress::CoolingDown {
                remaining,
                resume_in_ms,
            } => {
                tracing::warn!(remaining, resume_in_ms, "Low quota, cooling down");
            }

            AnalysisProgress::Classifying {
                followers,
                following,
            } => {
                tracing::info!(followers, following, "Classifying relationships");
            }

            AnalysisProgress::AssemblingResult { login } => {
                tracing::debug!(login = %login, "Assembling result");
            }

            AnalysisProgress::Complete { total_related } => {
                tracing::info!(total_related, "Analysis complete");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
