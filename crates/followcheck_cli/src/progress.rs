//! Progress reporting for analysis runs.
//!
//! Two modes:
//! - Interactive mode (TTY): animated progress bars using indicatif
//! - Logging mode (non-TTY): structured logging using tracing
//!
//! Bars are organized as a resolve spinner, one fetch bar per list, and a
//! classify spinner.

use console::Term;
use followcheck::AnalysisProgress;

mod interactive;
mod logging;

pub use interactive::InteractiveReporter;
pub use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive progress bars for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    pub fn handle(&self, event: AnalysisProgress) {
        match self {
            Self::Interactive(reporter) => reporter.handle(event),
            Self::Logging(reporter) => reporter.handle(event),
        }
    }

    /// Finish any unfinished bars.
    pub fn finish(&self) {
        if let Self::Interactive(reporter) = self {
            reporter.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
