//! Result export.
//!
//! The completed analysis serializes to a pretty-printed JSON document of
//! the full field set, suitable for download/re-import. Parsing the
//! document back reproduces identical partitions and counts.

use crate::analysis::types::AnalysisResult;

/// Serialize an analysis result to the export document format.
pub fn to_document(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Parse an export document back into an analysis result.
pub fn from_document(document: &str) -> Result<AnalysisResult, serde_json::Error> {
    serde_json::from_str(document)
}

/// Conventional filename for an exported document: embeds the target login
/// and the completion date.
#[must_use]
pub fn export_file_name(result: &AnalysisResult) -> String {
    format!(
        "follower-analysis-{}-{}.json",
        result.target_login,
        result.completed_at.format("%Y-%m-%d")
    )
}
