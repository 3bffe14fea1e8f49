//! Project history records and the derived recent-projects view.

use serde::{Deserialize, Serialize};

/// One row of the project history store: a single file registered under a
/// project in one registration batch.
///
/// Serde renames match the column names of the persisted tabular store
/// (`UID,PROJECT_NAME,CHILD_FILENAME,VERSION,PATH,DATE,DESCRIPTION`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Batch identifier shared by every file registered in the same call.
    /// Format: `YYYYMMDDHHMMSS-NNNN` (timestamp plus per-process counter),
    /// lexicographically ordered by time.
    #[serde(rename = "UID")]
    pub uid: String,
    /// Logical project this file belongs to.
    #[serde(rename = "PROJECT_NAME")]
    pub project_name: String,
    /// File name annotated with its resolved version: `"<name> [V<n>]"`.
    #[serde(rename = "CHILD_FILENAME")]
    pub versioned_filename: String,
    /// Resolved version for this (project, file) pair at registration time.
    #[serde(rename = "VERSION")]
    pub version: u32,
    /// Filesystem location the batch was written to.
    #[serde(rename = "PATH")]
    pub path: String,
    /// Registration timestamp, `YYYY-MM-DD HH:MM:SS`. Sorts correctly as a
    /// plain string.
    #[serde(rename = "DATE")]
    pub date: String,
    /// Free-text description, may be empty.
    #[serde(rename = "DESCRIPTION")]
    pub description: String,
}

/// A registration batch reconstructed from the history store.
///
/// Derived on every query; never persisted. Scalar fields come from the
/// first record seen for the batch, `files` accumulates in record order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    pub uid: String,
    pub name: String,
    pub path: String,
    pub date: String,
    pub description: String,
    pub files: Vec<String>,
}
