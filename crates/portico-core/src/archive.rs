//! Append-only project history archive.
//!
//! The archive is the sole source of truth for everything the server knows
//! about past registrations: a tabular log under the archive directory with
//! one row per registered file. Version lookup and the recent-projects view
//! are both full scans of that log; neither holds state of its own, so a
//! query is always a pure function of the log's current contents.
//!
//! All public operations are total. An unreadable or missing log degrades to
//! empty history for reads and `false` for writes; nothing here errors out
//! to the caller.

use crate::Result;
use chrono::{DateTime, Local};
use portico_types::{HistoryRecord, RecentProject};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Default number of entries returned by the recent-projects view.
pub const DEFAULT_RECENT_LIMIT: usize = 3;

/// Column header of the history store, written once when the file is
/// created.
const HISTORY_HEADER: [&str; 7] = [
    "UID",
    "PROJECT_NAME",
    "CHILD_FILENAME",
    "VERSION",
    "PATH",
    "DATE",
    "DESCRIPTION",
];

const HISTORY_FILE: &str = "project_history.csv";

/// File-backed, append-only record of project registrations.
pub struct ProjectArchive {
    archive_dir: PathBuf,
    history_path: PathBuf,
    /// Per-process batch counter, appended to the uid timestamp so two
    /// batches within the same second get distinct, still time-ordered uids.
    uid_counter: AtomicU64,
    /// Serializes the read-compute-append cycle of a registration. Readers
    /// don't take it; the log is append-only and torn trailing rows are
    /// skipped like any other malformed row.
    write_lock: Mutex<()>,
}

impl ProjectArchive {
    /// Open the archive rooted at `archive_dir`, creating the directory and
    /// a header-only history file if they don't exist yet.
    pub fn open(archive_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(archive_dir)?;
        let history_path = archive_dir.join(HISTORY_FILE);

        if !history_path.exists() {
            let mut writer = csv::Writer::from_path(&history_path)?;
            writer.write_record(HISTORY_HEADER)?;
            writer.flush()?;
            info!(
                target: "portico::archive",
                "Created new project history file at {}",
                history_path.display()
            );
        }

        Ok(Self {
            archive_dir: archive_dir.to_path_buf(),
            history_path,
            uid_counter: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        })
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Next version for a (project, file) pair: one past the highest version
    /// recorded for that exact pair, or 1 for an unseen pair.
    ///
    /// Matching is exact on both project name and file name. Records whose
    /// `[V<n>]` suffix doesn't parse are ignored. An unreadable log counts
    /// as empty history.
    pub fn next_version(&self, project_name: &str, filename: &str) -> u32 {
        match self.scan_max_version(project_name, filename) {
            Ok(max) => max + 1,
            Err(e) => {
                warn!(
                    target: "portico::archive",
                    "History scan failed, assuming empty history: {e}"
                );
                1
            }
        }
    }

    /// Record one registration batch: every file gets its own row, all rows
    /// share one uid and one date. An empty batch appends nothing and still
    /// succeeds.
    ///
    /// Returns `false` on I/O failure. Rows are buffered and flushed
    /// together, but a failure mid-write can leave a partial batch; each row
    /// is independently valid, so readers are unaffected.
    pub fn log_registration(
        &self,
        project_path: &str,
        project_name: &str,
        filenames: &[String],
        description: Option<&str>,
    ) -> bool {
        let _guard = self.write_lock.lock().unwrap();
        match self.append_batch(project_path, project_name, filenames, description) {
            Ok(()) => {
                info!(
                    target: "portico::archive",
                    "Logged project {} with {} files",
                    project_name,
                    filenames.len()
                );
                true
            }
            Err(e) => {
                warn!(target: "portico::archive", "Error logging project {project_name}: {e}");
                false
            }
        }
    }

    /// The `limit` most recently registered batches, newest first.
    ///
    /// Rebuilt from the log on every call: records are grouped by uid (the
    /// first record seen supplies the scalar fields, files accumulate in
    /// record order), then sorted by date descending with the uid as a
    /// same-second tie-breaker. An unreadable or missing log yields an
    /// empty list.
    pub fn recent_projects(&self, limit: usize) -> Vec<RecentProject> {
        match self.scan_recent(limit) {
            Ok(projects) => projects,
            Err(e) => {
                warn!(target: "portico::archive", "Error reading project history: {e}");
                Vec::new()
            }
        }
    }

    fn scan_max_version(&self, project_name: &str, filename: &str) -> Result<u32> {
        if !self.history_path.exists() {
            return Ok(0);
        }

        let mut reader = csv::Reader::from_path(&self.history_path)?;
        let mut max = 0;
        for row in reader.deserialize::<HistoryRecord>() {
            let Ok(record) = row else { continue };
            if record.project_name != project_name {
                continue;
            }
            if let Some((base, version)) = split_versioned(&record.versioned_filename)
                && base == filename
            {
                max = max.max(version);
            }
        }
        Ok(max)
    }

    fn append_batch(
        &self,
        project_path: &str,
        project_name: &str,
        filenames: &[String],
        description: Option<&str>,
    ) -> Result<()> {
        if filenames.is_empty() {
            return Ok(());
        }

        let now = Local::now();
        let uid = self.next_uid(&now);
        let date = now.format("%Y-%m-%d %H:%M:%S").to_string();

        // Versions are resolved for the whole batch before anything is
        // written, so a duplicate name within one batch resolves to the same
        // version rather than stacking.
        let records: Vec<HistoryRecord> = filenames
            .iter()
            .map(|filename| {
                let version = self.next_version(project_name, filename);
                HistoryRecord {
                    uid: uid.clone(),
                    project_name: project_name.to_string(),
                    versioned_filename: format!("{filename} [V{version}]"),
                    version,
                    path: project_path.to_string(),
                    date: date.clone(),
                    description: description.unwrap_or_default().to_string(),
                }
            })
            .collect();

        let file = OpenOptions::new().append(true).open(&self.history_path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn scan_recent(&self, limit: usize) -> Result<Vec<RecentProject>> {
        if !self.history_path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.history_path)?;
        let mut batches: HashMap<String, RecentProject> = HashMap::new();
        for row in reader.deserialize::<HistoryRecord>() {
            let Ok(record) = row else { continue };
            let batch = batches
                .entry(record.uid.clone())
                .or_insert_with(|| RecentProject {
                    uid: record.uid.clone(),
                    name: record.project_name.clone(),
                    path: record.path.clone(),
                    date: record.date.clone(),
                    description: record.description.clone(),
                    files: Vec::new(),
                });
            batch.files.push(record.versioned_filename);
        }

        let mut projects: Vec<RecentProject> = batches.into_values().collect();
        projects.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.uid.cmp(&a.uid)));
        projects.truncate(limit);
        Ok(projects)
    }

    fn next_uid(&self, now: &DateTime<Local>) -> String {
        let seq = self.uid_counter.fetch_add(1, Ordering::Relaxed) % 10_000;
        format!("{}-{seq:04}", now.format("%Y%m%d%H%M%S"))
    }
}

/// Split a versioned file name `"<base> [V<n>]"` into its parts.
///
/// Returns `None` for anything that doesn't carry a well-formed version
/// suffix.
pub fn split_versioned(name: &str) -> Option<(&str, u32)> {
    let rest = name.strip_suffix(']')?;
    let (base, digits) = rest.rsplit_once(" [V")?;
    let version = digits.parse().ok()?;
    Some((base, version))
}
