use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use walkdir::WalkDir;

use crate::error::{Result, RosterError};
use crate::interval::overlaps_range;
use crate::task::{Report, Task};

/// Supplies the tasks whose active span intersects a date range.
pub trait TaskSource: Send + Sync {
    fn fetch_tasks(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Task>>;

    /// Follow-up records filed for `day`.
    fn reports_on(&self, day: NaiveDate) -> Result<Vec<Report>>;
}

/// Contents of one task file on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl TaskFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    /// Accepts either `{"tasks": [...], "reports": [...]}` or a bare task array.
    pub fn parse(path: impl AsRef<Path>, raw: &str) -> Result<Self> {
        let parse_err = |source: serde_json::Error| RosterError::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        };
        let value: serde_json::Value = serde_json::from_str(raw).map_err(parse_err)?;
        if value.is_array() {
            let tasks = serde_json::from_value(value).map_err(parse_err)?;
            Ok(Self {
                tasks,
                reports: Vec::new(),
            })
        } else {
            serde_json::from_value(value).map_err(parse_err)
        }
    }
}

/// File-backed task source. Every `*.json` file beneath the configured roots is
/// loaded; directories are walked recursively.
pub struct JsonTaskStore {
    roots: Vec<PathBuf>,
    files: RwLock<BTreeMap<PathBuf, TaskFile>>,
}

impl JsonTaskStore {
    pub fn open<I, P>(roots: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for root in roots {
            let root = root.as_ref().to_path_buf();
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        let store = Self {
            roots: unique,
            files: RwLock::new(BTreeMap::new()),
        };
        store.reload_all()?;
        Ok(store)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn add_root(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        if self.roots.contains(&path) {
            return Ok(());
        }
        let mut loaded = BTreeMap::new();
        Self::ingest_root(&mut loaded, &path)?;
        self.files.write().extend(loaded);
        self.roots.push(path);
        Ok(())
    }

    /// Re-reads every root. On failure the previously loaded files are kept.
    #[instrument(skip(self))]
    pub fn reload_all(&self) -> Result<()> {
        let mut loaded = BTreeMap::new();
        for root in &self.roots {
            Self::ingest_root(&mut loaded, root)?;
        }
        let task_count: usize = loaded.values().map(|file: &TaskFile| file.tasks.len()).sum();
        tracing::info!(files = loaded.len(), tasks = task_count, "task files loaded");
        *self.files.write() = loaded;
        Ok(())
    }

    pub fn list_files(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }

    fn ingest_root(files: &mut BTreeMap<PathBuf, TaskFile>, path: &Path) -> Result<()> {
        if path.is_file() {
            if Self::is_task_file(path) {
                files.insert(path.to_path_buf(), TaskFile::load(path)?);
            }
            return Ok(());
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let entry_path = entry.path();
            if entry.file_type().is_file() && Self::is_task_file(entry_path) {
                tracing::debug!(path = %entry_path.display(), "reading task file");
                files.insert(entry_path.to_path_buf(), TaskFile::load(entry_path)?);
            }
        }
        Ok(())
    }

    fn is_task_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl TaskSource for JsonTaskStore {
    #[instrument(skip(self))]
    fn fetch_tasks(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Task>> {
        let files = self.files.read();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut tasks = Vec::new();
        for file in files.values() {
            for task in &file.tasks {
                if !overlaps_range(task, from, to) {
                    continue;
                }
                if seen.insert(task.id.as_str()) {
                    tasks.push(task.clone());
                } else {
                    tracing::warn!(id = %task.id, "duplicate task id ignored");
                }
            }
        }
        tracing::debug!(count = tasks.len(), "tasks fetched");
        Ok(tasks)
    }

    fn reports_on(&self, day: NaiveDate) -> Result<Vec<Report>> {
        let files = self.files.read();
        Ok(files
            .values()
            .flat_map(|file| file.reports.iter())
            .filter(|report| report.date == day)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bundle_and_bare_array_layouts() {
        let bundle = r#"{
            "tasks": [{"id": "a", "fromDate": "2025-03-10", "shift": "Day"}],
            "reports": [{"id": "r", "taskId": "a", "date": "2025-03-10"}]
        }"#;
        let file = TaskFile::parse("bundle.json", bundle).expect("bundle parses");
        assert_eq!(file.tasks.len(), 1);
        assert_eq!(file.reports.len(), 1);

        let bare = r#"[{"id": "b", "fromDate": "2025-03-11"}]"#;
        let file = TaskFile::parse("bare.json", bare).expect("array parses");
        assert_eq!(file.tasks[0].id, "b");
        assert!(file.reports.is_empty());

        let only_reports = r#"{"reports": []}"#;
        let file = TaskFile::parse("empty.json", only_reports).expect("object parses");
        assert!(file.tasks.is_empty());
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let err = TaskFile::parse("broken.json", "{\"tasks\": [{\"id\": 1}]}").unwrap_err();
        match err {
            RosterError::Parse { path, .. } => assert_eq!(path, PathBuf::from("broken.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_json_files_are_task_files() {
        assert!(JsonTaskStore::is_task_file(Path::new("week.json")));
        assert!(JsonTaskStore::is_task_file(Path::new("WEEK.JSON")));
        assert!(!JsonTaskStore::is_task_file(Path::new("notes.org")));
        assert!(!JsonTaskStore::is_task_file(Path::new("json")));
    }
}
