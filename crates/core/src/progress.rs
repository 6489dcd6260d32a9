//! Learner progress and its persistence.
//!
//! Only the cursor is stored, never the generated lessons. A missing or
//! corrupt file is treated as "no previous session".

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Default file name, placed in the user's home directory.
pub const PROGRESS_FILE_NAME: &str = ".termtutor-progress.json";

/// Track assumed for progress files written before multiple tracks existed.
const LEGACY_TECHNOLOGY: &str = "git";

/// Where the learner is: which module of which track, and which lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(alias = "currentTechnology", default = "legacy_technology")]
    pub technology: String,
    #[serde(rename = "moduleKey", alias = "currentModuleKey")]
    pub module_key: String,
    /// Zero-based. A value at or past the lesson count means the module is complete.
    #[serde(rename = "lessonIndex", alias = "currentLessonIndex")]
    pub lesson_index: usize,
}

impl Progress {
    pub fn new(technology: impl Into<String>, module_key: impl Into<String>) -> Self {
        Self {
            technology: technology.into(),
            module_key: module_key.into(),
            lesson_index: 0,
        }
    }

    /// Same module, different cursor.
    pub fn at(&self, lesson_index: usize) -> Self {
        Self {
            lesson_index,
            ..self.clone()
        }
    }
}

fn legacy_technology() -> String {
    LEGACY_TECHNOLOGY.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressStoreError {
    #[error("could not write progress file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode progress: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable storage for a single `Progress` record.
pub trait ProgressStore {
    /// Returns the saved progress, or `None` when there is none or it is unreadable.
    fn load(&self) -> Option<Progress>;

    /// Overwrites the saved progress.
    fn save(&self, progress: &Progress) -> Result<(), ProgressStoreError>;
}

/// Stores progress as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.termtutor-progress.json`, or `None` if there is no home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(PROGRESS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ProgressStoreError {
        ProgressStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Option<Progress> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No progress file loaded");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(progress) => Some(progress),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable progress file");
                None
            }
        }
    }

    fn save(&self, progress: &Progress) -> Result<(), ProgressStoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        // Write beside the target and rename over it, so an interrupted write
        // never leaves a truncated file for the next load.
        let tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, progress)?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

/// Keeps progress in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    inner: Arc<Mutex<Option<Progress>>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: Progress) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(progress))),
        }
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn load(&self) -> Option<Progress> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, progress: &Progress) -> Result<(), ProgressStoreError> {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(progress.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileProgressStore {
        FileProgressStore::new(dir.path().join(PROGRESS_FILE_NAME))
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let progress = Progress::new("docker", "volumes").at(7);

        store.save(&progress).unwrap();

        assert_eq!(store.load(), Some(progress));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load(), None);
    }

    #[test]
    fn test_load_corrupt_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"moduleKey\": \"basics\", \"lessonIn").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(dir.path().join("nested").join("progress.json"));

        store.save(&Progress::new("git", "basics")).unwrap();
        store.save(&Progress::new("git", "basics").at(1)).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("progress.json")]);
        assert_eq!(store.load().unwrap().lesson_index, 1);
    }

    #[test]
    fn test_file_format_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Progress::new("linux", "files").at(2)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["technology"], "linux");
        assert_eq!(value["moduleKey"], "files");
        assert_eq!(value["lessonIndex"], 2);
    }

    #[test]
    fn test_single_track_file_defaults_to_git() {
        let progress: Progress =
            serde_json::from_str(r#"{"moduleKey": "branching", "lessonIndex": 4}"#).unwrap();
        assert_eq!(progress, Progress::new("git", "branching").at(4));
    }

    #[test]
    fn test_legacy_keys_are_accepted() {
        let progress: Progress = serde_json::from_str(
            r#"{"currentTechnology": "docker", "currentModuleKey": "images", "currentLessonIndex": 3}"#,
        )
        .unwrap();
        assert_eq!(progress, Progress::new("docker", "images").at(3));
    }

    #[test]
    fn test_in_memory_clones_share_state() {
        let store = InMemoryProgressStore::new();
        let handle = store.clone();
        assert_eq!(handle.load(), None);

        store.save(&Progress::new("git", "remotes")).unwrap();

        assert_eq!(handle.load(), Some(Progress::new("git", "remotes")));
    }
}
