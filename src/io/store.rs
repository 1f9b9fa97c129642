use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::task::{Task, TaskId};

/// Task store file inside the task directory
pub const STORE_FILE: &str = "tasks.json";

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("no task with id {0}")]
    NotFound(TaskId),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Tasks persisted as one JSON document, rewritten atomically on every change
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn open(dir: &Path) -> Self {
        JsonTaskStore {
            path: dir.join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every task. A missing store is an empty task list.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: StoreFile =
            serde_json::from_str(&text).map_err(|source| StoreError::ParseError {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.tasks)
    }

    fn save(&self, tasks: Vec<Task>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&StoreFile { tasks })?;
        atomic_write(&self.path, format!("{}\n", json).as_bytes())?;
        Ok(())
    }

    /// Insert a new task or replace the one with the same id
    pub fn upsert(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.load()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        tracing::debug!(id = %task.id, "task saved");
        self.save(tasks)
    }

    /// Remove a task, returning it
    pub fn delete(&self, id: &TaskId) -> Result<Task, StoreError> {
        let mut tasks = self.load()?;
        let pos = tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let removed = tasks.remove(pos);
        self.save(tasks)?;
        tracing::debug!(%id, "task deleted");
        Ok(removed)
    }

    /// Move every completed task into `archive_file`. Returns how many moved.
    pub fn archive_done(&self, archive_file: &str) -> Result<usize, StoreError> {
        let mut tasks = self.load()?;
        let mut count = 0;
        for task in tasks.iter_mut().filter(|t| t.done && t.file != archive_file) {
            task.file = archive_file.to_string();
            count += 1;
        }
        if count > 0 {
            self.save(tasks)?;
        }
        tracing::info!(count, archive_file, "archived completed tasks");
        Ok(count)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
