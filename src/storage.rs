//! File-backed persistence.
//!
//! [`FileBackend`] keeps every owner's task records in a single JSON file:
//!
//! ```text
//! <data dir>/
//!   tasks.json     # array of records: task fields + "owner" column
//!   tasks.lock     # advisory lock taken around mutations
//! ```
//!
//! Writes replace the whole file atomically (write temp, then rename), so a
//! concurrent reader never sees a partial record set. Mutations take the
//! sidecar lock first; reads go lock-free against the last complete write.
//! All file IO runs on the blocking thread pool, so a contended lock waits
//! without stalling the async runtime.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{OwnerId, TaskBackend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock::FileLock;
use crate::task::{Task, TaskDraft, TaskPatch};

const TASKS_FILE: &str = "tasks.json";
const LOCK_FILE: &str = "tasks.lock";

/// A persisted record: the task fields plus the owner-identity column used
/// to scope `list_tasks` to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    owner: OwnerId,
    #[serde(flatten)]
    task: Task,
}

/// JSON-file implementation of [`TaskBackend`].
#[derive(Debug, Clone)]
pub struct FileBackend {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileBackend {
    /// Backend rooted at an explicit data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock_timeout_ms: crate::lock::DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Backend rooted at the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            data_dir: config.data_dir()?,
            lock_timeout_ms: config.lock_timeout_ms,
        })
    }

    pub fn with_lock_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    fn lock_file(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE)
    }

    fn read_records(&self) -> Result<Vec<StoredRecord>> {
        let path = self.tasks_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the full record set atomically (temp file + rename).
    fn write_records(&self, records: &[StoredRecord]) -> Result<()> {
        let path = self.tasks_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn mutate<F>(&self, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<StoredRecord>),
    {
        let _lock = FileLock::acquire(self.lock_file(), self.lock_timeout_ms)?;
        let mut records = self.read_records()?;
        mutator(&mut records);
        self.write_records(&records)
    }

    /// Run a file operation on the blocking pool. The lock's retry loop
    /// sleeps the blocking thread, never an executor thread.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(FileBackend) -> Result<T> + Send + 'static,
    {
        let backend = self.clone();
        tokio::task::spawn_blocking(move || op(backend))
            .await
            .map_err(|err| Error::Backend(format!("storage task failed: {err}")))?
    }

    fn list_sync(&self, owner: &OwnerId) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .read_records()?
            .into_iter()
            .filter(|record| &record.owner == owner)
            .map(|record| record.task)
            .collect();
        tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(tasks)
    }

    fn insert_sync(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            due_date: draft.due_date,
            created_at: Utc::now(),
        };
        let record = StoredRecord {
            owner: owner.clone(),
            task: task.clone(),
        };
        self.mutate(|records| records.push(record))?;
        tracing::debug!(id = %task.id, "inserted task record");
        Ok(task)
    }
}

#[async_trait]
impl TaskBackend for FileBackend {
    async fn list_tasks(&self, owner: &OwnerId) -> Result<Vec<Task>> {
        let owner = owner.clone();
        self.run_blocking(move |backend| backend.list_sync(&owner))
            .await
    }

    async fn insert_task(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task> {
        let owner = owner.clone();
        self.run_blocking(move |backend| backend.insert_sync(&owner, draft))
            .await
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        self.run_blocking(move |backend| {
            backend.mutate(|records| {
                if let Some(record) = records.iter_mut().find(|record| record.task.id == id) {
                    patch.apply_to(&mut record.task);
                }
            })
        })
        .await
    }

    async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.run_blocking(move |backend| {
            backend.mutate(|records| records.retain(|record| record.task.id != id))
        })
        .await
    }
}
