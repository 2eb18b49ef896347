//! Persistence backend contract.
//!
//! The store talks to durable storage only through [`TaskBackend`]. Records
//! are scoped by an owner identity (the seam to the external authentication
//! collaborator); `list_tasks` returns the owner's tasks newest-first and
//! `delete_task` is idempotent.
//!
//! Two implementations ship with the crate: [`MemoryBackend`] here and the
//! file-backed store in [`crate::storage`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::Result;
use crate::task::{Task, TaskDraft, TaskPatch};

/// Opaque owner identity scoping persisted records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable storage of task records, keyed by owning identity.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// All tasks belonging to `owner`, ordered by `created_at` descending.
    async fn list_tasks(&self, owner: &OwnerId) -> Result<Vec<Task>>;

    /// Insert a new record for `owner`. The backend assigns `id` and
    /// `created_at` and returns the stored task.
    async fn insert_task(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task>;

    /// Apply a partial update. Absent patch fields are left untouched.
    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<()>;

    /// Remove a record. Deleting an unknown id is a success (idempotent).
    async fn delete_task(&self, id: Uuid) -> Result<()>;
}

/// In-memory backend. Used by tests and as a session-scoped store when no
/// durable persistence is wired up.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tasks: Mutex<HashMap<OwnerId, Vec<Task>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskBackend for MemoryBackend {
    async fn list_tasks(&self, owner: &OwnerId) -> Result<Vec<Task>> {
        let tasks = self.tasks.lock().await;
        let mut records = tasks.get(owner).cloned().unwrap_or_default();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(records)
    }

    async fn insert_task(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            due_date: draft.due_date,
            created_at: Utc::now(),
        };
        let mut tasks = self.tasks.lock().await;
        tasks.entry(owner.clone()).or_default().push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        for records in tasks.values_mut() {
            if let Some(task) = records.iter_mut().find(|task| task.id == id) {
                patch.apply_to(task);
                return Ok(());
            }
        }
        // Matches the durable backends: updating a missing row affects
        // nothing and reports nothing.
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        for records in tasks.values_mut() {
            records.retain(|task| task.id != id);
        }
        Ok(())
    }
}
