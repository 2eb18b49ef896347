//! The task store: canonical collection, filter state, and mutations.
//!
//! One store instance owns a session: the authoritative copy of the owner's
//! tasks (refreshed from the persistence backend after every mutation), the
//! ephemeral filter/view state, and the derived output the UI renders from.
//!
//! # Serialization
//!
//! All session state sits behind one `tokio::sync::Mutex`, held across a
//! mutation's dispatch *and* the refresh that follows it. A second mutation
//! arriving mid-refresh queues on the mutex (FIFO) rather than interleaving,
//! so the visible list never flaps between stale and fresh data.
//!
//! # Failure policy
//!
//! Validation failures are returned to the caller without a backend call.
//! Backend failures are never fatal: they are forwarded to the [`Notifier`]
//! and the canonical collection keeps its last complete refresh. Without an
//! authenticated owner, mutations are refused as silent no-ops and the
//! collection is empty.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::{OwnerId, TaskBackend};
use crate::board::{self, DropEvent};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::filter::{self, Counts, Derived, DueDateFilter, FilterState, ViewFilter};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::task::{Priority, Status, Task, TaskDraft, TaskPatch};

#[derive(Debug, Default)]
struct SessionState {
    owner: Option<OwnerId>,
    /// Canonical collection, newest-first as returned by the backend.
    tasks: Vec<Task>,
    filter: FilterState,
    derived: Derived,
}

/// Session-scoped task store over a persistence backend.
pub struct TaskStore<B: TaskBackend> {
    backend: B,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<SessionState>,
}

impl<B: TaskBackend> TaskStore<B> {
    /// Store for the given owner. Starts empty; call [`refresh`] to load
    /// the collection. `None` models the signed-out session.
    ///
    /// [`refresh`]: TaskStore::refresh
    pub fn new(backend: B, owner: Option<OwnerId>) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            notifier: Arc::new(TracingNotifier),
            state: Mutex::new(SessionState {
                owner,
                ..SessionState::default()
            }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // =========================================================================
    // Session / identity
    // =========================================================================

    pub async fn owner(&self) -> Option<OwnerId> {
        self.state.lock().await.owner.clone()
    }

    /// Switch to an authenticated owner and reload their collection.
    pub async fn sign_in(&self, owner: OwnerId) {
        let mut state = self.state.lock().await;
        state.owner = Some(owner);
        self.refresh_locked(&mut state).await;
    }

    /// Drop the identity; the collection empties and mutations become no-ops.
    pub async fn sign_out(&self) {
        let mut state = self.state.lock().await;
        state.owner = None;
        self.refresh_locked(&mut state).await;
    }

    /// Reload the canonical collection from the backend and rederive.
    pub async fn refresh(&self) {
        let mut state = self.state.lock().await;
        self.refresh_locked(&mut state).await;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a task. An empty or whitespace-only title is rejected locally
    /// without a backend call; the backend assigns `id` and `created_at`.
    pub async fn create(&self, draft: TaskDraft) -> Result<()> {
        let draft = draft.validated()?;
        let mut state = self.state.lock().await;
        let Some(owner) = state.owner.clone() else {
            tracing::debug!("create refused: no authenticated owner");
            return Ok(());
        };
        if let Err(err) = self.backend.insert_task(&owner, draft).await {
            self.report(&err);
        }
        self.refresh_locked(&mut state).await;
        Ok(())
    }

    /// Apply a partial update. An all-absent patch is a no-op; otherwise the
    /// collection is refreshed regardless of the mutation's outcome.
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        if state.owner.is_none() {
            tracing::debug!(%id, "update refused: no authenticated owner");
            return Ok(());
        }
        self.dispatch_update(&mut state, id, patch).await;
        Ok(())
    }

    /// Delete a task. Deleting an unknown id succeeds (idempotent).
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.owner.is_none() {
            tracing::debug!(%id, "delete refused: no authenticated owner");
            return Ok(());
        }
        if let Err(err) = self.backend.delete_task(id).await {
            self.report(&err);
        }
        self.refresh_locked(&mut state).await;
        Ok(())
    }

    /// Flip a task between `Done` and `Pending` based on its current status.
    pub async fn toggle_done(&self, task: &Task) -> Result<()> {
        self.update(task.id, TaskPatch::status(task.status.toggled()))
            .await
    }

    /// Move a task to a status column.
    pub async fn change_status(&self, id: Uuid, status: Status) -> Result<()> {
        self.update(id, TaskPatch::status(status)).await
    }

    /// Resolve a board drop. Drops outside the board, onto an unknown task,
    /// or into the task's current column dispatch nothing.
    pub async fn handle_drop(&self, drop: DropEvent) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.owner.is_none() {
            return Ok(());
        }
        let Some((id, status)) = board::transition(&state.tasks, drop) else {
            return Ok(());
        };
        self.dispatch_update(&mut state, id, TaskPatch::status(status))
            .await;
        Ok(())
    }

    // =========================================================================
    // Filter state
    // =========================================================================

    pub async fn set_search(&self, search: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.filter.search = search.into();
        self.rederive(&mut state);
    }

    pub async fn set_status_filter(&self, status: Option<Status>) {
        let mut state = self.state.lock().await;
        state.filter.status = status;
        self.rederive(&mut state);
    }

    pub async fn set_priority_filter(&self, priority: Option<Priority>) {
        let mut state = self.state.lock().await;
        state.filter.priority = priority;
        self.rederive(&mut state);
    }

    pub async fn set_due_filter(&self, due: DueDateFilter) {
        let mut state = self.state.lock().await;
        state.filter.due = due;
        self.rederive(&mut state);
    }

    pub async fn set_view(&self, view: ViewFilter) {
        let mut state = self.state.lock().await;
        state.filter.view = view;
        self.rederive(&mut state);
    }

    pub async fn filter(&self) -> FilterState {
        self.state.lock().await.filter.clone()
    }

    // =========================================================================
    // Derived output
    // =========================================================================

    /// The visible list and counts the UI renders from.
    pub async fn derived(&self) -> Derived {
        self.state.lock().await.derived.clone()
    }

    pub async fn visible(&self) -> Vec<Task> {
        self.state.lock().await.derived.visible.clone()
    }

    pub async fn counts(&self) -> Counts {
        self.state.lock().await.derived.counts
    }

    /// The unfiltered canonical collection, newest-first.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    /// The visible list grouped into board columns.
    pub async fn board(&self) -> Vec<board::Column> {
        board::columns(&self.state.lock().await.derived.visible)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn dispatch_update(&self, state: &mut SessionState, id: Uuid, patch: TaskPatch) {
        if let Err(err) = self.backend.update_task(id, patch).await {
            self.report(&err);
        }
        self.refresh_locked(state).await;
    }

    /// Reload from the backend under the held state lock. A failed listing
    /// keeps the previous collection (stale, never partially applied).
    async fn refresh_locked(&self, state: &mut SessionState) {
        match &state.owner {
            Some(owner) => match self.backend.list_tasks(owner).await {
                Ok(tasks) => {
                    tracing::debug!(count = tasks.len(), "refreshed canonical collection");
                    state.tasks = tasks;
                }
                Err(err) => self.report(&err),
            },
            None => state.tasks.clear(),
        }
        self.rederive(state);
    }

    fn rederive(&self, state: &mut SessionState) {
        state.derived = filter::derive(&state.tasks, &state.filter, self.clock.as_ref());
    }

    fn report(&self, err: &crate::error::Error) {
        tracing::warn!(error = %err, "backend operation failed");
        self.notifier.notify(Notification::error(err.description()));
    }
}
