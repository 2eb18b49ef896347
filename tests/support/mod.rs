#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use taskdeck::backend::{MemoryBackend, OwnerId, TaskBackend};
use taskdeck::clock::FixedClock;
use taskdeck::error::{Error, Result};
use taskdeck::task::{Priority, Status, Task, TaskDraft, TaskPatch};

static INIT_LOGGING: Once = Once::new();

pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(EnvFilter::from_default_env())
            .init();
    });
}

/// The pinned "today" every derivation test runs against.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("date")
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(today()))
}

pub fn owner() -> OwnerId {
    OwnerId::new("user-1")
}

/// Draft due `days` from the pinned today (midday, so date-only comparison
/// is what matters).
pub fn draft_due_in(title: &str, days: i64) -> TaskDraft {
    let mut draft = TaskDraft::new(title, Priority::Medium, Status::Pending);
    let due = today() + chrono::Duration::days(days);
    let noon = due.and_hms_opt(12, 0, 0).expect("timestamp");
    draft.due_date = Some(noon.and_utc());
    draft
}

#[derive(Default)]
struct RecordingInner {
    memory: MemoryBackend,
    lists: AtomicUsize,
    inserts: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    fail_lists: AtomicBool,
    fail_updates: AtomicBool,
    fail_inserts: AtomicBool,
    delay_ms: AtomicU64,
}

/// Backend wrapper that counts calls, can inject failures, and can slow
/// operations down to exercise refresh serialization. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Arc<RecordingInner>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> usize {
        self.inner.lists.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inner.inserts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.inner.updates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.inner.deletes.load(Ordering::SeqCst)
    }

    pub fn fail_lists(&self, fail: bool) {
        self.inner.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.inner.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.inner.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, delay: u64) {
        self.inner.delay_ms.store(delay, Ordering::SeqCst);
    }

    async fn pause(&self) {
        let delay = self.inner.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[async_trait]
impl TaskBackend for RecordingBackend {
    async fn list_tasks(&self, owner: &OwnerId) -> Result<Vec<Task>> {
        self.inner.lists.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.inner.fail_lists.load(Ordering::SeqCst) {
            return Err(Error::Backend("list unavailable".to_string()));
        }
        self.inner.memory.list_tasks(owner).await
    }

    async fn insert_task(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task> {
        self.inner.inserts.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.inner.fail_inserts.load(Ordering::SeqCst) {
            return Err(Error::Backend("insert rejected".to_string()));
        }
        self.inner.memory.insert_task(owner, draft).await
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        self.inner.updates.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.inner.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::Backend("update rejected".to_string()));
        }
        self.inner.memory.update_task(id, patch).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.inner.deletes.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.memory.delete_task(id).await
    }
}
