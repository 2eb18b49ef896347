//! Task domain model.
//!
//! A task is the sole domain entity: title, optional description text,
//! priority, status, optional due date. `id` and `created_at` are assigned
//! exactly once by the persistence backend and never appear in update
//! payloads.
//!
//! Serialized field names match the persisted record layout (`dueDate`,
//! `createdAt`, status spelled `In-Progress`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Task priority, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Task status. A task is in exactly one status at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Pending,
    #[serde(rename = "In-Progress")]
    InProgress,
    Done,
}

impl Status {
    /// The status `toggle_done` moves a task to: `Done` flips back to
    /// `Pending`, anything else completes to `Done`.
    pub fn toggled(self) -> Status {
        match self {
            Status::Done => Status::Pending,
            _ => Status::Done,
        }
    }
}

/// A single trackable work item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }
}

/// Creation payload. The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, priority: Priority, status: Status) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority,
            status,
            due_date: None,
        }
    }

    /// Trim the title and reject drafts whose title is empty or
    /// whitespace-only. Returns the draft with the trimmed title.
    pub fn validated(mut self) -> Result<Self> {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyTitle);
        }
        if trimmed.len() != self.title.len() {
            self.title = trimmed.to_string();
        }
        Ok(self)
    }
}

/// Partial update payload. Absent fields are left untouched; `due_date`
/// distinguishes "leave as-is" (`None`) from "clear" (`Some(None)`).
/// `id` and `created_at` cannot be patched by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// A patch with no fields set is a no-op and is never dispatched.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }

    /// Apply the patch to a task in place. Backends use this so in-memory
    /// and durable records stay field-for-field identical.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}
