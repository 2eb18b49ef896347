//! Board view: status columns and the drag-and-drop transition guard.
//!
//! A drop event carries the dragged task id and the column it landed in
//! (absent when dropped outside any column). [`transition`] decides whether
//! the drop warrants a status mutation; redundant and invalid drops resolve
//! to no mutation at all.

use uuid::Uuid;

use crate::task::{Status, Task};

/// Column order on the board.
pub const COLUMNS: [Status; 3] = [Status::Pending, Status::InProgress, Status::Done];

/// One board column: a status and the visible tasks currently in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: Status,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Group the visible list into the three status columns, preserving the
/// visible order within each column.
pub fn columns(visible: &[Task]) -> Vec<Column> {
    COLUMNS
        .iter()
        .map(|&status| Column {
            status,
            tasks: visible
                .iter()
                .filter(|task| task.status == status)
                .cloned()
                .collect(),
        })
        .collect()
}

/// A completed drag gesture on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: Uuid,
    /// Column the task was dropped into; `None` when dropped outside the board.
    pub destination: Option<Status>,
}

/// Resolve a drop to the mutation it requires, if any.
///
/// No destination, an unknown task, or a drop into the task's current
/// column all resolve to `None`: zero backend calls.
pub fn transition(tasks: &[Task], drop: DropEvent) -> Option<(Uuid, Status)> {
    let destination = drop.destination?;
    let task = tasks.iter().find(|task| task.id == drop.task_id)?;
    if task.status == destination {
        return None;
    }
    Some((task.id, destination))
}
