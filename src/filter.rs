//! Filter/view state and the pure view-derivation function.
//!
//! [`derive`] turns the canonical collection plus the active filter state
//! into the visible list and navigation counts. It is pure and synchronous:
//! the store recomputes it after every refresh and every filter change, and
//! the UI renders from its output only.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::task::{Priority, Status, Task};

/// Top-level navigation selection, distinct from the finer-grained filters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Today,
    Completed,
}

/// Due-date classification relative to the current calendar date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DueDateFilter {
    #[default]
    All,
    Overdue,
    Today,
    Upcoming,
}

/// Ephemeral per-session filter state. Never persisted; created with
/// all-pass defaults and mutated only by explicit user selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring match over title and description.
    pub search: String,
    /// `None` means "all statuses".
    pub status: Option<Status>,
    /// `None` means "all priorities".
    pub priority: Option<Priority>,
    pub due: DueDateFilter,
    pub view: ViewFilter,
}

impl FilterState {
    /// Whether any of the finer-grained filters (search/status/priority/due)
    /// deviates from the default. The view filter is navigation, not a
    /// user-applied filter, so it does not count.
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || self.status.is_some()
            || self.priority.is_some()
            || self.due != DueDateFilter::All
    }
}

/// Navigation badge counts, computed over the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Counts {
    pub all: usize,
    pub today: usize,
    pub completed: usize,
}

/// Output of [`derive`]: the visible list plus navigation counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derived {
    pub visible: Vec<Task>,
    pub counts: Counts,
}

/// Compute the visible subset and counts for a collection and filter state.
///
/// Predicates run in a fixed order, short-circuiting on the first failure:
/// view filter, search, status, priority, due date. Filtering never
/// reorders; the visible list keeps the collection's newest-first order.
/// Counts ignore every filter.
///
/// Due dates classify by the calendar day the clock assigns them, so both
/// sides of every comparison use the same time zone.
pub fn derive(tasks: &[Task], filter: &FilterState, clock: &dyn Clock) -> Derived {
    let visible = tasks
        .iter()
        .filter(|task| passes(task, filter, clock))
        .cloned()
        .collect();
    Derived {
        visible,
        counts: counts(tasks, clock),
    }
}

fn due_day(task: &Task, clock: &dyn Clock) -> Option<chrono::NaiveDate> {
    task.due_date.map(|due| clock.day_of(due))
}

/// Whether a single task passes every active predicate.
pub fn passes(task: &Task, filter: &FilterState, clock: &dyn Clock) -> bool {
    let today = clock.today();
    match filter.view {
        ViewFilter::Today => {
            if due_day(task, clock) != Some(today) {
                return false;
            }
        }
        ViewFilter::Completed => {
            if !task.is_done() {
                return false;
            }
        }
        ViewFilter::All => {}
    }

    if !filter.search.is_empty() {
        let query = filter.search.to_lowercase();
        let in_title = task.title.to_lowercase().contains(&query);
        let in_description = task.description.to_lowercase().contains(&query);
        if !in_title && !in_description {
            return false;
        }
    }

    if let Some(status) = filter.status {
        if task.status != status {
            return false;
        }
    }

    if let Some(priority) = filter.priority {
        if task.priority != priority {
            return false;
        }
    }

    if filter.due != DueDateFilter::All {
        // A task with no due date never matches a due-date filter.
        let Some(due_day) = due_day(task, clock) else {
            return false;
        };
        let ok = match filter.due {
            DueDateFilter::Overdue => due_day < today,
            DueDateFilter::Today => due_day == today,
            DueDateFilter::Upcoming => due_day > today,
            DueDateFilter::All => true,
        };
        if !ok {
            return false;
        }
    }

    true
}

/// Navigation counts over the unfiltered collection.
pub fn counts(tasks: &[Task], clock: &dyn Clock) -> Counts {
    let today = clock.today();
    Counts {
        all: tasks.len(),
        today: tasks
            .iter()
            .filter(|task| due_day(task, clock) == Some(today))
            .count(),
        completed: tasks.iter().filter(|task| task.is_done()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2026, 3, 14).expect("date"))
    }

    fn task(title: &str, status: Status, priority: Priority, due_offset: Option<i64>) -> Task {
        let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            priority,
            status,
            due_date: due_offset.map(|days| noon + Duration::days(days)),
            created_at: noon,
        }
    }

    #[test]
    fn default_state_passes_everything() {
        let tasks = vec![
            task("a", Status::Pending, Priority::High, None),
            task("b", Status::Done, Priority::Low, Some(-3)),
        ];
        let derived = derive(&tasks, &FilterState::default(), &clock());
        assert_eq!(derived.visible.len(), 2);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitive() {
        let mut with_description = task("Errands", Status::Pending, Priority::Low, None);
        with_description.description = "Buy MILK and eggs".to_string();
        let tasks = vec![
            task("Buy milk", Status::Pending, Priority::Low, None),
            with_description,
            task("Walk dog", Status::Pending, Priority::Low, None),
        ];
        let filter = FilterState {
            search: "Milk".to_string(),
            ..FilterState::default()
        };
        let derived = derive(&tasks, &filter, &clock());
        assert_eq!(derived.visible.len(), 2);
    }

    #[test]
    fn filters_are_conjunctive() {
        let tasks = vec![task("Buy milk", Status::Pending, Priority::Low, Some(1))];
        let matching = FilterState {
            search: "milk".to_string(),
            status: Some(Status::Pending),
            ..FilterState::default()
        };
        assert_eq!(derive(&tasks, &matching, &clock()).visible.len(), 1);

        let wrong_priority = FilterState {
            priority: Some(Priority::High),
            ..matching
        };
        assert!(derive(&tasks, &wrong_priority, &clock()).visible.is_empty());
    }

    #[test]
    fn today_view_requires_due_date_on_current_day() {
        let tasks = vec![
            task("due today", Status::Pending, Priority::Medium, Some(0)),
            task("due tomorrow", Status::Pending, Priority::Medium, Some(1)),
            task("no due date", Status::Pending, Priority::Medium, None),
        ];
        let filter = FilterState {
            view: ViewFilter::Today,
            ..FilterState::default()
        };
        let derived = derive(&tasks, &filter, &clock());
        assert_eq!(derived.visible.len(), 1);
        assert_eq!(derived.visible[0].title, "due today");
    }

    #[test]
    fn completed_view_requires_done_status() {
        let tasks = vec![
            task("open", Status::InProgress, Priority::Medium, None),
            task("closed", Status::Done, Priority::Medium, None),
        ];
        let filter = FilterState {
            view: ViewFilter::Completed,
            ..FilterState::default()
        };
        let derived = derive(&tasks, &filter, &clock());
        assert_eq!(derived.visible.len(), 1);
        assert_eq!(derived.visible[0].title, "closed");
    }

    #[test]
    fn due_date_filter_classifies_by_calendar_day() {
        let tasks = vec![
            task("late", Status::Pending, Priority::Low, Some(-2)),
            task("now", Status::Pending, Priority::Low, Some(0)),
            task("soon", Status::Pending, Priority::Low, Some(5)),
        ];
        for (due, expected) in [
            (DueDateFilter::Overdue, "late"),
            (DueDateFilter::Today, "now"),
            (DueDateFilter::Upcoming, "soon"),
        ] {
            let filter = FilterState {
                due,
                ..FilterState::default()
            };
            let derived = derive(&tasks, &filter, &clock());
            assert_eq!(derived.visible.len(), 1, "due filter {due:?}");
            assert_eq!(derived.visible[0].title, expected);
        }
    }

    #[test]
    fn missing_due_date_fails_every_non_all_due_filter() {
        let tasks = vec![task("undated", Status::Pending, Priority::High, None)];
        for due in [
            DueDateFilter::Overdue,
            DueDateFilter::Today,
            DueDateFilter::Upcoming,
        ] {
            let filter = FilterState {
                due,
                ..FilterState::default()
            };
            assert!(
                derive(&tasks, &filter, &clock()).visible.is_empty(),
                "undated task must be excluded under {due:?}"
            );
        }
    }

    #[test]
    fn counts_ignore_active_filters() {
        let tasks = vec![
            task("done today", Status::Done, Priority::Low, Some(0)),
            task("pending today", Status::Pending, Priority::Low, Some(0)),
            task("done undated", Status::Done, Priority::Low, None),
        ];
        let filter = FilterState {
            search: "nothing matches this".to_string(),
            status: Some(Status::InProgress),
            priority: Some(Priority::High),
            due: DueDateFilter::Overdue,
            ..FilterState::default()
        };
        let derived = derive(&tasks, &filter, &clock());
        assert!(derived.visible.is_empty());
        assert_eq!(
            derived.counts,
            Counts {
                all: 3,
                today: 2,
                completed: 2
            }
        );
    }

    #[test]
    fn filtering_preserves_collection_order() {
        let tasks = vec![
            task("third", Status::Pending, Priority::Low, None),
            task("second", Status::Done, Priority::Low, None),
            task("first", Status::Pending, Priority::Low, None),
        ];
        let filter = FilterState {
            status: Some(Status::Pending),
            ..FilterState::default()
        };
        let titles: Vec<_> = derive(&tasks, &filter, &clock())
            .visible
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, vec!["third", "first"]);
    }

    #[test]
    fn derive_is_deterministic() {
        let tasks = vec![
            task("a", Status::Pending, Priority::High, Some(0)),
            task("b", Status::Done, Priority::Low, Some(-1)),
        ];
        let filter = FilterState {
            due: DueDateFilter::Today,
            ..FilterState::default()
        };
        let first = derive(&tasks, &filter, &clock());
        let second = derive(&tasks, &filter, &clock());
        assert_eq!(first, second);
    }
}
