//! Task entity.

use crate::identity::UserId;
use crate::store::{Entity, EntityId, Filters, Summary};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{assign, overlay};

/// Progress of a task assigned to an intern.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    pub deadline: Option<NaiveDate>,
    pub assigned_to: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<NaiveDate>,
    pub assigned_to: Option<UserId>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<UserId>,
    pub search: Option<String>,
}

impl Filters for TaskFilters {
    fn merge(&mut self, partial: Self) {
        overlay!(self, partial, status, priority, assigned_to, search);
    }
}

impl Entity for Task {
    const KIND: &'static str = "Task";

    type Category = TaskStatus;
    type Patch = TaskPatch;
    type Draft = TaskDraft;
    type Filters = TaskFilters;

    fn id(&self) -> EntityId {
        self.id
    }

    fn category(&self) -> TaskStatus {
        self.status
    }

    fn apply_patch(&self, patch: &TaskPatch) -> Self {
        let mut next = self.clone();
        let patch = patch.clone();
        assign!(next, patch, title, description, status, priority);
        overlay!(next, patch, deadline, assigned_to);
        next
    }
}

/// Dashboard view of the task summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl From<&Summary<TaskStatus>> for TaskStats {
    fn from(summary: &Summary<TaskStatus>) -> Self {
        Self {
            total: summary.total,
            pending: summary.count(TaskStatus::Pending),
            in_progress: summary.count(TaskStatus::InProgress),
            completed: summary.count(TaskStatus::Completed),
            cancelled: summary.count(TaskStatus::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TaskStore;
    use crate::store::Mutation;

    fn task(id: EntityId, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: String::new(),
            status,
            priority: TaskPriority::Medium,
            deadline: None,
            assigned_to: Some(10),
            created_by: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_to_empty_store() {
        let mut store = TaskStore::new();
        store.load_all(Vec::new(), None);
        store.add(task(1, TaskStatus::Pending)).unwrap();

        assert_eq!(
            TaskStats::from(store.summary()),
            TaskStats {
                total: 1,
                pending: 1,
                in_progress: 0,
                completed: 0,
                cancelled: 0,
            }
        );
    }

    #[test]
    fn test_duplicate_add_is_invariant_violation() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::Pending)).unwrap();

        let err = store.add(task(1, TaskStatus::Completed)).unwrap_err();

        assert!(err.is_invariant_violation());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().status, TaskStatus::Pending);
        assert_eq!(store.summary().total, 1);
        assert_eq!(store.summary().count(TaskStatus::Completed), 0);
    }

    #[test]
    fn test_add_prepends() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::Pending)).unwrap();
        store.add(task(2, TaskStatus::Pending)).unwrap();
        let ids: Vec<_> = store.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_status_change_moves_bucket() {
        let mut store = TaskStore::new();
        store.load_all(
            vec![task(1, TaskStatus::Pending), task(2, TaskStatus::Pending)],
            None,
        );

        let outcome = store.update(1, &TaskPatch::status(TaskStatus::InProgress));

        assert!(outcome.is_applied());
        let stats = TaskStats::from(store.summary());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 1);
    }

    #[test]
    fn test_update_without_status_keeps_counts() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::Completed)).unwrap();
        store.update(
            1,
            &TaskPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(store.get(1).unwrap().title, "Renamed");
        assert_eq!(store.summary().count(TaskStatus::Completed), 1);
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::Pending)).unwrap();
        let before = store.summary().clone();

        let outcome = store.update(99, &TaskPatch::status(TaskStatus::Completed));

        assert_eq!(outcome, Mutation::Missing);
        assert_eq!(store.summary(), &before);
    }

    #[test]
    fn test_update_patches_selected() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::Pending)).unwrap();
        store.select(1);

        store.update(1, &TaskPatch::status(TaskStatus::Completed));

        assert_eq!(store.selected().unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn test_replace_takes_returned_entity() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::Pending)).unwrap();
        store.select(1);

        let mut saved = task(1, TaskStatus::Cancelled);
        saved.title = "Normalised".to_string();
        assert!(store.replace(saved).is_applied());

        assert_eq!(store.get(1).unwrap().title, "Normalised");
        assert_eq!(store.selected().unwrap().status, TaskStatus::Cancelled);
        assert_eq!(store.summary().count(TaskStatus::Pending), 0);
        assert_eq!(store.summary().count(TaskStatus::Cancelled), 1);
        assert_eq!(store.replace(task(9, TaskStatus::Pending)), Mutation::Missing);
        assert_eq!(store.summary().total, 1);
    }

    #[test]
    fn test_delete_clears_selection_and_counts() {
        let mut store = TaskStore::new();
        store.load_all(
            vec![task(1, TaskStatus::Pending), task(2, TaskStatus::Cancelled)],
            None,
        );
        store.select(2);

        assert!(store.delete(2).is_applied());

        assert!(store.selected().is_none());
        assert_eq!(store.summary().total, 1);
        assert_eq!(store.summary().count(TaskStatus::Cancelled), 0);
        assert_eq!(store.delete(2), Mutation::Missing);
    }

    #[test]
    fn test_delete_last_resets_summary() {
        let mut store = TaskStore::new();
        store.add(task(1, TaskStatus::InProgress)).unwrap();
        store.delete(1);
        assert_eq!(store.summary(), &Summary::zero());
    }

    #[test]
    fn test_load_all_rejects_inconsistent_summary() {
        let mut store = TaskStore::new();
        let mut bogus = Summary::<TaskStatus>::zero();
        bogus.total = 5;

        store.load_all(vec![task(1, TaskStatus::Pending)], Some(bogus));

        assert_eq!(store.summary().total, 1);
        assert_eq!(store.summary().count(TaskStatus::Pending), 1);
    }

    #[test]
    fn test_load_all_reresolves_selection() {
        let mut store = TaskStore::new();
        store.load_all(
            vec![task(1, TaskStatus::Pending), task(2, TaskStatus::Pending)],
            None,
        );
        store.select(1);

        store.load_all(vec![task(1, TaskStatus::Completed)], None);
        assert_eq!(store.selected().unwrap().status, TaskStatus::Completed);

        store.load_all(vec![task(3, TaskStatus::Pending)], None);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_load_all_drops_repeated_ids() {
        let mut store = TaskStore::new();
        store.load_all(
            vec![task(1, TaskStatus::Pending), task(1, TaskStatus::Completed)],
            None,
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.summary().total, 1);
    }

    #[test]
    fn test_filters_last_write_wins() {
        let mut store = TaskStore::new();
        store.set_filters(TaskFilters {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        });
        store.set_filters(TaskFilters {
            status: Some(TaskStatus::Completed),
            search: Some("report".to_string()),
            ..Default::default()
        });
        assert_eq!(store.filters().status, Some(TaskStatus::Completed));
        assert_eq!(store.filters().search.as_deref(), Some("report"));
        // Filters never narrow the in-memory collection
        store.add(task(1, TaskStatus::Pending)).unwrap();
        assert_eq!(store.len(), 1);

        store.reset_filters();
        assert_eq!(store.filters(), &TaskFilters::default());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
