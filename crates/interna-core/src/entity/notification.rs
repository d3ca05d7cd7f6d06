//! Notification entity.

use crate::identity::UserId;
use crate::store::{Entity, EntityId, Filters, Summary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{assign, overlay};

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
pub enum NotificationState {
    Unread,
    Read,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    pub recipient_id: UserId,
    #[serde(default)]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub state: NotificationState,
    /// View the notification points at, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.state == NotificationState::Unread
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub recipient_id: UserId,
    #[serde(default)]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    pub state: Option<NotificationState>,
}

impl NotificationPatch {
    pub fn mark_read() -> Self {
        Self {
            state: Some(NotificationState::Read),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFilters {
    pub state: Option<NotificationState>,
    pub kind: Option<NotificationKind>,
}

impl Filters for NotificationFilters {
    fn merge(&mut self, partial: Self) {
        overlay!(self, partial, state, kind);
    }
}

impl Entity for Notification {
    const KIND: &'static str = "Notification";

    type Category = NotificationState;
    type Patch = NotificationPatch;
    type Draft = NotificationDraft;
    type Filters = NotificationFilters;

    fn id(&self) -> EntityId {
        self.id
    }

    fn category(&self) -> NotificationState {
        self.state
    }

    fn apply_patch(&self, patch: &NotificationPatch) -> Self {
        let mut next = self.clone();
        let patch = patch.clone();
        assign!(next, patch, state);
        next
    }
}

/// Badge counters shown in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NotificationStats {
    pub total: usize,
    pub unread: usize,
    pub read: usize,
}

impl From<&Summary<NotificationState>> for NotificationStats {
    fn from(summary: &Summary<NotificationState>) -> Self {
        Self {
            total: summary.total,
            unread: summary.count(NotificationState::Unread),
            read: summary.count(NotificationState::Read),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::NotificationStore;

    fn notification(id: EntityId) -> Notification {
        Notification {
            id,
            recipient_id: 4,
            kind: NotificationKind::Info,
            title: "New task".to_string(),
            message: String::new(),
            state: NotificationState::Unread,
            link: Some("/intern/tasks".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_mark_read_updates_badge() {
        let mut store = NotificationStore::new();
        store.load_all(vec![notification(1), notification(2)], None);
        assert_eq!(NotificationStats::from(store.summary()).unread, 2);

        store.update(1, &NotificationPatch::mark_read());
        // Marking twice is a no-op for the counters
        store.update(1, &NotificationPatch::mark_read());

        let stats = NotificationStats::from(store.summary());
        assert_eq!(stats.unread, 1);
        assert_eq!(stats.read, 1);
        assert!(!store.get(1).unwrap().is_unread());
    }
}
