//! Reclamation (intern complaint / request) entity.
//!
//! `resolved` is the canonical closed-successfully status. Older payloads
//! spell it `solved`; both spellings are accepted on input and only
//! `resolved` is ever written.

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
pub enum ReclamationStatus {
    Pending,
    InProgress,
    #[serde(alias = "solved")]
    #[strum(to_string = "resolved", serialize = "solved")]
    Resolved,
    Rejected,
}

impl ReclamationStatus {
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            ReclamationStatus::Resolved | ReclamationStatus::Rejected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reclamation {
    pub id: EntityId,
    pub intern_id: UserId,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub status: ReclamationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclamationDraft {
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclamationPatch {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status: Option<ReclamationStatus>,
    pub response: Option<String>,
}

impl ReclamationPatch {
    /// Closes the reclamation with an answer from the handling manager.
    pub fn respond(status: ReclamationStatus, response: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            response: Some(response.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclamationFilters {
    pub status: Option<ReclamationStatus>,
    pub intern_id: Option<UserId>,
    pub search: Option<String>,
}

impl Filters for ReclamationFilters {
    fn merge(&mut self, partial: Self) {
        overlay!(self, partial, status, intern_id, search);
    }
}

impl Entity for Reclamation {
    const KIND: &'static str = "Reclamation";

    type Category = ReclamationStatus;
    type Patch = ReclamationPatch;
    type Draft = ReclamationDraft;
    type Filters = ReclamationFilters;

    fn id(&self) -> EntityId {
        self.id
    }

    fn category(&self) -> ReclamationStatus {
        self.status
    }

    fn apply_patch(&self, patch: &ReclamationPatch) -> Self {
        let mut next = self.clone();
        let patch = patch.clone();
        assign!(next, patch, subject, description, status);
        overlay!(next, patch, response);
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReclamationStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub rejected: usize,
}

impl From<&Summary<ReclamationStatus>> for ReclamationStats {
    fn from(summary: &Summary<ReclamationStatus>) -> Self {
        Self {
            total: summary.total,
            pending: summary.count(ReclamationStatus::Pending),
            in_progress: summary.count(ReclamationStatus::InProgress),
            resolved: summary.count(ReclamationStatus::Resolved),
            rejected: summary.count(ReclamationStatus::Rejected),
        }
    }
}
