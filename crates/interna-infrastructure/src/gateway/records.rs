//! Server-side behavior of each entity kind: how a draft becomes a record
//! and how filters select records.

use chrono::{DateTime, Utc};
use interna_core::entity::attendance::AttendanceRecord;
use interna_core::entity::evaluation::Evaluation;
use interna_core::entity::notification::{Notification, NotificationState};
use interna_core::entity::reclamation::{Reclamation, ReclamationStatus};
use interna_core::entity::task::{Task, TaskStatus};
use interna_core::identity::UserId;
use interna_core::store::{Entity, EntityId};

/// Values the server fills in when it accepts a draft.
#[derive(Debug, Clone)]
pub struct DraftContext {
    pub id: EntityId,
    /// Caller performing the create.
    pub actor: UserId,
    pub now: DateTime<Utc>,
}

pub trait ServerRecord: Entity {
    fn from_draft(draft: &Self::Draft, ctx: &DraftContext) -> Self;

    fn matches(&self, filters: &Self::Filters) -> bool;
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_or_any<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().is_none_or(|f| f == value)
}

impl ServerRecord for Task {
    fn from_draft(draft: &Self::Draft, ctx: &DraftContext) -> Self {
        Task {
            id: ctx.id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: TaskStatus::Pending,
            priority: draft.priority,
            deadline: draft.deadline,
            assigned_to: draft.assigned_to,
            created_by: ctx.actor,
            created_at: ctx.now,
        }
    }

    fn matches(&self, filters: &Self::Filters) -> bool {
        eq_or_any(&filters.status, &self.status)
            && eq_or_any(&filters.priority, &self.priority)
            && filters
                .assigned_to
                .is_none_or(|user| self.assigned_to == Some(user))
            && filters.search.as_deref().is_none_or(|q| {
                contains_ci(&self.title, q) || contains_ci(&self.description, q)
            })
    }
}

impl ServerRecord for AttendanceRecord {
    fn from_draft(draft: &Self::Draft, ctx: &DraftContext) -> Self {
        AttendanceRecord {
            id: ctx.id,
            intern_id: draft.intern_id,
            date: draft.date,
            status: draft.status,
            check_in: draft.check_in,
            check_out: draft.check_out,
            notes: draft.notes.clone(),
        }
    }

    fn matches(&self, filters: &Self::Filters) -> bool {
        eq_or_any(&filters.intern_id, &self.intern_id)
            && eq_or_any(&filters.status, &self.status)
            && filters.date_from.is_none_or(|from| self.date >= from)
            && filters.date_to.is_none_or(|to| self.date <= to)
    }
}

impl ServerRecord for Evaluation {
    fn from_draft(draft: &Self::Draft, ctx: &DraftContext) -> Self {
        Evaluation {
            id: ctx.id,
            intern_id: draft.intern_id,
            evaluator_id: ctx.actor,
            evaluation_type: draft.evaluation_type,
            score: draft.score,
            comments: draft.comments.clone(),
            date: draft.date,
        }
    }

    fn matches(&self, filters: &Self::Filters) -> bool {
        eq_or_any(&filters.intern_id, &self.intern_id)
            && eq_or_any(&filters.evaluation_type, &self.evaluation_type)
            && filters.min_score.is_none_or(|min| self.score >= min)
    }
}

impl ServerRecord for Reclamation {
    fn from_draft(draft: &Self::Draft, ctx: &DraftContext) -> Self {
        Reclamation {
            id: ctx.id,
            intern_id: ctx.actor,
            subject: draft.subject.clone(),
            description: draft.description.clone(),
            status: ReclamationStatus::Pending,
            response: None,
            created_at: ctx.now,
        }
    }

    fn matches(&self, filters: &Self::Filters) -> bool {
        eq_or_any(&filters.status, &self.status)
            && eq_or_any(&filters.intern_id, &self.intern_id)
            && filters.search.as_deref().is_none_or(|q| {
                contains_ci(&self.subject, q) || contains_ci(&self.description, q)
            })
    }
}

impl ServerRecord for Notification {
    fn from_draft(draft: &Self::Draft, ctx: &DraftContext) -> Self {
        Notification {
            id: ctx.id,
            recipient_id: draft.recipient_id,
            kind: draft.kind,
            title: draft.title.clone(),
            message: draft.message.clone(),
            state: NotificationState::Unread,
            link: draft.link.clone(),
            created_at: ctx.now,
        }
    }

    fn matches(&self, filters: &Self::Filters) -> bool {
        eq_or_any(&filters.state, &self.state) && eq_or_any(&filters.kind, &self.kind)
    }
}
