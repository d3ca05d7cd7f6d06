//! Entity kinds managed by the client.
//!
//! Each kind defines its status enumeration, its immutable entity value,
//! the create (`Draft`) and update (`Patch`) payloads, its filter record and
//! a typed view of its statistics summary.
//!
//! # Usage
//!
//! ```ignore
//! use interna_core::entity::task::{Task, TaskStatus, TaskStats};
//! use interna_core::entity::TaskStore;
//! ```

/// Overlays `partial` onto `target` field by field for `Option` fields.
macro_rules! overlay {
    ($target:expr, $partial:expr, $($field:ident),+ $(,)?) => {
        $(
            if $partial.$field.is_some() {
                $target.$field = $partial.$field;
            }
        )+
    };
}

/// Assigns each `Some` field of `partial` to the plain field of the same
/// name on `target`.
macro_rules! assign {
    ($target:expr, $partial:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $partial.$field {
                $target.$field = value;
            }
        )+
    };
}

pub(crate) use {assign, overlay};

pub mod attendance;
pub mod evaluation;
pub mod notification;
pub mod reclamation;
pub mod task;

use crate::store::EntityStore;

pub type TaskStore = EntityStore<task::Task>;
pub type AttendanceStore = EntityStore<attendance::AttendanceRecord>;
pub type EvaluationStore = EntityStore<evaluation::Evaluation>;
pub type ReclamationStore = EntityStore<reclamation::Reclamation>;
pub type NotificationStore = EntityStore<notification::Notification>;
