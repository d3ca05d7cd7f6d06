//! Attendance record entity.
//!
//! The attendance rate is the percentage of records in which the intern
//! attended (`present` or `late`). It is kept as the running mean of a
//! 0/100 indicator, so the shared incremental algebra maintains it exactly
//! like any other averaged metric.

use crate::identity::UserId;
use crate::store::{Entity, EntityId, Filters, Summary};
use chrono::{NaiveDate, NaiveTime};
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
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    /// Whether this status counts toward the attendance rate.
    pub fn attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: EntityId,
    pub intern_id: UserId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDraft {
    pub intern_id: UserId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePatch {
    pub status: Option<AttendanceStatus>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl AttendancePatch {
    pub fn status(status: AttendanceStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFilters {
    pub intern_id: Option<UserId>,
    pub status: Option<AttendanceStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Filters for AttendanceFilters {
    fn merge(&mut self, partial: Self) {
        overlay!(self, partial, intern_id, status, date_from, date_to);
    }
}

impl Entity for AttendanceRecord {
    const KIND: &'static str = "Attendance";

    type Category = AttendanceStatus;
    type Patch = AttendancePatch;
    type Draft = AttendanceDraft;
    type Filters = AttendanceFilters;

    fn id(&self) -> EntityId {
        self.id
    }

    fn category(&self) -> AttendanceStatus {
        self.status
    }

    fn metric(&self) -> Option<f64> {
        Some(if self.status.attended() { 100.0 } else { 0.0 })
    }

    fn apply_patch(&self, patch: &AttendancePatch) -> Self {
        let mut next = self.clone();
        let patch = patch.clone();
        assign!(next, patch, status);
        overlay!(next, patch, check_in, check_out, notes);
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    /// Percentage in `0.0..=100.0`.
    pub attendance_rate: f64,
}

impl From<&Summary<AttendanceStatus>> for AttendanceStats {
    fn from(summary: &Summary<AttendanceStatus>) -> Self {
        Self {
            total: summary.total,
            present: summary.count(AttendanceStatus::Present),
            absent: summary.count(AttendanceStatus::Absent),
            late: summary.count(AttendanceStatus::Late),
            excused: summary.count(AttendanceStatus::Excused),
            attendance_rate: summary.mean.value,
        }
    }
}
