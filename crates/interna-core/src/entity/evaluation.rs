//! Evaluation entity.

use crate::error::{FieldError, InternaError, Result};
use crate::identity::UserId;
use crate::store::{Entity, EntityId, Filters, Summary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

use super::{assign, overlay};

pub const MAX_SCORE: f64 = 100.0;

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
pub enum EvaluationType {
    Weekly,
    Monthly,
    MidTerm,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: EntityId,
    pub intern_id: UserId,
    pub evaluator_id: UserId,
    pub evaluation_type: EvaluationType,
    pub score: f64,
    #[serde(default)]
    pub comments: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDraft {
    pub intern_id: UserId,
    pub evaluation_type: EvaluationType,
    pub score: f64,
    #[serde(default)]
    pub comments: String,
    pub date: NaiveDate,
}

impl EvaluationDraft {
    /// Client-side checks run before the draft is sent to the gateway.
    pub fn validate(&self) -> Result<()> {
        check_score(self.score)
    }
}

/// NaN fails the range check as well.
fn check_score(score: f64) -> Result<()> {
    if (0.0..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(InternaError::validation(vec![FieldError::new(
            "score",
            format!("must be between 0 and {}", MAX_SCORE),
        )]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPatch {
    pub evaluation_type: Option<EvaluationType>,
    pub score: Option<f64>,
    pub comments: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EvaluationPatch {
    pub fn score(score: f64) -> Self {
        Self {
            score: Some(score),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.score.map_or(Ok(()), check_score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationFilters {
    pub intern_id: Option<UserId>,
    pub evaluation_type: Option<EvaluationType>,
    pub min_score: Option<f64>,
}

impl Filters for EvaluationFilters {
    fn merge(&mut self, partial: Self) {
        overlay!(self, partial, intern_id, evaluation_type, min_score);
    }
}

impl Entity for Evaluation {
    const KIND: &'static str = "Evaluation";

    type Category = EvaluationType;
    type Patch = EvaluationPatch;
    type Draft = EvaluationDraft;
    type Filters = EvaluationFilters;

    fn id(&self) -> EntityId {
        self.id
    }

    fn category(&self) -> EvaluationType {
        self.evaluation_type
    }

    fn metric(&self) -> Option<f64> {
        Some(self.score)
    }

    fn apply_patch(&self, patch: &EvaluationPatch) -> Self {
        let mut next = self.clone();
        let patch = patch.clone();
        assign!(next, patch, evaluation_type, score, comments, date);
        next
    }

    fn validate_draft(draft: &EvaluationDraft) -> Result<()> {
        draft.validate()
    }

    fn validate_patch(patch: &EvaluationPatch) -> Result<()> {
        patch.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvaluationStats {
    pub total: usize,
    pub average_score: f64,
    pub count_by_type: BTreeMap<EvaluationType, usize>,
}

impl From<&Summary<EvaluationType>> for EvaluationStats {
    fn from(summary: &Summary<EvaluationType>) -> Self {
        Self {
            total: summary.total,
            average_score: summary.mean.value,
            count_by_type: summary.counts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EvaluationStore;

    fn evaluation(id: EntityId, score: f64) -> Evaluation {
        Evaluation {
            id,
            intern_id: 5,
            evaluator_id: 2,
            evaluation_type: EvaluationType::Monthly,
            score,
            comments: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_score_update_uses_delta() {
        let mut store = EvaluationStore::new();
        store.load_all(vec![evaluation(1, 80.0), evaluation(2, 90.0)], None);
        assert!((store.summary().mean.value - 85.0).abs() < 1e-9);

        store.update(1, &EvaluationPatch::score(100.0));

        let stats = EvaluationStats::from(store.summary());
        assert!((stats.average_score - 95.0).abs() < 1e-9);
        assert!((stats.average_score - (100.0 + 90.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_and_delete_average() {
        let mut store = EvaluationStore::new();
        store.add(evaluation(1, 60.0)).unwrap();
        store.add(evaluation(2, 80.0)).unwrap();
        store.add(evaluation(3, 100.0)).unwrap();
        assert!((store.summary().mean.value - 80.0).abs() < 1e-9);

        store.delete(3);
        assert!((store.summary().mean.value - 70.0).abs() < 1e-9);
        store.delete(1);
        store.delete(2);
        assert_eq!(store.summary().mean.value, 0.0);
        assert_eq!(store.summary().total, 0);
    }

    #[test]
    fn test_type_change_moves_bucket() {
        let mut store = EvaluationStore::new();
        store.add(evaluation(1, 70.0)).unwrap();
        store.update(
            1,
            &EvaluationPatch {
                evaluation_type: Some(EvaluationType::Final),
                ..Default::default()
            },
        );
        let stats = EvaluationStats::from(store.summary());
        assert_eq!(stats.count_by_type[&EvaluationType::Monthly], 0);
        assert_eq!(stats.count_by_type[&EvaluationType::Final], 1);
        assert_eq!(stats.count_by_type.len(), 4);
    }

    #[test]
    fn test_draft_validation() {
        let draft = EvaluationDraft {
            intern_id: 5,
            evaluation_type: EvaluationType::Weekly,
            score: 120.0,
            comments: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "score");

        let ok = EvaluationDraft {
            score: 75.5,
            ..draft
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_patch_validation_rejects_non_finite_score() {
        assert!(EvaluationPatch::score(f64::NAN).validate().is_err());
        assert!(EvaluationPatch::score(f64::INFINITY).validate().is_err());
        assert!(EvaluationPatch::score(-1.0).validate().is_err());
        assert!(EvaluationPatch::score(100.0).validate().is_ok());
        assert!(EvaluationPatch::default().validate().is_ok());
        assert!(Evaluation::validate_patch(&EvaluationPatch::score(f64::NAN)).is_err());
    }

    #[test]
    fn test_nan_score_does_not_poison_average() {
        let mut store = EvaluationStore::new();
        store.load_all(vec![evaluation(1, 80.0), evaluation(2, 90.0)], None);

        store.update(1, &EvaluationPatch::score(f64::NAN));
        assert!(store.summary().mean.approx_eq(&store.recompute_summary().mean));
        assert!(!store.summary().mean.value.is_nan());

        store.update(1, &EvaluationPatch::score(80.0));
        let mean = store.summary().mean;
        assert!(mean.approx_eq(&store.recompute_summary().mean));
        assert_eq!(mean.samples, 2);
        assert!((mean.value - 85.0).abs() < 1e-9);
    }
}
