//! Incremental statistics shared by every entity kind.
//!
//! This is the single place where aggregate counts and averaged metrics are
//! updated from one changed data point. Each kind only supplies the
//! category and metric extraction (see [`Entity`]); the update algebra
//! lives here.
//!
//! Averages follow these formulas, each of which agrees with a full
//! recompute up to floating-point rounding:
//!
//! ```text
//! insert:  mean' = (mean * n + v) / (n + 1)
//! replace: mean' = mean + (v_new - v_old) / n
//! remove:  mean' = (mean * n - v) / (n - 1)        n - 1 == 0  =>  zero
//! ```
//!
//! Non-finite metric values (NaN, infinities) never enter the mean, on the
//! incremental path and on a full scan alike.

use super::traits::{Category, Entity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Tolerance used when comparing an incrementally maintained mean with a
/// recomputed one.
pub const MEAN_TOLERANCE: f64 = 1e-6;

/// Running arithmetic mean over the entities that carry a metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mean {
    /// Number of values folded into `value`.
    pub samples: usize,
    pub value: f64,
}

impl Mean {
    /// Full scan. Used by `load_all` and by tests as the reference value.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (samples, sum) = values
            .into_iter()
            .fold((0usize, 0.0f64), |(n, sum), v| (n + 1, sum + v));
        if samples == 0 {
            return Self::default();
        }
        Self {
            samples,
            value: sum / samples as f64,
        }
    }

    pub fn insert(&mut self, v: f64) {
        let n = self.samples as f64;
        self.value = (self.value * n + v) / (n + 1.0);
        self.samples += 1;
    }

    pub fn replace(&mut self, old: f64, new: f64) {
        if self.samples == 0 {
            return;
        }
        self.value += (new - old) / self.samples as f64;
    }

    pub fn remove(&mut self, v: f64) {
        if self.samples <= 1 {
            *self = Self::default();
            return;
        }
        let n = self.samples as f64;
        self.value = (self.value * n - v) / (n - 1.0);
        self.samples -= 1;
    }

    /// Returns true if both means cover the same sample count and agree
    /// within [`MEAN_TOLERANCE`], scaled to the magnitude of the values.
    pub fn approx_eq(&self, other: &Mean) -> bool {
        let scale = self.value.abs().max(other.value.abs()).max(1.0);
        self.samples == other.samples && (self.value - other.value).abs() <= MEAN_TOLERANCE * scale
    }
}

/// Derived aggregate record kept in lockstep with an entity collection.
///
/// `counts` always holds an entry for every category, so the bucket sum
/// equals `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "C: Category")]
pub struct Summary<C: Category> {
    pub total: usize,
    pub counts: BTreeMap<C, usize>,
    #[serde(default)]
    pub mean: Mean,
}

impl<C: Category> Default for Summary<C> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<C: Category> Summary<C> {
    /// The summary of an empty collection.
    pub fn zero() -> Self {
        Self {
            total: 0,
            counts: C::iter().map(|c| (c, 0)).collect(),
            mean: Mean::default(),
        }
    }

    /// Full recompute over `entities`.
    pub fn from_entities<'a, E>(entities: impl IntoIterator<Item = &'a E>) -> Self
    where
        E: Entity<Category = C>,
    {
        let mut summary = Self::zero();
        let mut values = Vec::new();
        for entity in entities {
            summary.total += 1;
            *summary.counts.entry(entity.category()).or_insert(0) += 1;
            if let Some(v) = finite(entity.metric()) {
                values.push(v);
            }
        }
        summary.mean = Mean::from_values(values);
        summary
    }

    pub fn count(&self, category: C) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Sum of all category buckets.
    pub fn bucket_sum(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns true if the counts match exactly and the means agree within
    /// tolerance.
    pub fn consistent_with(&self, other: &Self) -> bool {
        self.total == other.total
            && C::iter().all(|c| self.count(c) == other.count(c))
            && self.mean.approx_eq(&other.mean)
    }

    pub(crate) fn record_insert(&mut self, category: C, metric: Option<f64>) {
        self.total += 1;
        *self.counts.entry(category).or_insert(0) += 1;
        if let Some(v) = finite(metric) {
            self.mean.insert(v);
        }
    }

    pub(crate) fn record_replace(
        &mut self,
        old: (C, Option<f64>),
        new: (C, Option<f64>),
    ) {
        let (old_category, old_metric) = old;
        let (new_category, new_metric) = new;

        if old_category != new_category {
            self.decrement(old_category);
            *self.counts.entry(new_category).or_insert(0) += 1;
        }

        match (finite(old_metric), finite(new_metric)) {
            (Some(a), Some(b)) => self.mean.replace(a, b),
            (None, Some(b)) => self.mean.insert(b),
            (Some(a), None) => self.mean.remove(a),
            (None, None) => {}
        }
    }

    pub(crate) fn record_remove(&mut self, category: C, metric: Option<f64>) {
        if self.total <= 1 {
            *self = Self::zero();
            return;
        }
        self.total -= 1;
        self.decrement(category);
        if let Some(v) = finite(metric) {
            self.mean.remove(v);
        }
    }

    fn decrement(&mut self, category: C) {
        let count = self.counts.entry(category).or_insert(0);
        debug_assert!(*count > 0, "category bucket {:?} underflow", category);
        *count = count.saturating_sub(1);
    }
}

fn finite(metric: Option<f64>) -> Option<f64> {
    metric.filter(|v| v.is_finite())
}
