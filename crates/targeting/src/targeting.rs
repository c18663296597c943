//! The generic per-dimension `values`/`alternatives` pair (§4.1) that every
//! dimension in `ApkTargeting` and `VariantTargeting` is built from.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

/// `values`: what a split targets on this dimension.
/// `alternatives`: what it explicitly rejects. The two sets never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting<V: Ord + Clone> {
    pub values: BTreeSet<V>,
    pub alternatives: BTreeSet<V>,
}

impl<V: Ord + Clone> Targeting<V> {
    pub fn new(values: BTreeSet<V>, alternatives: BTreeSet<V>) -> Self {
        let this = Self { values, alternatives };
        debug_assert!(
            this.values.is_disjoint(&this.alternatives),
            "values and alternatives must be disjoint"
        );
        this
    }

    pub fn values_only(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: values.into_iter().collect(),
            alternatives: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.alternatives.is_empty()
    }

    /// §4.1 `alternatives_for`: everything in `among` that isn't one of this
    /// targeting's values.
    pub fn alternatives_for(values: &BTreeSet<V>, among: &BTreeSet<V>) -> BTreeSet<V> {
        among.difference(values).cloned().collect()
    }

    pub fn with_alternatives(values: BTreeSet<V>, among: &BTreeSet<V>) -> Self {
        let alternatives = Self::alternatives_for(&values, among);
        Self::new(values, alternatives)
    }

    /// Merge two targetings on the same dimension. Per §4.1 this only
    /// happens when building up `alternatives` from the surviving value
    /// sets; the core splitters never need to union two `values` sets, so a
    /// conflicting union (one produced by two incompatible sources) is an
    /// error elsewhere, not encoded in this type.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            values: self.values.union(&other.values).cloned().collect(),
            alternatives: self.alternatives.union(&other.alternatives).cloned().collect(),
        }
    }
}

impl<V: Ord + Clone> Default for Targeting<V> {
    fn default() -> Self {
        Self {
            values: BTreeSet::new(),
            alternatives: BTreeSet::new(),
        }
    }
}
