use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{CategoricalColumn, Record, ShoppingDataset, YesNo, FILTER_COLUMNS};

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column → set of selected values.
/// A column absent from the map is unconstrained; an empty set hides
/// every record.
pub type Selections = BTreeMap<CategoricalColumn, BTreeSet<String>>;

/// User-chosen constraints, combined with logical AND.
///
/// Every constraint is optional and `None` (or an absent selection)
/// accepts everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Inclusive `(min, max)` age.
    pub age: Option<(i64, i64)>,
    /// Review rating must be `>=` this.
    pub min_review_rating: Option<f64>,
    /// Previous purchases must be strictly `>` this.
    pub min_previous_purchases: Option<i64>,
    pub selections: Selections,
    pub subscription: Option<YesNo>,
    pub discount: Option<YesNo>,
}

/// Starting values for the sidebar controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub age_range: (i64, i64),
    pub min_review_rating: f64,
    pub min_previous_purchases: i64,
    pub subscription: Option<YesNo>,
    pub discount: Option<YesNo>,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            age_range: (18, 60),
            min_review_rating: 3.0,
            min_previous_purchases: 5,
            subscription: Some(YesNo::Yes),
            discount: Some(YesNo::Yes),
        }
    }
}

impl FilterCriteria {
    /// No constraint at all: the view equals the dataset.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Criteria the dashboard opens with: the configured defaults, with
    /// every value of every sidebar multiselect selected.
    pub fn initial(dataset: &ShoppingDataset, defaults: &FilterDefaults) -> Self {
        let selections = FILTER_COLUMNS
            .iter()
            .map(|col| {
                let all = dataset.unique_values(*col).iter().cloned().collect();
                (*col, all)
            })
            .collect();

        Self {
            age: Some(defaults.age_range),
            min_review_rating: Some(defaults.min_review_rating),
            min_previous_purchases: Some(defaults.min_previous_purchases),
            selections,
            subscription: defaults.subscription,
            discount: defaults.discount,
        }
    }

    /// Whether `record` passes every active constraint.
    ///
    /// Numeric comparisons run before the set lookups.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some((lo, hi)) = self.age {
            if record.age < lo || record.age > hi {
                return false;
            }
        }
        if let Some(min) = self.min_review_rating {
            if record.review_rating < min {
                return false;
            }
        }
        if let Some(min) = self.min_previous_purchases {
            if record.previous_purchases <= min {
                return false;
            }
        }
        if self.subscription.is_some_and(|want| record.subscription_status != want) {
            return false;
        }
        if self.discount.is_some_and(|want| record.discount_applied != want) {
            return false;
        }
        self.selections
            .iter()
            .all(|(col, selected)| selected.contains(col.value_of(record)))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The records of a dataset that passed a [`FilterCriteria`], in dataset
/// order. Rebuilt from scratch whenever the criteria change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    dataset: &'a ShoppingDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Positions of the passing records within the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let all = self.dataset.records();
        self.indices.iter().map(move |&i| &all[i])
    }

    pub fn get(&self, n: usize) -> Option<&'a Record> {
        self.indices.get(n).map(|&i| &self.dataset.records()[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Evaluate `criteria` against every record of `dataset`.
pub fn apply<'a>(dataset: &'a ShoppingDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, indices }
}
