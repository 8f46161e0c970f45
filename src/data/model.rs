use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column contract
// ---------------------------------------------------------------------------

pub const COL_AGE: &str = "Age";
pub const COL_CATEGORY: &str = "Category";
pub const COL_REVIEW_RATING: &str = "Review Rating";
pub const COL_PREVIOUS_PURCHASES: &str = "Previous Purchases";
pub const COL_SEASON: &str = "Season";
pub const COL_PAYMENT_METHOD: &str = "Payment Method";
pub const COL_PREFERRED_PAYMENT_METHOD: &str = "Preferred Payment Method";
pub const COL_SUBSCRIPTION_STATUS: &str = "Subscription Status";
pub const COL_DISCOUNT_APPLIED: &str = "Discount Applied";
pub const COL_PURCHASE_AMOUNT: &str = "Purchase Amount (USD)";
pub const COL_LOCATION: &str = "Location";

/// Header names every source file must carry (exact match).
pub const REQUIRED_COLUMNS: [&str; 11] = [
    COL_AGE,
    COL_CATEGORY,
    COL_REVIEW_RATING,
    COL_PREVIOUS_PURCHASES,
    COL_SEASON,
    COL_PAYMENT_METHOD,
    COL_PREFERRED_PAYMENT_METHOD,
    COL_SUBSCRIPTION_STATUS,
    COL_DISCOUNT_APPLIED,
    COL_PURCHASE_AMOUNT,
    COL_LOCATION,
];

// ---------------------------------------------------------------------------
// YesNo – boolean stored as text
// ---------------------------------------------------------------------------

/// Boolean flag spelled `"Yes"` / `"No"` in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(YesNo::Yes),
            "No" => Some(YesNo::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One customer transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Review Rating")]
    pub review_rating: f64,
    #[serde(rename = "Previous Purchases")]
    pub previous_purchases: i64,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Preferred Payment Method")]
    pub preferred_payment_method: String,
    #[serde(rename = "Subscription Status")]
    pub subscription_status: YesNo,
    #[serde(rename = "Discount Applied")]
    pub discount_applied: YesNo,
    #[serde(rename = "Purchase Amount (USD)")]
    pub purchase_amount: f64,
    #[serde(rename = "Location")]
    pub location: String,
}

// ---------------------------------------------------------------------------
// CategoricalColumn – text columns usable as filters / group keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoricalColumn {
    Category,
    Season,
    PaymentMethod,
    PreferredPaymentMethod,
    Location,
}

/// Columns exposed as multiselect filters in the sidebar.
pub const FILTER_COLUMNS: [CategoricalColumn; 4] = [
    CategoricalColumn::Category,
    CategoricalColumn::Season,
    CategoricalColumn::PaymentMethod,
    CategoricalColumn::PreferredPaymentMethod,
];

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 5] = [
        CategoricalColumn::Category,
        CategoricalColumn::Season,
        CategoricalColumn::PaymentMethod,
        CategoricalColumn::PreferredPaymentMethod,
        CategoricalColumn::Location,
    ];

    /// Header name in the source file.
    pub fn header(&self) -> &'static str {
        match self {
            CategoricalColumn::Category => COL_CATEGORY,
            CategoricalColumn::Season => COL_SEASON,
            CategoricalColumn::PaymentMethod => COL_PAYMENT_METHOD,
            CategoricalColumn::PreferredPaymentMethod => COL_PREFERRED_PAYMENT_METHOD,
            CategoricalColumn::Location => COL_LOCATION,
        }
    }

    pub fn value_of<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            CategoricalColumn::Category => &record.category,
            CategoricalColumn::Season => &record.season,
            CategoricalColumn::PaymentMethod => &record.payment_method,
            CategoricalColumn::PreferredPaymentMethod => &record.preferred_payment_method,
            CategoricalColumn::Location => &record.location,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// ShoppingDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
///
/// Immutable once built; the UI shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingDataset {
    records: Vec<Record>,
    /// Per categorical column, distinct values in first-seen order.
    unique_values: [Vec<String>; 5],
    age_bounds: Option<(i64, i64)>,
    max_previous_purchases: Option<i64>,
}

impl ShoppingDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: [Vec<String>; 5] = Default::default();
        let mut age_bounds: Option<(i64, i64)> = None;
        let mut max_previous_purchases: Option<i64> = None;

        for rec in &records {
            for col in CategoricalColumn::ALL {
                let seen = &mut unique_values[col.index()];
                let value = col.value_of(rec);
                if !seen.iter().any(|v| v == value) {
                    seen.push(value.to_string());
                }
            }
            age_bounds = Some(match age_bounds {
                Some((lo, hi)) => (lo.min(rec.age), hi.max(rec.age)),
                None => (rec.age, rec.age),
            });
            max_previous_purchases = Some(
                max_previous_purchases.map_or(rec.previous_purchases, |m| {
                    m.max(rec.previous_purchases)
                }),
            );
        }

        ShoppingDataset {
            records,
            unique_values,
            age_bounds,
            max_previous_purchases,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct values of `column`, in the order they first appear.
    pub fn unique_values(&self, column: CategoricalColumn) -> &[String] {
        &self.unique_values[column.index()]
    }

    /// `(min, max)` age, `None` for an empty dataset.
    pub fn age_bounds(&self) -> Option<(i64, i64)> {
        self.age_bounds
    }

    pub fn max_previous_purchases(&self) -> Option<i64> {
        self.max_previous_purchases
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a record with sensible defaults; tests override what they need.
    pub(crate) fn record(age: i64, category: &str, season: &str, amount: f64) -> Record {
        Record {
            age,
            category: category.to_string(),
            review_rating: 4.0,
            previous_purchases: 10,
            season: season.to_string(),
            payment_method: "Cash".to_string(),
            preferred_payment_method: "Cash".to_string(),
            subscription_status: YesNo::Yes,
            discount_applied: YesNo::Yes,
            purchase_amount: amount,
            location: "NY".to_string(),
        }
    }

    #[test]
    fn unique_values_keep_first_seen_order() {
        let ds = ShoppingDataset::from_records(vec![
            record(30, "Shoes", "Winter", 10.0),
            record(40, "Clothing", "Summer", 20.0),
            record(50, "Shoes", "Fall", 30.0),
        ]);

        assert_eq!(ds.unique_values(CategoricalColumn::Category), ["Shoes", "Clothing"]);
        assert_eq!(
            ds.unique_values(CategoricalColumn::Season),
            ["Winter", "Summer", "Fall"]
        );
        assert_eq!(ds.unique_values(CategoricalColumn::Location), ["NY"]);
    }

    #[test]
    fn slider_bounds_follow_data() {
        let mut young = record(19, "Shoes", "Winter", 10.0);
        young.previous_purchases = 49;
        let ds = ShoppingDataset::from_records(vec![young, record(70, "Shoes", "Winter", 10.0)]);

        assert_eq!(ds.age_bounds(), Some((19, 70)));
        assert_eq!(ds.max_previous_purchases(), Some(49));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = ShoppingDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.age_bounds(), None);
        assert_eq!(ds.max_previous_purchases(), None);
        assert!(ds.unique_values(CategoricalColumn::Category).is_empty());
    }

    #[test]
    fn yes_no_spelling_is_exact() {
        assert_eq!(YesNo::parse("Yes"), Some(YesNo::Yes));
        assert_eq!(YesNo::parse("No"), Some(YesNo::No));
        assert_eq!(YesNo::parse("yes"), None);
        assert_eq!(YesNo::Yes.to_string(), "Yes");
    }
}
