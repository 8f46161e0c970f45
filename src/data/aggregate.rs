//! Chart aggregates over a [`FilteredView`].
//!
//! Each pass is independent and reads only the view, so an empty view
//! yields empty charts (and no division by zero).

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Labelled `(key, value)` pairs ready for a bar chart.
///
/// The titles and axis labels are what the dashboard prints; they are part
/// of the output contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<(String, f64)>,
}

impl CategoryChart {
    fn new(title: impl Into<String>, x_label: &'static str, y_label: &'static str) -> Self {
        Self {
            title: title.into(),
            x_label,
            y_label,
            points: Vec::new(),
        }
    }

    fn with_points(mut self, points: Vec<(String, f64)>) -> Self {
        self.points = points;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.points.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// One histogram bar: `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Five-number summary plus box-plot whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Generic passes
// ---------------------------------------------------------------------------

/// Count occurrences of each key, most frequent first; ties keep the
/// order in which keys were first seen.
pub fn value_counts<'r>(keys: impl IntoIterator<Item = &'r str>) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        let n = counts.entry(key).or_insert(0);
        if *n == 0 {
            order.push(key);
        }
        *n += 1;
    }

    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|k| (k.to_string(), counts[k]))
        .collect();
    // sort_by is stable, so first-seen order survives among equal counts
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Arithmetic mean of `value` per key, keys ascending.
pub fn mean_by<'r>(pairs: impl IntoIterator<Item = (&'r str, f64)>) -> Vec<(String, f64)> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let slot = acc.entry(key).or_insert((0.0, 0));
        slot.0 += value;
        slot.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box-plot summary of `values`; `None` when there are none.
pub fn box_summary(values: impl IntoIterator<Item = f64>) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = 1.5 * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let lower_whisker = sorted.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
    let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= high_fence).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxSummary {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram, yielded bin by bin.
///
/// Bins span `[min, max]` of the input. A degenerate range (all values
/// equal) is widened to `[v - 0.5, v + 0.5]`. No input, no bins.
#[derive(Debug, Clone)]
pub struct HistogramBins {
    lo: f64,
    width: f64,
    counts: Vec<usize>,
    next: usize,
}

impl HistogramBins {
    pub fn new(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let bounds = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        });

        let (Some((mut lo, mut hi)), true) = (bounds, bins > 0) else {
            return Self {
                lo: 0.0,
                width: 0.0,
                counts: Vec::new(),
                next: 0,
            };
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            lo,
            width,
            counts,
            next: 0,
        }
    }
}

impl Iterator for HistogramBins {
    type Item = HistogramBin;

    fn next(&mut self) -> Option<HistogramBin> {
        let count = *self.counts.get(self.next)?;
        let start = self.lo + self.width * self.next as f64;
        self.next += 1;
        Some(HistogramBin {
            start,
            end: start + self.width,
            count,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.counts.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for HistogramBins {}

// ---------------------------------------------------------------------------
// Dashboard passes
// ---------------------------------------------------------------------------

fn counts_as_f64(counts: Vec<(String, usize)>) -> Vec<(String, f64)> {
    counts.into_iter().map(|(k, n)| (k, n as f64)).collect()
}

/// Number of purchases per category.
pub fn category_counts(view: &FilteredView<'_>) -> CategoryChart {
    let counts = value_counts(view.records().map(|r| r.category.as_str()));
    CategoryChart::new("Liczba zakupów wg kategorii", "Kategoria", "Liczba zakupów")
        .with_points(counts_as_f64(counts))
}

/// Mean purchase amount per season.
pub fn season_mean_amount(view: &FilteredView<'_>) -> CategoryChart {
    let means = mean_by(view.records().map(|r| (r.season.as_str(), r.purchase_amount)));
    CategoryChart::new(
        "Średnia kwota zakupów wg sezonu",
        "Sezon",
        "Średnia kwota zakupów (USD)",
    )
    .with_points(means)
}

/// Customer age histogram with `bins` equal-width bins.
pub fn age_histogram(view: &FilteredView<'_>, bins: usize) -> HistogramBins {
    HistogramBins::new(view.records().map(|r| r.age as f64), bins)
}

/// Gaussian kernel density of `values` with Scott's bandwidth
/// (`sd * n^(-1/5)`), sampled at `points` evenly spaced positions over
/// `[min, max]`.
///
/// Values with no spread (fewer than two, or all equal) give no curve.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = values.len();
    if n < 2 || points == 0 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
    if bandwidth <= 0.0 {
        return Vec::new();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = if points > 1 { (hi - lo) / (points - 1) as f64 } else { 0.0 };
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let sum: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect()
}

/// Samples along the age density curve.
const DENSITY_POINTS: usize = 200;

/// Age density curve in histogram units (count per bin), for drawing over
/// the bars of `histogram`.
pub fn age_density(view: &FilteredView<'_>, histogram: &[HistogramBin]) -> Vec<(f64, f64)> {
    let Some(first) = histogram.first() else {
        return Vec::new();
    };
    let ages: Vec<f64> = view.records().map(|r| r.age as f64).collect();
    let scale = ages.len() as f64 * (first.end - first.start);
    gaussian_kde(&ages, DENSITY_POINTS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect()
}

/// Share of each payment method in percent; sums to 100 for a non-empty view.
pub fn payment_method_share(view: &FilteredView<'_>) -> CategoryChart {
    let chart = CategoryChart::new(
        "Procentowy udział metod płatności",
        "Metoda płatności",
        "Procentowy udział (%)",
    );
    if view.is_empty() {
        return chart;
    }
    let total = view.len() as f64;
    let shares = value_counts(view.records().map(|r| r.payment_method.as_str()))
        .into_iter()
        .map(|(k, n)| (k, n as f64 / total * 100.0))
        .collect();
    chart.with_points(shares)
}

/// Distribution of review ratings.
pub fn review_distribution(view: &FilteredView<'_>) -> Option<BoxSummary> {
    box_summary(view.records().map(|r| r.review_rating))
}

/// The `n` locations with the highest mean purchase amount, highest first.
/// Equal means keep alphabetical order.
pub fn top_locations(view: &FilteredView<'_>, n: usize) -> CategoryChart {
    let mut means = mean_by(view.records().map(|r| (r.location.as_str(), r.purchase_amount)));
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means.truncate(n);
    CategoryChart::new(
        format!("Top {n} lokalizacji wg średnich wydatków"),
        "Lokalizacja",
        "Średnia kwota zakupów (USD)",
    )
    .with_points(means)
}

/// Number of purchases per season.
pub fn season_counts(view: &FilteredView<'_>) -> CategoryChart {
    let counts = value_counts(view.records().map(|r| r.season.as_str()));
    CategoryChart::new("Liczba zakupów w sezonach", "Sezon", "Liczba zakupów")
        .with_points(counts_as_f64(counts))
}

// ---------------------------------------------------------------------------
// All charts at once
// ---------------------------------------------------------------------------

/// Knobs for the aggregation passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateSettings {
    pub histogram_bins: usize,
    pub top_locations: usize,
}

impl Default for AggregateSettings {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            top_locations: 5,
        }
    }
}

/// Every chart of the dashboard for one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    pub category_counts: CategoryChart,
    pub season_mean_amount: CategoryChart,
    pub age_histogram: Vec<HistogramBin>,
    /// Density curve over `age_histogram`, in the same units.
    pub age_density: Vec<(f64, f64)>,
    pub payment_method_share: CategoryChart,
    pub review_distribution: Option<BoxSummary>,
    pub top_locations: CategoryChart,
    pub season_counts: CategoryChart,
}

impl DashboardCharts {
    pub fn compute(view: &FilteredView<'_>, settings: &AggregateSettings) -> Self {
        let histogram: Vec<HistogramBin> = age_histogram(view, settings.histogram_bins).collect();
        Self {
            category_counts: category_counts(view),
            season_mean_amount: season_mean_amount(view),
            age_density: age_density(view, &histogram),
            age_histogram: histogram,
            payment_method_share: payment_method_share(view),
            review_distribution: review_distribution(view),
            top_locations: top_locations(view, settings.top_locations),
            season_counts: season_counts(view),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::model::tests::record;
    use crate::data::model::{CategoricalColumn, ShoppingDataset};

    fn dataset() -> ShoppingDataset {
        let mut rows = vec![
            record(20, "Clothing", "Winter", 10.0),
            record(30, "Footwear", "Winter", 30.0),
            record(40, "Clothing", "Summer", 50.0),
            record(50, "Accessories", "Summer", 70.0),
            record(60, "Clothing", "Fall", 90.0),
        ];
        let locations = ["Maine", "Ohio", "Maine", "Texas", "Utah"];
        let payments = ["Cash", "Venmo", "Cash", "PayPal", "Cash"];
        for (i, r) in rows.iter_mut().enumerate() {
            r.location = locations[i].to_string();
            r.payment_method = payments[i].to_string();
            r.review_rating = 1.0 + i as f64 * 0.5;
        }
        ShoppingDataset::from_records(rows)
    }

    fn empty_view(ds: &ShoppingDataset) -> FilteredView<'_> {
        let mut criteria = FilterCriteria::accept_all();
        criteria
            .selections
            .insert(CategoricalColumn::Category, BTreeSet::new());
        apply(ds, &criteria)
    }

    #[test]
    fn counts_by_category_most_frequent_first() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        let chart = category_counts(&view);

        assert_eq!(chart.x_label, "Kategoria");
        assert_eq!(chart.y_label, "Liczba zakupów");
        assert_eq!(
            chart.points,
            vec![
                ("Clothing".to_string(), 3.0),
                ("Footwear".to_string(), 1.0),
                ("Accessories".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn season_mean_amount_per_key() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        let chart = season_mean_amount(&view);

        assert_eq!(chart.get("Winter"), Some(20.0));
        assert_eq!(chart.get("Summer"), Some(60.0));
        assert_eq!(chart.get("Fall"), Some(90.0));
        assert_eq!(chart.points.len(), 3);
    }

    #[test]
    fn season_counts_per_key() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        let chart = season_counts(&view);

        assert_eq!(chart.get("Winter"), Some(2.0));
        assert_eq!(chart.get("Fall"), Some(1.0));
        assert_eq!(chart.y_label, "Liczba zakupów");
    }

    #[test]
    fn payment_share_sums_to_hundred() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        let chart = payment_method_share(&view);

        let total: f64 = chart.points.iter().map(|(_, v)| v).sum();
        assert!((total - 100.0).abs() < 1e-9, "{total}");
        let cash = chart.get("Cash").unwrap();
        assert!((cash - 60.0).abs() < 1e-9);
        assert_eq!(chart.points[0].0, "Cash");
    }

    #[test]
    fn top_locations_sorted_descending_and_capped() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());

        let chart = top_locations(&view, 3);
        let names: Vec<&str> = chart.points.iter().map(|(k, _)| k.as_str()).collect();
        // Maine averages (10 + 50) / 2 = 30, tying with Ohio.
        assert_eq!(names, ["Utah", "Texas", "Maine"]);
        assert!(chart.points.windows(2).all(|w| w[0].1 >= w[1].1));

        assert_eq!(top_locations(&view, 5).points.len(), 4);
    }

    #[test]
    fn top_locations_title_names_the_count() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        assert_eq!(top_locations(&view, 5).title, "Top 5 lokalizacji wg średnich wydatków");
        assert_eq!(top_locations(&view, 3).title, "Top 3 lokalizacji wg średnich wydatków");
    }

    #[test]
    fn top_locations_ties_are_alphabetical() {
        let rows = ["Zurich", "Austin", "Miami"]
            .iter()
            .map(|loc| {
                let mut r = record(30, "Shoes", "Fall", 40.0);
                r.location = loc.to_string();
                r
            })
            .collect();
        let ds = ShoppingDataset::from_records(rows);
        let view = apply(&ds, &FilterCriteria::accept_all());

        let chart = top_locations(&view, 2);
        assert_eq!(chart.points[0].0, "Austin");
        assert_eq!(chart.points[1].0, "Miami");
    }

    #[test]
    fn histogram_covers_range_and_counts_every_value() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        let bins: Vec<HistogramBin> = age_histogram(&view, 4).collect();

        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 20.0);
        assert_eq!(bins[3].end, 60.0);
        // 60 lands in the closed last bin
        assert_eq!(
            bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 2]
        );
    }

    #[test]
    fn histogram_of_single_value_is_widened() {
        let bins: Vec<HistogramBin> = HistogramBins::new([42.0, 42.0], 2).collect();
        assert_eq!(bins[0].start, 41.5);
        assert_eq!(bins[1].end, 42.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn histogram_is_lazy_and_exact_size() {
        let mut bins = HistogramBins::new([1.0, 2.0, 3.0], 20);
        assert_eq!(bins.len(), 20);
        bins.next();
        assert_eq!(bins.len(), 19);
    }

    #[test]
    fn kde_needs_spread() {
        assert!(gaussian_kde(&[], 50).is_empty());
        assert!(gaussian_kde(&[42.0], 50).is_empty());
        assert!(gaussian_kde(&[42.0, 42.0, 42.0], 50).is_empty());
    }

    #[test]
    fn kde_matches_scott_bandwidth() {
        // mean 1, sample variance 2
        let curve = gaussian_kde(&[0.0, 2.0], 3);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].0, 0.0);
        assert_eq!(curve[1].0, 1.0);
        assert_eq!(curve[2].0, 2.0);

        let h = 2.0_f64.sqrt() * 2.0_f64.powf(-0.2);
        let at_mean = 2.0 * (-0.5 / (h * h)).exp() / (2.0 * h * (2.0 * PI).sqrt());
        assert!((curve[1].1 - at_mean).abs() < 1e-12);
        // symmetric around the mean
        assert!((curve[0].1 - curve[2].1).abs() < 1e-12);
    }

    #[test]
    fn age_density_is_scaled_to_histogram_counts() {
        let ds = dataset(); // ages 20..=60 step 10
        let view = apply(&ds, &FilterCriteria::accept_all());
        let histogram: Vec<HistogramBin> = age_histogram(&view, 4).collect();
        let curve = age_density(&view, &histogram);

        let ages = [20.0, 30.0, 40.0, 50.0, 60.0];
        let raw = gaussian_kde(&ages, DENSITY_POINTS);
        assert_eq!(curve.len(), DENSITY_POINTS);
        assert_eq!(curve[0].0, 20.0);
        assert!((curve[DENSITY_POINTS - 1].0 - 60.0).abs() < 1e-9);
        // five records, bins 10 years wide
        for (scaled, density) in curve.iter().zip(&raw) {
            assert!((scaled.1 - density.1 * 50.0).abs() < 1e-9);
        }
        assert!(curve.iter().all(|(_, y)| *y > 0.0));
    }

    #[test]
    fn box_summary_uses_linear_quartiles() {
        let summary = box_summary([1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 100.0);
        assert_eq!(summary.upper_whisker, 4.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn review_distribution_of_view() {
        let ds = dataset(); // ratings 1.0, 1.5, 2.0, 2.5, 3.0
        let view = apply(&ds, &FilterCriteria::accept_all());
        let summary = review_distribution(&view).unwrap();
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.q1, 1.5);
        assert_eq!(summary.q3, 2.5);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn empty_view_gives_empty_charts() {
        let ds = dataset();
        let view = empty_view(&ds);
        let charts = DashboardCharts::compute(&view, &AggregateSettings::default());

        assert!(charts.category_counts.is_empty());
        assert!(charts.season_mean_amount.is_empty());
        assert!(charts.age_histogram.is_empty());
        assert!(charts.age_density.is_empty());
        assert!(charts.payment_method_share.is_empty());
        assert!(charts.review_distribution.is_none());
        assert!(charts.top_locations.is_empty());
        assert!(charts.season_counts.is_empty());
    }

    #[test]
    fn compute_is_idempotent() {
        let ds = dataset();
        let view = apply(&ds, &FilterCriteria::accept_all());
        let settings = AggregateSettings::default();

        let a = DashboardCharts::compute(&view, &settings);
        let b = DashboardCharts::compute(&apply(&ds, &FilterCriteria::accept_all()), &settings);
        assert_eq!(a, b);
        assert_eq!(a.age_histogram.len(), 20);
        assert!(a.top_locations.points.len() <= 5);
    }
}
