use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::AggregateSettings;
use crate::data::filter::{self, FilterCriteria, FilteredView};
use crate::data::model::{CategoricalColumn, ShoppingDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is opened). Never mutated.
    pub dataset: Option<Arc<ShoppingDataset>>,

    /// Current sidebar control values.
    pub criteria: FilterCriteria,

    pub settings: AggregateSettings,

    pub config: DashboardConfig,

    /// Bar colours per category value, stable across filter changes.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::accept_all(),
            settings: config.aggregate_settings(),
            config,
            color_map: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to their defaults.
    pub fn set_dataset(&mut self, dataset: Arc<ShoppingDataset>) {
        self.criteria = FilterCriteria::initial(&dataset, &self.config.filters);
        self.color_map = Some(ColorMap::new(
            dataset.unique_values(CategoricalColumn::Category),
        ));
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Restore the configured default filters for the current dataset.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::initial(ds, &self.config.filters);
            log::debug!("filters reset to defaults");
        }
    }

    /// Records passing the current criteria, recomputed from scratch.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        let ds = self.dataset.as_deref()?;
        Some(filter::apply(ds, &self.criteria))
    }

    /// Whether the dataset or the criteria differ from the given snapshot.
    pub fn differs_from(
        &self,
        dataset: Option<&Arc<ShoppingDataset>>,
        criteria: &FilterCriteria,
    ) -> bool {
        let same_dataset = match (self.dataset.as_ref(), dataset) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        !same_dataset || self.criteria != *criteria
    }

    /// Toggle a single value in a column's selection.
    ///
    /// An unconstrained column counts as fully selected, so toggling a
    /// value there deselects just that value.
    pub fn toggle_value(&mut self, column: CategoricalColumn, value: &str) {
        let dataset = self.dataset.as_deref();
        let selected = self.criteria.selections.entry(column).or_insert_with(|| {
            dataset
                .map(|ds| ds.unique_values(column).iter().cloned().collect())
                .unwrap_or_default()
        });
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        log::debug!("{column}: {} values selected", selected.len());
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: CategoricalColumn) {
        if let Some(ds) = &self.dataset {
            let all = ds.unique_values(column).iter().cloned().collect();
            self.criteria.selections.insert(column, all);
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: CategoricalColumn) {
        self.criteria.selections.insert(column, BTreeSet::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::DashboardCharts;
    use crate::data::model::tests::record;
    use crate::data::model::YesNo;

    fn loaded_state() -> AppState {
        let mut old = record(70, "Shoes", "Winter", 10.0);
        old.subscription_status = YesNo::No;
        let ds = ShoppingDataset::from_records(vec![
            record(25, "Shoes", "Summer", 50.0),
            record(30, "Clothing", "Summer", 20.0),
            old,
        ]);
        let mut state = AppState::default();
        state.set_dataset(Arc::new(ds));
        state
    }

    #[test]
    fn nothing_to_show_without_dataset() {
        let state = AppState::default();
        assert!(state.view().is_none());
    }

    #[test]
    fn set_dataset_applies_default_filters() {
        let state = loaded_state();
        assert_eq!(state.view().unwrap().indices(), &[0, 1]);
        let charts = DashboardCharts::compute(&state.view().unwrap(), &state.settings);
        assert_eq!(charts.category_counts.get("Shoes"), Some(1.0));
        assert_eq!(charts.category_counts.get("Clothing"), Some(1.0));
    }

    #[test]
    fn toggle_and_select_helpers() {
        let mut state = loaded_state();

        state.toggle_value(CategoricalColumn::Category, "Clothing");
        assert_eq!(state.view().unwrap().indices(), &[0]);

        state.select_none(CategoricalColumn::Season);
        assert!(state.view().unwrap().is_empty());
        let charts = DashboardCharts::compute(&state.view().unwrap(), &state.settings);
        assert!(charts.category_counts.is_empty());

        state.select_all(CategoricalColumn::Season);
        state.toggle_value(CategoricalColumn::Category, "Clothing");
        assert_eq!(state.view().unwrap().len(), 2);
    }

    #[test]
    fn toggle_on_unconstrained_column_deselects_only_that_value() {
        let mut state = loaded_state();
        state.criteria = FilterCriteria::accept_all();

        state.toggle_value(CategoricalColumn::Category, "Clothing");
        let selected = &state.criteria.selections[&CategoricalColumn::Category];
        assert_eq!(selected, &BTreeSet::from(["Shoes".to_string()]));
        assert_eq!(state.view().unwrap().indices(), &[0, 2]);
    }

    #[test]
    fn snapshot_comparison_tracks_edits_and_reloads() {
        let mut state = loaded_state();
        let dataset = state.dataset.clone();
        let criteria = state.criteria.clone();
        assert!(!state.differs_from(dataset.as_ref(), &criteria));

        state.select_none(CategoricalColumn::Season);
        assert!(state.differs_from(dataset.as_ref(), &criteria));

        state.criteria = criteria.clone();
        let same_rows = ShoppingDataset::clone(state.dataset.as_deref().unwrap());
        state.set_dataset(Arc::new(same_rows));
        assert!(state.differs_from(dataset.as_ref(), &state.criteria));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = loaded_state();
        state.criteria = FilterCriteria::accept_all();
        assert_eq!(state.view().unwrap().len(), 3);

        state.reset_filters();
        assert_eq!(state.view().unwrap().len(), 2);
    }
}
