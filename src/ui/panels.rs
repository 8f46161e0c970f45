use std::ops::RangeInclusive;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::FilteredView;
use crate::data::loader;
use crate::data::model::{CategoricalColumn, ShoppingDataset, YesNo, FILTER_COLUMNS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

fn filter_label(column: CategoricalColumn) -> &'static str {
    match column {
        CategoricalColumn::Category => "Kategorie produktów",
        CategoricalColumn::Season => "Sezon",
        CategoricalColumn::PaymentMethod => "Metoda płatności",
        CategoricalColumn::PreferredPaymentMethod => "Ulubiona metoda płatności",
        CategoricalColumn::Location => "Lokalizacja",
    }
}

/// Upper end of the bin slider unless the configuration asks for more.
const MAX_SLIDER_BINS: usize = 60;

/// Slider range over `lo..=hi`, stretched to include every value in
/// `current`. egui clamps a slider's value into its range when drawn, so
/// a configured value outside the data's bounds must stay reachable.
fn covering<T: Ord + Copy>(lo: T, hi: T, current: &[T]) -> RangeInclusive<T> {
    let lo = current.iter().copied().fold(lo, T::min);
    let hi = current.iter().copied().fold(hi, T::max);
    lo..=hi
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Opcje analizy");
    ui.separator();

    // Hold our own handle so the state can be mutated while we read it.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("Brak danych.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Age range ----
            ui.strong("Wiek klienta");
            let (age_min, age_max) = dataset.age_bounds().unwrap_or((0, 100));
            let (mut lo, mut hi) = state.criteria.age.unwrap_or((age_min, age_max));
            let age_span = covering(age_min, age_max, &[lo, hi]);
            let lo_changed = ui.add(Slider::new(&mut lo, age_span.clone()).text("od")).changed();
            let hi_changed = ui.add(Slider::new(&mut hi, age_span).text("do")).changed();
            if lo_changed || hi_changed {
                if lo > hi {
                    hi = lo;
                }
                log::debug!("age range set to {lo}..={hi}");
                state.criteria.age = Some((lo, hi));
            }
            ui.separator();

            // ---- Per-column multiselects (collapsible) ----
            for col in FILTER_COLUMNS {
                multiselect(ui, state, &dataset, col);
            }
            ui.separator();

            // ---- Thresholds ----
            ui.strong("Minimalna ocena recenzji");
            // Tenths of a star, so drawing never re-rounds the stored threshold.
            let stored = state.criteria.min_review_rating.unwrap_or(0.0);
            let mut tenths = (stored * 10.0).round() as i64;
            let rating_span = covering(0, 50, &[tenths]);
            let rating = Slider::new(&mut tenths, rating_span)
                .custom_formatter(|v, _| format!("{:.1}", v / 10.0))
                .custom_parser(|s| s.trim().parse::<f64>().ok().map(|v| v * 10.0));
            if ui.add(rating).changed() {
                state.criteria.min_review_rating = Some(tenths as f64 / 10.0);
            }

            ui.strong("Minimalna liczba wcześniejszych zakupów");
            let max_purchases = dataset.max_previous_purchases().unwrap_or(0);
            let mut purchases = state.criteria.min_previous_purchases.unwrap_or(0);
            let purchase_span = covering(0, max_purchases, &[purchases]);
            if ui.add(Slider::new(&mut purchases, purchase_span)).changed() {
                state.criteria.min_previous_purchases = Some(purchases);
            }
            ui.separator();

            // ---- Yes/No flags ----
            flag_selector(ui, "subscription", "Subskrypcja", &mut state.criteria.subscription);
            flag_selector(ui, "discount", "Rabat", &mut state.criteria.discount);
            ui.separator();

            ui.strong("Liczba przedziałów histogramu");
            let mut bins = state.settings.histogram_bins;
            let bin_span = covering(1, MAX_SLIDER_BINS, &[bins]);
            if ui.add(Slider::new(&mut bins, bin_span)).changed() {
                state.settings.histogram_bins = bins;
            }
            ui.separator();

            if ui.button("Przywróć domyślne").clicked() {
                state.reset_filters();
            }
        });
}

/// Checkbox list for one categorical column, with All / None buttons.
fn multiselect(
    ui: &mut Ui,
    state: &mut AppState,
    dataset: &ShoppingDataset,
    col: CategoricalColumn,
) {
    let all_values = dataset.unique_values(col);
    let n_total = all_values.len();
    let n_selected = state
        .criteria
        .selections
        .get(&col)
        .map_or(n_total, |s| s.len());
    let header_text = format!("{}  ({n_selected}/{n_total})", filter_label(col));

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(col.header())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Wszystkie").clicked() {
                    state.select_all(col);
                }
                if ui.small_button("Żadne").clicked() {
                    state.select_none(col);
                }
            });

            for val in all_values {
                let mut checked = state
                    .criteria
                    .selections
                    .get(&col)
                    .map_or(true, |s| s.contains(val));

                let mut text = RichText::new(val);
                if col == CategoricalColumn::Category {
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(val));
                    }
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_value(col, val);
                }
            }
        });
}

/// Any / Yes / No selector for a boolean-as-text column.
fn flag_selector(ui: &mut Ui, id: &str, label: &str, value: &mut Option<YesNo>) {
    let text = |v: Option<YesNo>| v.map_or("Dowolna", |f| f.as_str());
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(text(*value))
            .show_ui(ui, |ui: &mut Ui| {
                for option in [None, Some(YesNo::Yes), Some(YesNo::No)] {
                    ui.selectable_value(value, option, text(option));
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. `view` is this frame's filter result.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, view: Option<&FilteredView<'_>>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Plik", |ui: &mut Ui| {
            if ui.button("Otwórz…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Eksportuj filtrowane (CSV)…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, view) {
            ui.label(format!("{} rekordów, {} po filtrach", ds.len(), view.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Otwórz dane zakupowe")
        .add_filter("Obsługiwane pliki", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                state.set_dataset(Arc::new(dataset));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Błąd: {e}"));
            }
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Eksportuj filtrowane dane")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_shopping_trends.csv")
        .save_file()
    else {
        return;
    };

    let result = match state.view() {
        Some(view) => loader::save_csv(&path, view.records()).map(|()| view.len()),
        None => return,
    };

    match result {
        Ok(n) => {
            log::info!("Exported {n} records to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to export {}: {e}", path.display());
            state.status_message = Some(format!("Błąd eksportu: {e}"));
        }
    }
}
