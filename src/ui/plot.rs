use eframe::egui::{Color32, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, Plot, Points};

use crate::color::{generate_palette, ColorMap};
use crate::data::aggregate::{BoxSummary, CategoryChart, DashboardCharts, HistogramBin};
use crate::data::filter::FilteredView;
use crate::state::AppState;
use crate::ui::table;

const CHART_HEIGHT: f32 = 260.0;
const EMPTY_CHART: &str = "Brak danych dla wybranych filtrów.";

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered table and every chart in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState, view: Option<&FilteredView<'_>>) {
    ui.heading("Shopping Trends Dashboard");

    let Some(view) = view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Otwórz plik z danymi  (Plik → Otwórz…)");
        });
        return;
    };
    log::trace!("recomputing charts over {} records", view.len());
    let charts = DashboardCharts::compute(view, &state.settings);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filtrowane dane");
            table::filtered_table(ui, view);

            ui.add_space(12.0);
            ui.heading("Analiza wizualna");

            let by_category = state.color_map.as_ref();
            bar_chart(ui, "category_counts", &charts.category_counts, |_, key| {
                by_category.map_or(Color32::LIGHT_BLUE, |cm: &ColorMap| cm.color_for(key))
            });
            bar_chart(
                ui,
                "season_mean_amount",
                &charts.season_mean_amount,
                palette_for(&charts.season_mean_amount, 200.0),
            );
            age_histogram(ui, &charts.age_histogram, &charts.age_density);
            bar_chart(
                ui,
                "payment_method_share",
                &charts.payment_method_share,
                palette_for(&charts.payment_method_share, 40.0),
            );
            review_box_plot(ui, charts.review_distribution.as_ref());
            bar_chart(
                ui,
                "top_locations",
                &charts.top_locations,
                palette_for(&charts.top_locations, 160.0),
            );
            bar_chart(
                ui,
                "season_counts",
                &charts.season_counts,
                palette_for(&charts.season_counts, 100.0),
            );
        });
}

/// Colour by bar position, from a hue wheel rotated by `offset`.
fn palette_for(chart: &CategoryChart, offset: f32) -> impl Fn(usize, &str) -> Color32 {
    let colors = generate_palette(chart.points.len(), offset);
    move |i: usize, _: &str| colors.get(i).copied().unwrap_or(Color32::LIGHT_BLUE)
}

/// Axis text for the bar at integer position `x`; blank between bars.
fn category_label(labels: &[String], x: f64) -> String {
    if x < -0.01 || (x - x.round()).abs() > 0.01 {
        return String::new();
    }
    labels.get(x.round() as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, id: &str, chart: &CategoryChart, color: impl Fn(usize, &str) -> Color32) {
    ui.strong(chart.title.as_str());
    if chart.is_empty() {
        ui.label(EMPTY_CHART);
        return;
    }

    let labels: Vec<String> = chart.points.iter().map(|(k, _)| k.clone()).collect();
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            Bar::new(i as f64, *value)
                .name(key)
                .fill(color(i, key.as_str()))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(chart.x_label)
        .y_axis_label(chart.y_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn age_histogram(ui: &mut Ui, bins: &[HistogramBin], density: &[(f64, f64)]) {
    ui.strong("Rozkład wieku klientów");
    if bins.is_empty() {
        ui.label(EMPTY_CHART);
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.0}–{:.0}", b.start, b.end))
                .fill(Color32::from_rgb(128, 0, 128))
                .stroke((1.0, Color32::BLACK))
        })
        .collect();
    let curve: Vec<[f64; 2]> = density.iter().map(|&(x, y)| [x, y]).collect();

    Plot::new("age_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Wiek")
        .y_axis_label("Liczba klientów")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            if !curve.is_empty() {
                plot_ui.line(Line::new(curve).color(Color32::from_rgb(75, 0, 130)).width(2.0));
            }
        });
}

fn review_box_plot(ui: &mut Ui, summary: Option<&BoxSummary>) {
    ui.strong("Rozkład ocen recenzji");
    let Some(s) = summary else {
        ui.label(EMPTY_CHART);
        return;
    };

    let spread = BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker);
    let elem = BoxElem::new(0.0, spread)
        .name("Ocena recenzji")
        .fill(Color32::from_rgb(255, 165, 0))
        .box_width(0.5);
    let outliers: Vec<[f64; 2]> = s.outliers.iter().map(|&v| [v, 0.0]).collect();

    Plot::new("review_distribution")
        .height(CHART_HEIGHT * 0.6)
        .x_axis_label("Ocena recenzji")
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal());
            if !outliers.is_empty() {
                plot_ui.points(Points::new(outliers).radius(3.0).color(Color32::DARK_GRAY));
            }
        });
}
