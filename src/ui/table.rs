use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::{Record, REQUIRED_COLUMNS};

const ROW_HEIGHT: f32 = 18.0;

/// Cell texts of `rec`, in [`REQUIRED_COLUMNS`] order.
fn record_cells(rec: &Record) -> [String; 11] {
    [
        rec.age.to_string(),
        rec.category.clone(),
        format!("{:.1}", rec.review_rating),
        rec.previous_purchases.to_string(),
        rec.season.clone(),
        rec.payment_method.clone(),
        rec.preferred_payment_method.clone(),
        rec.subscription_status.to_string(),
        rec.discount_applied.to_string(),
        format!("{:.2}", rec.purchase_amount),
        rec.location.clone(),
    ]
}

/// Scrollable table of the filtered records. Only visible rows are laid out.
pub fn filtered_table(ui: &mut Ui, view: &FilteredView<'_>) {
    ui.label(format!("{} rekordów", view.len()));

    TableBuilder::new(ui)
        .id_salt("filtered_table")
        .striped(true)
        .resizable(true)
        .max_scroll_height(240.0)
        .columns(Column::auto().at_least(60.0), REQUIRED_COLUMNS.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for name in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let Some(rec) = view.get(row.index()) else {
                    return;
                };
                for cell in record_cells(rec) {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
