use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::analysis::CorrelationMatrix;

/// How many pairs the strongest-pairs table shows.
const TOP_K: usize = 10;

// ---------------------------------------------------------------------------
// Strongest correlations table (below the heatmap)
// ---------------------------------------------------------------------------

pub fn strongest_pairs_table(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ui.strong("Strongest pairs");

    let pairs = matrix.strongest_pairs(TOP_K);
    if pairs.is_empty() {
        ui.label("No defined correlation pairs.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Variable A");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Variable B");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("r");
            });
        })
        .body(|mut body| {
            for (a, b, r) in &pairs {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(a);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(b);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{r:.2}"));
                    });
                });
            }
        });
}
