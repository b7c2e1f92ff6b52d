use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Ui, Vec2, pos2};

use crate::color::{correlation_color, undefined_cell_color};
use crate::state::AppState;
use crate::ui::table;

const LABEL_GUTTER: f32 = 110.0;
const TABLE_HEIGHT: f32 = 170.0;

// ---------------------------------------------------------------------------
// Correlation heatmap (central panel)
// ---------------------------------------------------------------------------

/// Render the correlation heatmap plus the strongest-pairs table below it.
pub fn heatmap_view(ui: &mut Ui, state: &AppState) {
    let Some(matrix) = &state.matrix else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore correlations  (File → Open…)");
        });
        return;
    };

    let grid_height = (ui.available_height() - TABLE_HEIGHT).max(120.0);
    let desired = Vec2::new(ui.available_width(), grid_height);
    let (response, painter) = ui.allocate_painter(desired, Sense::hover());
    let rect = response.rect;

    let n = matrix.len();
    let cell = ((rect.width() - LABEL_GUTTER) / n as f32)
        .min((rect.height() - 24.0) / n as f32)
        .max(4.0);
    let origin = pos2(rect.left() + LABEL_GUTTER, rect.top() + 24.0);

    // Column labels along the top, row labels on the left.
    for (i, var) in matrix.variables().iter().enumerate() {
        painter.text(
            pos2(origin.x + (i as f32 + 0.5) * cell, rect.top() + 12.0),
            Align2::CENTER_CENTER,
            var,
            FontId::proportional(11.0),
            ui.visuals().text_color(),
        );
        painter.text(
            pos2(origin.x - 6.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            var,
            FontId::proportional(11.0),
            ui.visuals().text_color(),
        );
    }

    // Cells, coloured on the diverging scale; undefined cells are grey.
    for i in 0..n {
        for j in 0..n {
            let cell_rect = Rect::from_min_size(
                pos2(origin.x + j as f32 * cell, origin.y + i as f32 * cell),
                Vec2::splat(cell - 1.0),
            );
            let color = match matrix.get(i, j) {
                Some(r) => correlation_color(r),
                None => undefined_cell_color(),
            };
            painter.rect_filled(cell_rect, 2.0, color);

            if cell >= 34.0 {
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    matrix.display_value(i, j),
                    FontId::proportional(11.0),
                    text_color_for(color),
                );
            }
        }
    }

    // Hover text for the cell under the pointer.
    if let Some(pos) = response.hover_pos() {
        let col = ((pos.x - origin.x) / cell).floor();
        let row = ((pos.y - origin.y) / cell).floor();
        if (0.0..n as f32).contains(&col) && (0.0..n as f32).contains(&row) {
            let (i, j) = (row as usize, col as usize);
            egui::show_tooltip_at_pointer(
                ui.ctx(),
                ui.layer_id(),
                response.id.with((i, j)),
                |ui: &mut Ui| {
                    ui.label(matrix.hover_text(i, j));
                },
            );
        }
    }

    ui.separator();
    table::strongest_pairs_table(ui, matrix);
}

/// Dark text on light cells, light text on dark cells.
fn text_color_for(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::from_gray(25)
    } else {
        Color32::from_gray(235)
    }
}
