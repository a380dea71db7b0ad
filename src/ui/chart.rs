//! On-screen rendering of the ranking bar chart

use crate::chart::{self, Bounds};
use crate::constants::*;
use crate::ranking::ActivityRanking;
use crate::theme;
use crate::utils::format_count;
use eframe::egui;
use std::f32::consts::FRAC_PI_2;

fn to_rect(origin: egui::Pos2, b: &Bounds) -> egui::Rect {
    egui::Rect::from_min_size(origin + egui::vec2(b.x, b.y), egui::vec2(b.w, b.h))
}

/// Paint the chart into the remaining space of `ui`.
pub fn bar_chart(ui: &mut egui::Ui, ranking: &ActivityRanking) {
    let size = egui::vec2(
        ui.available_width(),
        ui.available_height().max(theme::CHART_MIN_HEIGHT),
    );
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let origin = response.rect.min;
    let geometry = chart::layout(ranking, size.x, size.y);
    let plot = to_rect(origin, &geometry.plot);

    painter.rect_filled(response.rect, 0.0, theme::BG_BASE);

    painter.text(
        egui::pos2(response.rect.center().x, origin.y + 22.0),
        egui::Align2::CENTER_CENTER,
        &geometry.title,
        egui::FontId::proportional(theme::FONT_TITLE - 4.0),
        theme::TEXT_PRIMARY,
    );

    // Dashed vertical grid with tick labels
    let grid_stroke = egui::Stroke::new(theme::STROKE_DEFAULT, theme::CHART_GRID);
    for tick in &geometry.ticks {
        let x = origin.x + tick.x;
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(x, plot.top()), egui::pos2(x, plot.bottom())],
            grid_stroke,
            6.0,
            4.0,
        ));
        painter.text(
            egui::pos2(x, plot.bottom() + 6.0),
            egui::Align2::CENTER_TOP,
            &tick.label,
            egui::FontId::proportional(theme::FONT_LABEL),
            theme::TEXT_PRIMARY,
        );
    }

    let hover = response.hover_pos();
    let mut hovered_bar = None;
    let label_width = (geometry.label_right - 36.0).max(40.0);

    for (i, bar) in geometry.bars.iter().enumerate() {
        let rect = to_rect(origin, &bar.rect);
        // The whole row is hoverable, not just the painted bar
        let row = egui::Rect::from_min_max(
            egui::pos2(origin.x, rect.top()),
            egui::pos2(plot.right(), rect.bottom()),
        );
        let is_hovered = hover.is_some_and(|p| row.contains(p));
        if is_hovered {
            hovered_bar = Some(i);
        }
        let fill = if is_hovered { theme::CHART_BAR_HOVER } else { theme::CHART_BAR };
        painter.rect_filled(rect, 0.0, fill);

        let galley = painter.layout(
            bar.activity.trim().to_string(),
            egui::FontId::proportional(theme::FONT_LABEL),
            theme::TEXT_PRIMARY,
            label_width,
        );
        let label_pos = egui::pos2(
            origin.x + geometry.label_right - galley.size().x,
            rect.center().y - galley.size().y / 2.0,
        );
        painter.galley(label_pos, galley, theme::TEXT_PRIMARY);

        painter.text(
            egui::pos2(origin.x + bar.value_x, rect.center().y),
            egui::Align2::LEFT_CENTER,
            &bar.value_label,
            egui::FontId::proportional(theme::FONT_LABEL - 1.0),
            theme::TEXT_PRIMARY,
        );
    }

    painter.rect_stroke(
        plot,
        0.0,
        egui::Stroke::new(theme::STROKE_DEFAULT, theme::CREA_BLUE),
        egui::StrokeKind::Middle,
    );

    painter.text(
        egui::pos2(plot.center().x, plot.bottom() + 34.0),
        egui::Align2::CENTER_TOP,
        CHART_X_LABEL,
        egui::FontId::proportional(theme::FONT_BODY),
        theme::TEXT_PRIMARY,
    );

    let y_label = painter.layout_no_wrap(
        CHART_Y_LABEL.to_string(),
        egui::FontId::proportional(theme::FONT_BODY),
        theme::TEXT_PRIMARY,
    );
    let y_label_pos = egui::pos2(
        origin.x + 4.0,
        plot.center().y + y_label.size().x / 2.0,
    );
    painter.add(
        egui::epaint::TextShape::new(y_label_pos, y_label, theme::TEXT_PRIMARY)
            .with_angle(-FRAC_PI_2),
    );

    let corner = response.rect.right_bottom() - egui::vec2(12.0, 8.0);
    painter.text(
        corner - egui::vec2(0.0, 16.0),
        egui::Align2::RIGHT_BOTTOM,
        ORG_SHORT,
        egui::FontId::proportional(theme::FONT_BODY),
        theme::TEXT_PRIMARY,
    );
    painter.text(
        corner,
        egui::Align2::RIGHT_BOTTOM,
        ORG_URL_LABEL,
        egui::FontId::proportional(theme::FONT_SMALL),
        theme::TEXT_PRIMARY,
    );

    if let Some(i) = hovered_bar {
        let bar = &geometry.bars[i];
        response.on_hover_text_at_pointer(format!(
            "{}\n{} inspeções ({})",
            bar.activity.trim(),
            format_count(bar.count),
            bar.value_label
        ));
    }
}
