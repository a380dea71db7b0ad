//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use eframe::egui;

/// Year selector button. Selected years are filled with the brand blue and
/// underlined in yellow.
pub fn year_button(ui: &mut egui::Ui, year: i32, selected: bool, width: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(width, theme::YEAR_BUTTON_HEIGHT),
        egui::Sense::click(),
    );

    if ui.is_rect_visible(rect) {
        let base = if selected { theme::CREA_BLUE } else { theme::BTN_DEFAULT };
        let (fill, draw_rect) = theme::button_visual(&response, base, rect);
        let painter = ui.painter();
        painter.rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
        if selected {
            let underline = egui::Rect::from_min_max(
                egui::pos2(draw_rect.min.x + 6.0, draw_rect.max.y - 3.0),
                egui::pos2(draw_rect.max.x - 6.0, draw_rect.max.y - 1.0),
            );
            painter.rect_filled(underline, 1.0, theme::CREA_YELLOW);
        }
        let color = if selected { theme::TEXT_ON_BRAND } else { theme::TEXT_PRIMARY };
        painter.text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            year.to_string(),
            egui::FontId::proportional(theme::FONT_HEADING),
            color,
        );
    }

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response
}

/// Small label/value pair shown above the chart
pub fn stat(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(label)
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_MUTED),
            )
            .selectable(false),
        );
        ui.add(
            egui::Label::new(
                egui::RichText::new(value)
                    .size(theme::FONT_HEADING)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            )
            .selectable(false),
        );
    });
}

/// Red inline error message with an icon
pub fn error_banner(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(theme::lighten(theme::STATUS_ERROR, 0.9))
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::STATUS_ERROR))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                        .size(theme::FONT_HEADING)
                        .color(theme::STATUS_ERROR),
                );
                ui.label(egui::RichText::new(message).color(theme::STATUS_ERROR));
            });
        });
}
