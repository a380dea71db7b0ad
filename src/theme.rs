//! Centralized theme constants for the CREA-MG report
//! All colors, sizes, and styling should reference these constants

use egui::Color32;

// =============================================================================
// COLORS - Brand
// =============================================================================
pub const CREA_BLUE: Color32 = Color32::from_rgb(0x00, 0x33, 0x66);
pub const CREA_BLUE_HOVER: Color32 = Color32::from_rgb(0x00, 0x4b, 0x8d);
pub const CREA_YELLOW: Color32 = Color32::from_rgb(0xff, 0xcc, 0x00);

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::WHITE;
pub const BG_SIDEBAR: Color32 = Color32::from_rgb(0xf8, 0xf9, 0xfa);
pub const BG_SURFACE: Color32 = Color32::from_rgb(0xee, 0xf1, 0xf5);
pub const BG_HOVER: Color32 = Color32::from_rgb(0xe3, 0xea, 0xf2);

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = CREA_BLUE;
pub const TEXT_BODY: Color32 = Color32::from_rgb(0x1f, 0x29, 0x37);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);
pub const TEXT_ON_BRAND: Color32 = Color32::WHITE;

// =============================================================================
// COLORS - Borders
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0xdd, 0xe2, 0xe8);
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0xc3, 0xcb, 0xd5);

// =============================================================================
// COLORS - Chart
// =============================================================================
pub const CHART_BAR: Color32 = CREA_BLUE;
pub const CHART_BAR_HOVER: Color32 = CREA_BLUE_HOVER;
pub const CHART_GRID: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

// =============================================================================
// COLORS - Status
// =============================================================================
pub const STATUS_ERROR: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26);

// =============================================================================
// COLORS - Buttons
// =============================================================================
pub const BTN_DEFAULT: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);
pub const BTN_DANGER: Color32 = Color32::from_rgb(0xdc, 0x26, 0x26);

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_TITLE: f32 = 22.0;
pub const FONT_HEADING: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;
pub const FONT_LABEL: f32 = 12.0;
pub const FONT_SMALL: f32 = 10.0;

// =============================================================================
// DIMENSIONS
// =============================================================================
pub const HEADER_HEIGHT: f32 = 64.0;
pub const FOOTER_HEIGHT: f32 = 78.0;
pub const YEAR_BUTTON_HEIGHT: f32 = 34.0;
pub const CHART_MIN_HEIGHT: f32 = 480.0;
pub const LOGO_SIZE: f32 = 40.0;

// =============================================================================
// CORNER RADIUS
// =============================================================================
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;

// =============================================================================
// STROKE WIDTHS
// =============================================================================
pub const STROKE_DEFAULT: f32 = 1.0;

// =============================================================================
// SPACING
// =============================================================================
pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals {
        dark_mode: false,
        panel_fill: BG_BASE,
        window_fill: BG_BASE,
        extreme_bg_color: BG_BASE,
        faint_bg_color: BG_SIDEBAR,
        hyperlink_color: CREA_BLUE_HOVER,
        selection: egui::style::Selection {
            bg_fill: Color32::from_rgb(0xc7, 0xd7, 0xea),
            stroke: egui::Stroke::new(STROKE_DEFAULT, CREA_BLUE),
        },
        widgets: egui::style::Widgets {
            noninteractive: egui::style::WidgetVisuals {
                bg_fill: BG_SIDEBAR,
                weak_bg_fill: BG_SURFACE,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_BODY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            inactive: egui::style::WidgetVisuals {
                bg_fill: BG_SURFACE,
                weak_bg_fill: BTN_DEFAULT,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_BODY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            hovered: egui::style::WidgetVisuals {
                bg_fill: BG_HOVER,
                weak_bg_fill: BG_HOVER,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, CREA_BLUE),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            active: egui::style::WidgetVisuals {
                bg_fill: BG_HOVER,
                weak_bg_fill: BG_HOVER,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, CREA_BLUE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, CREA_BLUE),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: -1.0,
            },
            open: egui::style::WidgetVisuals {
                bg_fill: BG_SURFACE,
                weak_bg_fill: BG_SURFACE,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_BODY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
        },
        striped: true,
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
        window_corner_radius: egui::CornerRadius::same(8),
        ..egui::Visuals::light()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================
pub fn header_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(CREA_BLUE)
        .inner_margin(egui::Margin::symmetric(16, 10))
}

pub fn footer_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(CREA_BLUE)
        .inner_margin(egui::Margin::symmetric(16, 8))
}

pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_BASE)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(SPACING_LG as i8))
}

pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_BASE)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(SPACING_XL)
}

// =============================================================================
// HELPER - Button styles
// =============================================================================

/// Default gray button
pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_BODY))
        .fill(BTN_DEFAULT)
        .corner_radius(RADIUS_DEFAULT)
}

/// Brand blue button with bold white text
pub fn button_brand(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_ON_BRAND).strong())
        .fill(CREA_BLUE)
        .corner_radius(RADIUS_DEFAULT)
}

/// Danger red button (for destructive actions like clearing the cache)
pub fn button_danger(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(TEXT_ON_BRAND))
        .fill(BTN_DANGER)
        .corner_radius(RADIUS_DEFAULT)
}

/// Returns (fill, draw_rect) for a custom-painted button with hover/press effects.
/// Lightens on hover, slightly lightens + shrinks on press.
pub fn button_visual(
    response: &egui::Response,
    base_fill: Color32,
    rect: egui::Rect,
) -> (Color32, egui::Rect) {
    if response.is_pointer_button_down_on() {
        (lighten(base_fill, 0.06), rect.shrink(1.5))
    } else if response.hovered() {
        (lighten(base_fill, 0.12), rect)
    } else {
        (base_fill, rect)
    }
}

pub fn lighten(c: Color32, amount: f32) -> Color32 {
    let r = (c.r() as f32 + (255.0 - c.r() as f32) * amount) as u8;
    let g = (c.g() as f32 + (255.0 - c.g() as f32) * amount) as u8;
    let b = (c.b() as f32 + (255.0 - c.b() as f32) * amount) as u8;
    Color32::from_rgb(r, g, b)
}

/// `#rrggbb` form of a color, for the SVG export
pub fn hex(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(CREA_BLUE), "#003366");
        assert_eq!(hex(CREA_YELLOW), "#ffcc00");
    }

    #[test]
    fn test_lighten_moves_towards_white() {
        assert_eq!(lighten(Color32::BLACK, 0.0), Color32::BLACK);
        assert_eq!(lighten(Color32::BLACK, 1.0), Color32::WHITE);
        let l = lighten(CREA_BLUE, 0.5);
        assert!(l.r() > CREA_BLUE.r() && l.b() > CREA_BLUE.b());
    }
}
