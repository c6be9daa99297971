use egui::{Color32, FontFamily, FontId, Margin, Rounding, Style, TextStyle, Vec2, Visuals};

const LINE: Color32 = Color32::from_rgb(0xb4, 0xb4, 0xb4);
const BG: Color32 = Color32::from_rgb(0xef, 0xef, 0xef);
const PANEL: Color32 = Color32::from_rgb(0xf8, 0xf8, 0xf8);
const TEXT: Color32 = Color32::from_rgb(0x1c, 0x1c, 0x1c);
const PRIMARY: Color32 = Color32::from_rgb(0x2a, 0x6f, 0xd6);
const DANGER: Color32 = Color32::from_rgb(0x9e, 0x1b, 0x1b);
const HOVER: Color32 = Color32::from_rgb(0xdf, 0xee, 0xff);

/// Page separator rows.
pub const PAGE_HEADER_BG: Color32 = Color32::from_rgb(0xad, 0xd8, 0xe6);
/// Localized text that still equals the source text.
pub const PENDING_TEXT: Color32 = Color32::from_rgb(0xd0, 0x10, 0x10);
/// Read-only source and resource-name cells.
pub const READONLY_BG: Color32 = Color32::from_rgb(0xd3, 0xd3, 0xd3);

pub fn base_style() -> Style {
    let mut style = Style::default();
    style.spacing.item_spacing = Vec2::new(8.0, 6.0);
    style.spacing.button_padding = Vec2::new(12.0, 4.0);
    style.spacing.window_margin = Margin::same(8.0);
    style.spacing.menu_margin = Margin::same(6.0);
    style.visuals = base_visuals();
    style.text_styles = [
        (TextStyle::Heading, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
    ]
    .into();
    style
}

pub fn base_visuals() -> Visuals {
    let mut visuals = Visuals::light();
    visuals.override_text_color = Some(TEXT);
    visuals.window_fill = BG;
    visuals.panel_fill = PANEL;
    visuals.widgets.noninteractive.bg_stroke.color = LINE;
    visuals.widgets.inactive.bg_stroke.color = LINE;
    visuals.widgets.hovered.bg_fill = HOVER;
    visuals.widgets.hovered.bg_stroke.color = PRIMARY;
    visuals.widgets.active.bg_stroke.color = PRIMARY;
    visuals.selection.bg_fill = PRIMARY;
    visuals.selection.stroke.color = Color32::WHITE;
    visuals.window_stroke.color = LINE;
    visuals.window_rounding = Rounding::same(4.0);
    visuals.error_fg_color = DANGER;
    visuals.warn_fg_color = DANGER;
    visuals
}

pub fn apply_base_theme(ctx: &egui::Context) {
    ctx.set_style(base_style());
}
