//! Text metric heuristics and layout constants.
//!
//! Glyph widths are estimated instead of measured, so layout never needs a
//! font rasterizer.

use crate::types::{ElementKind, LabelConfig};

/// Average glyph advance as a fraction of font size
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of font size
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Symbol row height as a multiple of symbol size
pub const SYMBOL_ROW_HEIGHT_RATIO: f64 = 0.8;

/// Distance between progress slot centers as a multiple of symbol size
pub const SYMBOL_SPACING_RATIO: f64 = 1.4;

/// Downward nudge of the water group so drops line up with the suns
pub const WATER_DROP_OFFSET_RATIO: f64 = 0.3;

/// Base symbol size at the reference label size
pub const BASE_SYMBOL_SIZE: f64 = 4.0;

/// Margin kept inside the frame at the reference label size
pub const BASE_MARGIN: f64 = 2.0;

/// Vertical gap between elements at the reference label size
pub const BASE_ELEMENT_PADDING: f64 = 1.5;

/// Per-role font ceilings as a fraction of the base font size
pub struct RoleScale;

impl RoleScale {
    pub const COMMON_NAME: f64 = 1.0;
    pub const NICKNAME: f64 = 0.8;
    pub const SCIENTIFIC_NAME: f64 = 0.75;
}

/// OpenSCAD style tag per text role
pub struct RoleStyle;

impl RoleStyle {
    pub const COMMON_NAME: &'static str = "Bold";
    pub const NICKNAME: &'static str = "Bold Italic";
    pub const SCIENTIFIC_NAME: &'static str = "Italic";
}

/// Estimated width of `text` at `font_size`
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO
}

/// Largest font size allowed for a text role; 0 for the symbol row
pub fn max_font_size(config: &LabelConfig, kind: ElementKind) -> f64 {
    let scale = match kind {
        ElementKind::CommonNameText => RoleScale::COMMON_NAME,
        ElementKind::NicknameText => RoleScale::NICKNAME,
        ElementKind::ScientificText => RoleScale::SCIENTIFIC_NAME,
        ElementKind::SymbolRow => return 0.0,
    };
    config.text_height_base * scale
}

/// Font name with the role's style tag, e.g. "Liberation Sans:style=Italic"
pub fn font_with_style(font_name: &str, kind: ElementKind) -> String {
    let style = match kind {
        ElementKind::CommonNameText => RoleStyle::COMMON_NAME,
        ElementKind::NicknameText => RoleStyle::NICKNAME,
        ElementKind::ScientificText => RoleStyle::SCIENTIFIC_NAME,
        ElementKind::SymbolRow => return font_name.to_string(),
    };
    format!("{}:style={}", font_name, style)
}

/// Font size that fits `text` into `available_width`, capped at `ceiling`
pub fn fit_font_size(text: &str, available_width: f64, ceiling: f64) -> f64 {
    let chars = text.chars().count();
    if chars == 0 {
        return ceiling;
    }
    ceiling.min(available_width / (chars as f64 * GLYPH_WIDTH_RATIO))
}
