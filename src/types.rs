//! Type definitions for plant label configuration, content and scenes

use serde::{Deserialize, Serialize};

use crate::glyph::{SymbolKind, SymbolShape, SymbolStyle};

/// Reference width (mm) the absolute defaults were tuned against
pub const BASE_WIDTH: f64 = 80.0;
/// Reference height (mm) the absolute defaults were tuned against
pub const BASE_HEIGHT: f64 = 30.0;

/// Number of slots in a water/light progress group
pub const PROGRESS_SLOTS: u8 = 4;

/// A 2D point in label coordinates (mm, origin at the label center, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Format a coordinate for text output: at most 4 decimals, no trailing zeros
pub fn fmt_num(n: f64) -> String {
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Raw, user-supplied label parameters before scaling.
///
/// Every field has a default, so a JSON defaults file may set any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLabelParams {
    /// Label width in mm. Default: 80
    pub width: f64,
    /// Label height in mm. Default: 30
    pub height: f64,
    /// Label body thickness in mm. Default: 2
    pub thickness: f64,
    /// Corner radius at the reference size. Default: 3
    pub corner_radius: f64,
    /// Border width at the reference size. Default: 1.5
    pub frame_width: f64,
    /// How far the border rises above the body. Default: 0.6
    pub frame_height: f64,
    pub frame_enabled: bool,
    /// Base font size (OpenSCAD text "size") at the reference size. Default: 8
    pub text_height: f64,
    pub text_size_multiplier: f64,
    /// How far text and symbols rise above the body. Default: 0.6
    pub relief_height: f64,
    pub symbol_size_multiplier: f64,
    pub font_name: String,
    pub spike_length: f64,
    pub spike_width: f64,
    pub spike_taper_ratio: f64,
    /// -1 = left edge, 0 = centered, 1 = right edge
    pub spike_position: f64,
    /// Leg length of the base gussets; 0 disables them
    pub spike_gusset_size: f64,
    pub spike_enabled: bool,
    pub hole_diameter: f64,
    pub hole_margin_x: f64,
    pub hole_margin_y: f64,
    pub holes_enabled: bool,
}

impl Default for RawLabelParams {
    fn default() -> Self {
        Self {
            width: BASE_WIDTH,
            height: BASE_HEIGHT,
            thickness: 2.0,
            corner_radius: 3.0,
            frame_width: 1.5,
            frame_height: 0.6,
            frame_enabled: true,
            text_height: 8.0,
            text_size_multiplier: 1.0,
            relief_height: 0.6,
            symbol_size_multiplier: 1.0,
            font_name: "Liberation Sans".to_string(),
            spike_length: 40.0,
            spike_width: 10.0,
            spike_taper_ratio: 0.3,
            spike_position: 0.0,
            spike_gusset_size: 4.0,
            spike_enabled: true,
            hole_diameter: 3.0,
            hole_margin_x: 5.0,
            hole_margin_y: 5.0,
            holes_enabled: true,
        }
    }
}

/// Planting spike parameters (not scaled with the label)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeConfig {
    pub length: f64,
    pub width: f64,
    pub taper_ratio: f64,
    pub position: f64,
    pub gusset_size: f64,
    pub enabled: bool,
}

/// Hanging hole parameters (already scaled)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleConfig {
    pub diameter: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub enabled: bool,
}

/// Resolved, immutable configuration for one label.
///
/// Built by [`crate::layout::resolve`]; every scaled field is a linear
/// function of `avg_scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub avg_scale: f64,
    pub corner_radius: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    pub frame_enabled: bool,
    /// Scaled base font size, multiplier included
    pub text_height_base: f64,
    pub text_size_multiplier: f64,
    pub symbol_size_multiplier: f64,
    /// Scaled base symbol size
    pub symbol_size: f64,
    /// Fixed margin kept inside the frame on every side
    pub margin: f64,
    /// Vertical gap between stacked elements
    pub element_padding: f64,
    pub relief_height: f64,
    pub font_name: String,
    pub spike: SpikeConfig,
    pub holes: HoleConfig,
}

// ============================================================================
// Content
// ============================================================================

/// Show-flags for every optional element of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowFlags {
    pub common_name: bool,
    pub scientific_name: bool,
    pub nickname: bool,
    pub water: bool,
    pub light: bool,
    /// Cactus glyph: let the soil dry between waterings
    pub dry_soil: bool,
    pub frame: bool,
    pub spike: bool,
    pub holes: bool,
}

impl Default for ShowFlags {
    fn default() -> Self {
        Self {
            common_name: true,
            scientific_name: true,
            nickname: true,
            water: true,
            light: true,
            dry_soil: false,
            frame: true,
            spike: false,
            holes: false,
        }
    }
}

/// Text and enable state for one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSet {
    pub common_name: String,
    pub scientific_name: String,
    pub nickname: String,
    /// 0..=4 filled water drops
    pub water_level: u8,
    /// 0..=4 filled suns
    pub light_level: u8,
    pub show: ShowFlags,
}

impl Default for ContentSet {
    fn default() -> Self {
        Self {
            common_name: String::new(),
            scientific_name: String::new(),
            nickname: String::new(),
            water_level: 2,
            light_level: 2,
            show: ShowFlags::default(),
        }
    }
}

impl ContentSet {
    /// Text for a text element kind; `None` for the symbol row
    pub fn text_for(&self, kind: ElementKind) -> Option<&str> {
        match kind {
            ElementKind::NicknameText => Some(&self.nickname),
            ElementKind::CommonNameText => Some(&self.common_name),
            ElementKind::ScientificText => Some(&self.scientific_name),
            ElementKind::SymbolRow => None,
        }
    }

    /// Whether an element takes part in the vertical layout.
    ///
    /// Text needs its flag and a non-blank string; the symbol row needs any
    /// one of its water/light/dry-soil flags.
    pub fn is_active(&self, kind: ElementKind) -> bool {
        match kind {
            ElementKind::NicknameText => self.show.nickname && !self.nickname.trim().is_empty(),
            ElementKind::CommonNameText => {
                self.show.common_name && !self.common_name.trim().is_empty()
            }
            ElementKind::ScientificText => {
                self.show.scientific_name && !self.scientific_name.trim().is_empty()
            }
            ElementKind::SymbolRow => self.show.water || self.show.light || self.show.dry_soil,
        }
    }
}

// ============================================================================
// Layout output
// ============================================================================

/// Kind of a vertically stacked element, in top-to-bottom priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    NicknameText,
    CommonNameText,
    ScientificText,
    SymbolRow,
}

impl ElementKind {
    /// All kinds, top to bottom
    pub const ORDER: [ElementKind; 4] = [
        ElementKind::NicknameText,
        ElementKind::CommonNameText,
        ElementKind::ScientificText,
        ElementKind::SymbolRow,
    ];

    pub fn is_text(self) -> bool {
        !matches!(self, ElementKind::SymbolRow)
    }
}

/// One positioned element of the vertical stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    pub kind: ElementKind,
    /// Font size for text, symbol size for the symbol row
    pub size: f64,
    pub height: f64,
    pub center_y: f64,
}

impl LayoutElement {
    pub fn top(&self) -> f64 {
        self.center_y + self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center_y - self.height / 2.0
    }
}

/// Result of the vertical layout solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalLayout {
    pub elements: Vec<LayoutElement>,
    /// Global shrink factor, always in (0, 1]
    pub shrink: f64,
    /// Height of the stacked block after shrinking
    pub block_height: f64,
    pub usable_height: f64,
    pub available_width: f64,
    /// Gap between elements after shrinking
    pub padding: f64,
    /// Frame margin the solver worked with (0 when no frame is emitted)
    pub frame_margin: f64,
}

impl VerticalLayout {
    pub fn element(&self, kind: ElementKind) -> Option<&LayoutElement> {
        self.elements.iter().find(|e| e.kind == kind)
    }
}

// ============================================================================
// Scene
// ============================================================================

/// A horizontal run of four water drops or suns, the first `level` filled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolProgressGroup {
    pub kind: SymbolKind,
    pub level: u8,
    /// Center of the leftmost slot
    pub origin: Point,
    /// Distance between slot centers
    pub spacing: f64,
    pub size: f64,
}

impl SymbolProgressGroup {
    pub fn slot_style(&self, index: u8) -> SymbolStyle {
        if index < self.level {
            SymbolStyle::Filled
        } else {
            SymbolStyle::Outlined
        }
    }

    /// Center and shape of every slot, left to right
    pub fn slots(&self) -> impl Iterator<Item = (Point, SymbolShape)> + '_ {
        (0..PROGRESS_SLOTS).map(move |i| {
            let center = self.origin.offset(self.spacing * f64::from(i), 0.0);
            (
                center,
                SymbolShape {
                    kind: self.kind,
                    style: self.slot_style(i),
                },
            )
        })
    }

    pub fn filled_count(&self) -> usize {
        self.slots()
            .filter(|(_, shape)| shape.style == SymbolStyle::Filled)
            .count()
    }
}

/// A positioned text line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub kind: ElementKind,
    pub text: String,
    /// Font name with style tag, e.g. "Liberation Sans:style=Bold"
    pub font: String,
    pub size: f64,
    pub center: Point,
}

/// A positioned stand-alone symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedSymbol {
    pub shape: SymbolShape,
    pub size: f64,
    pub center: Point,
}

/// The tapered planting spike and its optional gussets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub base_center: Point,
    pub base_width: f64,
    pub tip_width: f64,
    pub length: f64,
    /// Quadrilateral: base left, base right, tip right, tip left
    pub outline: Vec<Point>,
    /// Triangles at the base corners, empty when gussets are disabled
    pub gussets: Vec<Vec<Point>>,
}

/// Everything a drawing backend needs to build one label, in draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SceneItem {
    /// Rounded-rectangle label body
    Body {
        width: f64,
        height: f64,
        thickness: f64,
        corner_radius: f64,
    },
    /// Raised border ring on top of the body
    Frame {
        width: f64,
        height: f64,
        corner_radius: f64,
        frame_width: f64,
        frame_height: f64,
    },
    Text(PlacedText),
    Progress(SymbolProgressGroup),
    Symbol(PlacedSymbol),
    /// Through-hole cut from the body and frame
    Hole { center: Point, diameter: f64, depth: f64 },
    Spike(Spike),
}

/// A fully positioned label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScene {
    pub config: LabelConfig,
    pub layout: VerticalLayout,
    pub items: Vec<SceneItem>,
}

impl LabelScene {
    pub fn texts(&self) -> impl Iterator<Item = &PlacedText> {
        self.items.iter().filter_map(|item| match item {
            SceneItem::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn progress_group(&self, kind: SymbolKind) -> Option<&SymbolProgressGroup> {
        self.items.iter().find_map(|item| match item {
            SceneItem::Progress(g) if g.kind == kind => Some(g),
            _ => None,
        })
    }

    pub fn holes(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.items.iter().filter_map(|item| match item {
            SceneItem::Hole {
                center, diameter, ..
            } => Some((*center, *diameter)),
            _ => None,
        })
    }

    pub fn spike(&self) -> Option<&Spike> {
        self.items.iter().find_map(|item| match item {
            SceneItem::Spike(s) => Some(s),
            _ => None,
        })
    }

    pub fn has_frame(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, SceneItem::Frame { .. }))
    }
}
