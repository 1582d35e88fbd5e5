//! SVG renderer - converts a LabelScene into a flat top-view preview.
//!
//! Pure string building, no DOM manipulation.
//! Renders back-to-front: body + spike → frame → holes → text → symbols.

use super::theme::{svg_open_tag, LabelColors};
use crate::glyph::{SymbolShape, SymbolStyle};
use crate::types::{fmt_num, LabelScene, PlacedText, Point, SceneItem};

/// Blank space around the label, in mm
const PAGE_MARGIN: f64 = 4.0;

/// Vertical shift applied to text for font-agnostic centering
const TEXT_BASELINE_SHIFT: &str = "0.35em";

/// Maps label coordinates (y up, origin at the center) to SVG (y down)
struct Canvas {
    width: f64,
    height: f64,
    half_width: f64,
    half_height: f64,
}

impl Canvas {
    fn for_scene(scene: &LabelScene) -> Self {
        let config = &scene.config;
        let below = scene.spike().map(|s| s.length).unwrap_or(0.0);
        Self {
            width: config.width + 2.0 * PAGE_MARGIN,
            height: config.height + below + 2.0 * PAGE_MARGIN,
            half_width: config.width / 2.0,
            half_height: config.height / 2.0,
        }
    }

    fn x(&self, x: f64) -> f64 {
        x + self.half_width + PAGE_MARGIN
    }

    fn y(&self, y: f64) -> f64 {
        self.half_height - y + PAGE_MARGIN
    }

    fn path(&self, points: &[Point]) -> String {
        let mut d = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let cmd = if i == 0 { 'M' } else { 'L' };
                format!("{}{} {}", cmd, fmt_num(self.x(p.x)), fmt_num(self.y(p.y)))
            })
            .collect::<Vec<_>>()
            .join(" ");
        d.push_str(" Z");
        d
    }
}

/// Render a label scene as an SVG preview string.
pub fn render_svg(scene: &LabelScene, colors: &LabelColors, transparent: bool) -> String {
    let canvas = Canvas::for_scene(scene);
    let mut parts: Vec<String> = Vec::new();

    parts.push(svg_open_tag(canvas.width, canvas.height, colors, transparent));

    // 1. Body and spike
    for item in &scene.items {
        match item {
            SceneItem::Body {
                width,
                height,
                corner_radius,
                ..
            } => parts.push(format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}" fill="var(--body)" />"#,
                fmt_num(canvas.x(-width / 2.0)),
                fmt_num(canvas.y(height / 2.0)),
                fmt_num(*width),
                fmt_num(*height),
                fmt_num(*corner_radius),
                fmt_num(*corner_radius)
            )),
            SceneItem::Spike(spike) => {
                parts.push(format!(
                    r#"<path d="{}" fill="var(--body)" />"#,
                    canvas.path(&spike.outline)
                ));
                for gusset in &spike.gussets {
                    parts.push(format!(
                        r#"<path d="{}" fill="var(--body)" />"#,
                        canvas.path(gusset)
                    ));
                }
            }
            _ => {}
        }
    }

    // 2. Frame - a stroke centered half a frame width inside the edge
    for item in &scene.items {
        if let SceneItem::Frame {
            width,
            height,
            corner_radius,
            frame_width,
            ..
        } = item
        {
            let inset = frame_width / 2.0;
            let r = (corner_radius - inset).max(0.0);
            parts.push(format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}" fill="none" stroke="var(--frame)" stroke-width="{}" />"#,
                fmt_num(canvas.x(-width / 2.0 + inset)),
                fmt_num(canvas.y(height / 2.0 - inset)),
                fmt_num(width - frame_width),
                fmt_num(height - frame_width),
                fmt_num(r),
                fmt_num(r),
                fmt_num(*frame_width)
            ));
        }
    }

    // 3. Holes
    for (center, diameter) in scene.holes() {
        parts.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="var(--bg)" />"#,
            fmt_num(canvas.x(center.x)),
            fmt_num(canvas.y(center.y)),
            fmt_num(diameter / 2.0)
        ));
    }

    // 4. Text
    for text in scene.texts() {
        parts.push(render_text(&canvas, text));
    }

    // 5. Symbols
    for item in &scene.items {
        match item {
            SceneItem::Progress(group) => {
                for (center, shape) in group.slots() {
                    parts.push(render_symbol(&canvas, shape, group.size, center));
                }
            }
            SceneItem::Symbol(symbol) => {
                parts.push(render_symbol(&canvas, symbol.shape, symbol.size, symbol.center));
            }
            _ => {}
        }
    }

    parts.push("</svg>".to_string());

    parts.join("\n")
}

fn render_text(canvas: &Canvas, text: &PlacedText) -> String {
    // "Family:style=Bold Italic" → family + CSS weight/style
    let (family, style) = match text.font.split_once(":style=") {
        Some((family, style)) => (family, style),
        None => (text.font.as_str(), ""),
    };
    let weight = if style.contains("Bold") { "bold" } else { "normal" };
    let font_style = if style.contains("Italic") { "italic" } else { "normal" };

    format!(
        r#"<text x="{}" y="{}" text-anchor="middle" dy="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="var(--relief)">{}</text>"#,
        fmt_num(canvas.x(text.center.x)),
        fmt_num(canvas.y(text.center.y)),
        TEXT_BASELINE_SHIFT,
        escape_xml(family),
        fmt_num(text.size),
        weight,
        font_style,
        escape_xml(&text.text)
    )
}

fn render_symbol(canvas: &Canvas, shape: SymbolShape, size: f64, center: Point) -> String {
    let silhouette = shape.kind.silhouette(size);
    let mut parts = Vec::new();
    let core = canvas.path(&translated(&silhouette.core, center));
    match shape.style {
        SymbolStyle::Filled => {
            parts.push(format!(r#"<path d="{}" fill="var(--relief)" />"#, core));
        }
        SymbolStyle::Outlined => {
            parts.push(format!(
                r#"<path d="{}" fill="none" stroke="var(--relief)" stroke-width="{}" />"#,
                core,
                fmt_num(shape.stroke_width(size))
            ));
        }
    }
    for extra in &silhouette.extras {
        parts.push(format!(
            r#"<path d="{}" fill="var(--relief)" />"#,
            canvas.path(&translated(extra, center))
        ));
    }
    parts.join("\n")
}

fn translated(points: &[Point], by: Point) -> Vec<Point> {
    points.iter().map(|p| p.offset(by.x, by.y)).collect()
}

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
