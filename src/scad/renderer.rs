//! Scene → OpenSCAD program.
//!
//! Structure of the generated program:
//!   difference() { union() { body + spike, frame }; holes }
//!   raised text and symbols on top of the body

use super::writer::{escape_string, ScadWriter};
use crate::glyph::{SymbolShape, SymbolStyle};
use crate::types::{fmt_num, LabelScene, PlacedText, Point, SceneItem, Spike, SymbolProgressGroup};

/// Curve resolution for circles
const FRAGMENTS: u32 = 64;

/// Extra depth so holes cut cleanly through both faces
const CUT_EPSILON: f64 = 0.01;

/// Smallest corner radius drawn as a hull of circles
const MIN_RADIUS: f64 = 0.01;

/// Render a positioned label scene as an OpenSCAD program.
pub fn render_scad(scene: &LabelScene) -> String {
    let config = &scene.config;
    let mut w = ScadWriter::new();

    w.line(format!("// Plant label {}x{} mm", fmt_num(config.width), fmt_num(config.height)));
    for text in scene.texts() {
        w.line(format!("// {:?}: {}", text.kind, text.text.replace('\n', " ")));
    }
    w.line(format!("$fn = {};", FRAGMENTS));
    w.blank();

    w.open("union()");

    // 1. Structure, minus holes
    w.open("difference()");
    w.open("union()");
    render_base(&mut w, scene);
    for item in &scene.items {
        if let SceneItem::Frame {
            width,
            height,
            corner_radius,
            frame_width,
            frame_height,
        } = item
        {
            render_frame(
                &mut w,
                config.thickness,
                *width,
                *height,
                *corner_radius,
                *frame_width,
                *frame_height,
            );
        }
    }
    w.close();
    for item in &scene.items {
        if let SceneItem::Hole {
            center,
            diameter,
            depth,
        } = item
        {
            render_hole(&mut w, *center, *diameter, *depth);
        }
    }
    w.close();

    // 2. Raised content
    let raised: Vec<&SceneItem> = scene
        .items
        .iter()
        .filter(|i| matches!(i, SceneItem::Text(_) | SceneItem::Progress(_) | SceneItem::Symbol(_)))
        .collect();
    if !raised.is_empty() {
        w.open(format!("translate([0, 0, {}])", fmt_num(config.thickness)));
        w.open(format!("linear_extrude(height = {})", fmt_num(config.relief_height)));
        for item in raised {
            match item {
                SceneItem::Text(text) => render_text(&mut w, text),
                SceneItem::Progress(group) => render_progress(&mut w, group),
                SceneItem::Symbol(symbol) => {
                    render_symbol(&mut w, symbol.shape, symbol.size, symbol.center)
                }
                _ => {}
            }
        }
        w.close();
        w.close();
    }

    w.close();
    w.finish()
}

// ============================================================================
// Structure
// ============================================================================

/// Body outline and spike, extruded together so they fuse
fn render_base(w: &mut ScadWriter, scene: &LabelScene) {
    for item in &scene.items {
        if let SceneItem::Body {
            width,
            height,
            thickness,
            corner_radius,
        } = item
        {
            w.line("// body");
            w.open(format!("linear_extrude(height = {})", fmt_num(*thickness)));
            w.open("union()");
            rounded_rect(w, *width, *height, *corner_radius);
            if let Some(spike) = scene.spike() {
                render_spike_outline(w, spike);
            }
            w.close();
            w.close();
        }
    }
}

fn render_spike_outline(w: &mut ScadWriter, spike: &Spike) {
    w.line("// spike");
    w.polygon(&spike.outline);
    for gusset in &spike.gussets {
        w.polygon(gusset);
    }
}

fn render_frame(
    w: &mut ScadWriter,
    z: f64,
    width: f64,
    height: f64,
    corner_radius: f64,
    frame_width: f64,
    frame_height: f64,
) {
    w.line("// frame");
    w.open(format!("translate([0, 0, {}])", fmt_num(z)));
    w.open(format!("linear_extrude(height = {})", fmt_num(frame_height)));
    w.open("difference()");
    rounded_rect(w, width, height, corner_radius);
    rounded_rect(
        w,
        width - 2.0 * frame_width,
        height - 2.0 * frame_width,
        corner_radius - frame_width,
    );
    w.close();
    w.close();
    w.close();
}

fn render_hole(w: &mut ScadWriter, center: Point, diameter: f64, depth: f64) {
    w.open(format!(
        "translate([{}, {}, {}])",
        fmt_num(center.x),
        fmt_num(center.y),
        fmt_num(-CUT_EPSILON)
    ));
    w.line(format!(
        "linear_extrude(height = {}) circle(d = {});",
        fmt_num(depth + 2.0 * CUT_EPSILON),
        fmt_num(diameter)
    ));
    w.close();
}

/// Centered rectangle with rounded corners, as a hull of corner circles
fn rounded_rect(w: &mut ScadWriter, width: f64, height: f64, radius: f64) {
    if radius < MIN_RADIUS {
        w.line(format!(
            "square([{}, {}], center = true);",
            fmt_num(width),
            fmt_num(height)
        ));
        return;
    }
    let dx = width / 2.0 - radius;
    let dy = height / 2.0 - radius;
    w.open("hull()");
    for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        w.line(format!(
            "translate([{}, {}]) circle(r = {});",
            fmt_num(sx * dx),
            fmt_num(sy * dy),
            fmt_num(radius)
        ));
    }
    w.close();
}

// ============================================================================
// Raised content
// ============================================================================

fn render_text(w: &mut ScadWriter, text: &PlacedText) {
    w.line(format!(
        "translate([{}, {}]) text(\"{}\", size = {}, font = \"{}\", halign = \"center\", valign = \"center\");",
        fmt_num(text.center.x),
        fmt_num(text.center.y),
        escape_string(&text.text),
        fmt_num(text.size),
        escape_string(&text.font)
    ));
}

fn render_progress(w: &mut ScadWriter, group: &SymbolProgressGroup) {
    w.line(format!("// {:?} level {}", group.kind, group.level));
    for (center, shape) in group.slots() {
        render_symbol(w, shape, group.size, center);
    }
}

fn render_symbol(w: &mut ScadWriter, shape: SymbolShape, size: f64, center: Point) {
    let silhouette = shape.kind.silhouette(size);
    w.open(format!("translate([{}, {}])", fmt_num(center.x), fmt_num(center.y)));
    match shape.style {
        SymbolStyle::Filled => w.polygon(&silhouette.core),
        SymbolStyle::Outlined => {
            w.open("difference()");
            w.polygon(&silhouette.core);
            w.open(format!("offset(delta = -{})", fmt_num(shape.stroke_width(size))));
            w.polygon(&silhouette.core);
            w.close();
            w.close();
        }
    }
    for extra in &silhouette.extras {
        w.polygon(extra);
    }
    w.close();
}
