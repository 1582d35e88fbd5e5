//! SVG preview - a flat top view of a label scene.
//!
//! Handy for checking a batch before spending printer time: every item the
//! OpenSCAD backend extrudes is drawn here as a 2D shape.
//!
//! Pure string building, no DOM manipulation.

mod renderer;
mod theme;

pub use renderer::{escape_xml, render_svg};
pub use theme::{svg_open_tag, LabelColors, PX_PER_MM};
