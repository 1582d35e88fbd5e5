//! OpenSCAD backend - converts a positioned label scene into an OpenSCAD
//! program.
//!
//! Pure string building. Only uses 2D primitives (circle, polygon, square,
//! text), boolean composition (union, difference, hull, offset) and
//! linear_extrude; OpenSCAD itself does the solid modeling and STL export.

mod renderer;
mod writer;

pub use renderer::render_scad;
pub use writer::{escape_string, ScadWriter};
