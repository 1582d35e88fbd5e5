//! plantlabel - 3D-printable plant labels from a plant list
//!
//! This library lays out a parametric plant label (body, frame, names,
//! care symbols, hanging holes, planting spike) and renders it as an
//! OpenSCAD program, an SVG preview, or a JSON scene.
//!
//! # Example
//!
//! ```rust
//! use plantlabel::{label_to_scad, ContentSet, RawLabelParams};
//!
//! let content = ContentSet {
//!     common_name: "Golden Pothos".to_string(),
//!     scientific_name: "Epipremnum aureum".to_string(),
//!     ..Default::default()
//! };
//! let scad = label_to_scad(&RawLabelParams::default(), &content).unwrap();
//! assert!(scad.contains("Golden Pothos"));
//! ```
//!
//! # Pipeline
//!
//! - [`layout::resolve`]: raw parameters → scaled [`LabelConfig`]
//! - [`layout::layout`]: font/symbol sizes and vertical centers
//! - [`layout::compose`]: horizontal placement of symbols and structure
//! - [`scad`] / [`svg`]: drawing backends

pub mod batch;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod scad;
pub mod svg;
pub mod types;

pub use error::LabelError;
pub use glyph::{SymbolKind, SymbolShape, SymbolStyle};
pub use layout::{compose, generate_label, layout as solve_layout, resolve};
pub use types::*;

/// Build one label and render it as an OpenSCAD program.
///
/// # Example
/// ```rust
/// let scad = plantlabel::label_to_scad(&Default::default(), &Default::default()).unwrap();
/// assert!(scad.contains("linear_extrude"));
/// ```
pub fn label_to_scad(params: &RawLabelParams, content: &ContentSet) -> Result<String, LabelError> {
    let config = resolve(params)?;
    let scene = generate_label(&config, content)?;
    Ok(scad::render_scad(&scene))
}

/// Build one label and render it as an SVG preview.
pub fn label_to_svg(params: &RawLabelParams, content: &ContentSet) -> Result<String, LabelError> {
    let config = resolve(params)?;
    let scene = generate_label(&config, content)?;
    Ok(svg::render_svg(&scene, &svg::LabelColors::default(), false))
}
