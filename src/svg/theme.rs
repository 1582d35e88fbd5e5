//! Preview colors - CSS custom properties on the root element.
//!
//! Every shape references a variable (`var(--body)`, `var(--relief)`, ...)
//! so a preview can be restyled without re-rendering.

use serde::{Deserialize, Serialize};

use crate::types::fmt_num;

/// Color configuration for the SVG preview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelColors {
    /// Page background and hole color → --bg
    pub bg: String,
    /// Label body and spike → --body
    pub body: String,
    /// Raised border → --frame
    pub frame: String,
    /// Raised text and symbols → --relief
    pub relief: String,
}

impl Default for LabelColors {
    fn default() -> Self {
        Self {
            bg: "#FFFFFF".to_string(),
            body: "#E8F0E0".to_string(),
            frame: "#2F5D3A".to_string(),
            relief: "#2F5D3A".to_string(),
        }
    }
}

/// Pixels per millimeter for the width/height attributes
pub const PX_PER_MM: f64 = 4.0;

/// Build the SVG opening tag with CSS variables set as inline styles.
pub fn svg_open_tag(width: f64, height: f64, colors: &LabelColors, transparent: bool) -> String {
    let vars = [
        format!("--bg:{}", colors.bg),
        format!("--body:{}", colors.body),
        format!("--frame:{}", colors.frame),
        format!("--relief:{}", colors.relief),
    ]
    .join(";");
    let bg_style = if transparent {
        ""
    } else {
        ";background:var(--bg)"
    };

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="{}{}">"#,
        fmt_num(width),
        fmt_num(height),
        fmt_num(width * PX_PER_MM),
        fmt_num(height * PX_PER_MM),
        vars,
        bg_style
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_tag_dimensions() {
        let tag = svg_open_tag(88.0, 38.0, &LabelColors::default(), false);
        assert!(tag.contains(r#"viewBox="0 0 88 38""#));
        assert!(tag.contains(r#"width="352""#));
        assert!(tag.contains("--relief:#2F5D3A"));
        assert!(tag.ends_with(r#";background:var(--bg)">"#));
    }

    #[test]
    fn test_transparent_has_no_background() {
        let tag = svg_open_tag(10.0, 10.0, &LabelColors::default(), true);
        assert!(!tag.contains("background"));
    }
}
