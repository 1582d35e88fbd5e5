//! Vertical layout solver.
//!
//! Two passes over the active elements:
//!
//! 1. width fit: each text line gets the largest font size that keeps it
//!    inside the frame, capped by its role ceiling;
//! 2. height fit: a single global shrink factor scales every size and the
//!    padding so the stacked block fits the usable height.
//!
//! The block is then centered on y = 0, top to bottom in
//! [`ElementKind::ORDER`].

use log::debug;

use super::metrics::{fit_font_size, max_font_size, LINE_HEIGHT_RATIO, SYMBOL_ROW_HEIGHT_RATIO};
use crate::types::{ContentSet, ElementKind, LabelConfig, LayoutElement, VerticalLayout};

/// Frame margin the layout works with: the frame width when a frame is drawn
pub fn frame_margin(config: &LabelConfig, content: &ContentSet) -> f64 {
    if config.frame_enabled && content.show.frame {
        config.frame_width
    } else {
        0.0
    }
}

fn element_height(kind: ElementKind, size: f64) -> f64 {
    if kind.is_text() {
        size * LINE_HEIGHT_RATIO
    } else {
        size * SYMBOL_ROW_HEIGHT_RATIO
    }
}

/// Compute sizes and vertical centers of every active element.
pub fn layout(config: &LabelConfig, content: &ContentSet) -> VerticalLayout {
    let frame_margin = frame_margin(config, content);
    let inset = frame_margin + config.margin;
    let available_width = config.width - 2.0 * inset;
    let usable_height = config.height - 2.0 * inset;

    let active: Vec<ElementKind> = ElementKind::ORDER
        .iter()
        .copied()
        .filter(|&kind| content.is_active(kind))
        .collect();

    // Width-fit pass
    let provisional: Vec<(ElementKind, f64)> = active
        .iter()
        .map(|&kind| {
            let size = match content.text_for(kind) {
                Some(text) => {
                    fit_font_size(text.trim(), available_width, max_font_size(config, kind))
                }
                None => config.symbol_size,
            };
            (kind, size)
        })
        .collect();

    let gaps = if active.len() > 1 { active.len() - 1 } else { 0 };
    let required_height: f64 = provisional
        .iter()
        .map(|&(kind, size)| element_height(kind, size))
        .sum::<f64>()
        + gaps as f64 * config.element_padding;

    // Height-fit pass: one factor for everything, never above 1
    let shrink = if required_height > 0.0 {
        (usable_height / required_height).min(1.0)
    } else {
        1.0
    };
    let padding = config.element_padding * shrink;

    let sized: Vec<(ElementKind, f64, f64)> = provisional
        .iter()
        .map(|&(kind, size)| {
            let size = size * shrink;
            (kind, size, element_height(kind, size))
        })
        .collect();
    let block_height =
        sized.iter().map(|&(_, _, h)| h).sum::<f64>() + gaps as f64 * padding;

    let mut elements = Vec::with_capacity(sized.len());
    let mut cursor = block_height / 2.0;
    for (kind, size, height) in sized {
        let center_y = cursor - height / 2.0;
        debug!(
            "{:?}: size {:.3}, height {:.3}, center_y {:.3}",
            kind, size, height, center_y
        );
        elements.push(LayoutElement {
            kind,
            size,
            height,
            center_y,
        });
        cursor -= height + padding;
    }

    debug!(
        "layout: {} elements, required {:.3}, usable {:.3}, shrink {:.4}",
        elements.len(),
        required_height,
        usable_height,
        shrink
    );

    VerticalLayout {
        elements,
        shrink,
        block_height,
        usable_height,
        available_width,
        padding,
        frame_margin,
    }
}
