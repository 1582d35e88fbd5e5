//! Symbol and structure composer.
//!
//! Turns the solver's vertical stack into drawable scene items: text lines
//! centered on x = 0, the water group anchored left, the light group
//! anchored right, the cactus on x = 0, plus body, frame, hanging holes and
//! the planting spike.

use log::debug;

use super::metrics::{font_with_style, SYMBOL_SPACING_RATIO, WATER_DROP_OFFSET_RATIO};
use crate::glyph::{SymbolKind, SymbolShape};
use crate::types::{
    ContentSet, LabelConfig, PlacedSymbol, PlacedText, Point, SceneItem, Spike,
    SymbolProgressGroup, VerticalLayout, PROGRESS_SLOTS,
};

/// Place every drawable item for a solved layout, in draw order.
pub fn compose(
    config: &LabelConfig,
    content: &ContentSet,
    layout: &VerticalLayout,
) -> Vec<SceneItem> {
    let mut items = vec![SceneItem::Body {
        width: config.width,
        height: config.height,
        thickness: config.thickness,
        corner_radius: config.corner_radius,
    }];

    if layout.frame_margin > 0.0 {
        items.push(SceneItem::Frame {
            width: config.width,
            height: config.height,
            corner_radius: config.corner_radius,
            frame_width: config.frame_width,
            frame_height: config.frame_height,
        });
    }

    for element in &layout.elements {
        match content.text_for(element.kind) {
            Some(text) => items.push(SceneItem::Text(PlacedText {
                kind: element.kind,
                text: text.trim().to_string(),
                font: font_with_style(&config.font_name, element.kind),
                size: element.size,
                center: Point::new(0.0, element.center_y),
            })),
            None => items.extend(symbol_row(
                config,
                content,
                layout,
                element.size,
                element.center_y,
            )),
        }
    }

    if config.holes.enabled && content.show.holes {
        items.extend(hanging_holes(config, layout));
    }

    if config.spike.enabled && content.show.spike {
        items.push(SceneItem::Spike(spike(config)));
    }

    items
}

fn symbol_row(
    config: &LabelConfig,
    content: &ContentSet,
    layout: &VerticalLayout,
    size: f64,
    center_y: f64,
) -> Vec<SceneItem> {
    let mut items = Vec::new();
    let inset = layout.frame_margin + config.margin;
    let spacing = size * SYMBOL_SPACING_RATIO;
    let last_slot = f64::from(PROGRESS_SLOTS - 1);

    if content.show.water {
        let origin = Point::new(
            -config.width / 2.0 + inset + size / 2.0,
            center_y - size * WATER_DROP_OFFSET_RATIO,
        );
        debug!("water group at ({:.3}, {:.3}), level {}", origin.x, origin.y, content.water_level);
        items.push(SceneItem::Progress(SymbolProgressGroup {
            kind: SymbolKind::WaterDrop,
            level: content.water_level,
            origin,
            spacing,
            size,
        }));
    }

    if content.show.light {
        let origin = Point::new(
            config.width / 2.0 - inset - (last_slot * spacing + size / 2.0),
            center_y,
        );
        debug!("light group at ({:.3}, {:.3}), level {}", origin.x, origin.y, content.light_level);
        items.push(SceneItem::Progress(SymbolProgressGroup {
            kind: SymbolKind::Sun,
            level: content.light_level,
            origin,
            spacing,
            size,
        }));
    }

    if content.show.dry_soil {
        items.push(SceneItem::Symbol(PlacedSymbol {
            shape: SymbolShape::filled(SymbolKind::Cactus),
            size,
            center: Point::new(0.0, center_y),
        }));
    }

    items
}

fn hanging_holes(config: &LabelConfig, layout: &VerticalLayout) -> Vec<SceneItem> {
    let x = config.width / 2.0 - config.holes.margin_x;
    let y = config.height / 2.0 - config.holes.margin_y;
    let frame_height = if layout.frame_margin > 0.0 {
        config.frame_height
    } else {
        0.0
    };
    let depth = config.thickness + frame_height;

    [-x, x]
        .into_iter()
        .map(|hx| SceneItem::Hole {
            center: Point::new(hx, y),
            diameter: config.holes.diameter,
            depth,
        })
        .collect()
}

/// Horizontal center of the spike base for a position in [-1, 1]
pub fn spike_base_x(config: &LabelConfig) -> f64 {
    let travel = (config.width / 2.0 - config.spike.width / 2.0 - config.corner_radius).max(0.0);
    config.spike.position * travel
}

fn spike(config: &LabelConfig) -> Spike {
    let spike = &config.spike;
    let base_center = Point::new(spike_base_x(config), -config.height / 2.0);
    let half_base = spike.width / 2.0;
    let tip_width = spike.width * spike.taper_ratio;
    let half_tip = tip_width / 2.0;
    let tip_y = base_center.y - spike.length;

    let outline = vec![
        base_center.offset(-half_base, 0.0),
        base_center.offset(half_base, 0.0),
        Point::new(base_center.x + half_tip, tip_y),
        Point::new(base_center.x - half_tip, tip_y),
    ];

    let mut gussets = Vec::new();
    if spike.gusset_size > 0.0 {
        // each gusset stays on the straight part of the bottom edge
        let straight = config.width / 2.0 - config.corner_radius;
        let left = base_center.x - half_base;
        let right = base_center.x + half_base;
        let y = base_center.y;
        let leg = |room: f64| spike.gusset_size.min(spike.length).min(room);
        // how far the tapered side moves inward after descending g
        let inward = |g: f64| (half_base - half_tip) * g / spike.length;

        let g = leg(left + straight);
        if g > 0.0 {
            gussets.push(vec![
                Point::new(left - g, y),
                Point::new(left, y),
                Point::new(left + inward(g), y - g),
            ]);
        }
        let g = leg(straight - right);
        if g > 0.0 {
            gussets.push(vec![
                Point::new(right, y),
                Point::new(right + g, y),
                Point::new(right - inward(g), y - g),
            ]);
        }
    }

    debug!(
        "spike at x {:.3}, base {:.3}, tip {:.3}, length {:.3}",
        base_center.x, spike.width, tip_width, spike.length
    );

    Spike {
        base_center,
        base_width: spike.width,
        tip_width,
        length: spike.length,
        outline,
        gussets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout, resolve};
    use crate::types::{ElementKind, RawLabelParams};

    const EPS: f64 = 1e-9;

    fn scene(
        raw: &RawLabelParams,
        content: &ContentSet,
    ) -> (LabelConfig, VerticalLayout, Vec<SceneItem>) {
        let config = resolve(raw).unwrap();
        let solved = layout(&config, content);
        let items = compose(&config, content, &solved);
        (config, solved, items)
    }

    fn groups(items: &[SceneItem]) -> Vec<SymbolProgressGroup> {
        items
            .iter()
            .filter_map(|i| match i {
                SceneItem::Progress(g) => Some(*g),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_water_group_left_anchored() {
        let content = ContentSet {
            common_name: "Fern".to_string(),
            ..Default::default()
        };
        let (config, solved, items) = scene(&RawLabelParams::default(), &content);
        let row = solved.element(ElementKind::SymbolRow).unwrap();
        let water = groups(&items)
            .into_iter()
            .find(|g| g.kind == SymbolKind::WaterDrop)
            .unwrap();
        let inset = config.frame_width + config.margin;
        assert!((water.origin.x - (-40.0 + inset + row.size / 2.0)).abs() < EPS);
        assert!((water.origin.y - (row.center_y - row.size * 0.3)).abs() < EPS);
        assert!((water.spacing - row.size * 1.4).abs() < EPS);
    }

    #[test]
    fn test_light_group_right_edge() {
        let content = ContentSet {
            common_name: "Fern".to_string(),
            ..Default::default()
        };
        let (config, solved, items) = scene(&RawLabelParams::default(), &content);
        let row = solved.element(ElementKind::SymbolRow).unwrap();
        let light = groups(&items)
            .into_iter()
            .find(|g| g.kind == SymbolKind::Sun)
            .unwrap();
        let (last, _) = light.slots().last().unwrap();
        let outer_edge = last.x + light.size / 2.0;
        let inset = config.frame_width + config.margin;
        assert!((outer_edge - (40.0 - inset)).abs() < EPS);
        assert_eq!(light.origin.y, row.center_y);
    }

    #[test]
    fn test_cactus_centered_without_groups() {
        let mut content = ContentSet::default();
        content.show.water = false;
        content.show.light = false;
        content.show.dry_soil = true;
        let (_, solved, items) = scene(&RawLabelParams::default(), &content);
        let row = solved.element(ElementKind::SymbolRow).unwrap();
        let cactus = items
            .iter()
            .find_map(|i| match i {
                SceneItem::Symbol(s) => Some(*s),
                _ => None,
            })
            .unwrap();
        assert_eq!(cactus.center, Point::new(0.0, row.center_y));
        assert_eq!(cactus.shape.kind, SymbolKind::Cactus);
        assert!(groups(&items).is_empty());
    }

    #[test]
    fn test_holes_symmetric() {
        let mut content = ContentSet::default();
        content.show.holes = true;
        let (config, _, items) = scene(&RawLabelParams::default(), &content);
        let holes: Vec<_> = items
            .iter()
            .filter_map(|i| match i {
                SceneItem::Hole { center, depth, .. } => Some((*center, *depth)),
                _ => None,
            })
            .collect();
        assert_eq!(holes.len(), 2);
        assert_eq!(holes[0].0.x, -holes[1].0.x);
        assert_eq!(holes[0].0.y, 15.0 - config.holes.margin_y);
        assert_eq!(holes[1].0.x, 40.0 - config.holes.margin_x);
        assert_eq!(holes[0].1, config.thickness + config.frame_height);
    }

    #[test]
    fn test_holes_need_both_switches() {
        let mut content = ContentSet::default();
        content.show.holes = true;
        let raw = RawLabelParams {
            holes_enabled: false,
            ..Default::default()
        };
        let (_, _, items) = scene(&raw, &content);
        assert!(!items.iter().any(|i| matches!(i, SceneItem::Hole { .. })));
    }

    #[test]
    fn test_spike_taper_and_gussets() {
        let mut content = ContentSet::default();
        content.show.spike = true;
        let (config, _, items) = scene(&RawLabelParams::default(), &content);
        let spike = items
            .iter()
            .find_map(|i| match i {
                SceneItem::Spike(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(spike.base_center, Point::new(0.0, -15.0));
        assert!((spike.tip_width - 3.0).abs() < EPS);
        assert_eq!(spike.outline.len(), 4);
        assert!((spike.outline[2].y - (-15.0 - config.spike.length)).abs() < EPS);
        assert_eq!(spike.gussets.len(), 2);
        // gusset hypotenuse ends on the tapered side
        let side = &spike.gussets[0][2];
        let t = (-15.0 - side.y) / config.spike.length;
        let expected_x = -5.0 + t * (5.0 - 1.5);
        assert!((side.x - expected_x).abs() < EPS);
    }

    #[test]
    fn test_spike_extreme_positions() {
        let mut content = ContentSet::default();
        content.show.spike = true;
        for position in [-1.0, 1.0] {
            let raw = RawLabelParams {
                spike_position: position,
                ..Default::default()
            };
            let (config, _, items) = scene(&raw, &content);
            let spike = items
                .iter()
                .find_map(|i| match i {
                    SceneItem::Spike(s) => Some(s.clone()),
                    _ => None,
                })
                .unwrap();
            let expected = position
                * (config.width / 2.0 - config.spike.width / 2.0 - config.corner_radius);
            assert_eq!(spike.base_center.x, expected);
            // the base stays clear of the rounded corners
            let edge = spike.base_center.x.abs() + config.spike.width / 2.0;
            assert!(edge <= config.width / 2.0 - config.corner_radius + EPS);
            // no room for the outer gusset, the inner one keeps its size
            assert_eq!(spike.gussets.len(), 1);
            let straight = config.width / 2.0 - config.corner_radius;
            for point in spike.gussets.iter().flatten() {
                assert!(point.x.abs() <= straight + EPS, "{:?} under the corner", point);
            }
            let inner = &spike.gussets[0];
            assert!((inner[1].x - inner[0].x - config.spike.gusset_size).abs() < EPS);
        }
    }

    #[test]
    fn test_outer_gusset_shrinks_near_the_corner() {
        let mut content = ContentSet::default();
        content.show.spike = true;
        // base x = 0.9375 * 32 = 30, so 80/2 - 3 - (30 + 5) = 2 mm of room
        let raw = RawLabelParams {
            spike_position: 0.9375,
            ..Default::default()
        };
        let (config, _, items) = scene(&raw, &content);
        let spike = items
            .iter()
            .find_map(|i| match i {
                SceneItem::Spike(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(spike.gussets.len(), 2);
        let outer = &spike.gussets[1];
        let leg = outer[1].x - outer[0].x;
        assert!((leg - 2.0).abs() < EPS, "outer leg {}", leg);
        assert!(outer[1].x <= config.width / 2.0 - config.corner_radius + EPS);
    }

    #[test]
    fn test_no_frame_item_when_hidden() {
        let mut content = ContentSet::default();
        content.show.frame = false;
        let (_, _, items) = scene(&RawLabelParams::default(), &content);
        assert!(!items.iter().any(|i| matches!(i, SceneItem::Frame { .. })));
        assert!(matches!(items[0], SceneItem::Body { .. }));
    }
}
