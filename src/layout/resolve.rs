//! Configuration resolver: raw parameters → scaled [`LabelConfig`].
//!
//! All scaled quantities are linear in `avg_scale`, the mean of the width
//! and height ratios against the 80×30 mm reference label.

use super::metrics::{BASE_ELEMENT_PADDING, BASE_MARGIN, BASE_SYMBOL_SIZE};
use crate::error::LabelError;
use crate::types::{HoleConfig, LabelConfig, RawLabelParams, SpikeConfig, BASE_HEIGHT, BASE_WIDTH};

/// Validate raw parameters and derive every scaled dimension.
pub fn resolve(raw: &RawLabelParams) -> Result<LabelConfig, LabelError> {
    validate(raw)?;

    let avg_scale = (raw.width / BASE_WIDTH + raw.height / BASE_HEIGHT) / 2.0;

    let config = LabelConfig {
        width: raw.width,
        height: raw.height,
        thickness: raw.thickness,
        avg_scale,
        corner_radius: raw.corner_radius * avg_scale,
        frame_width: raw.frame_width * avg_scale,
        frame_height: raw.frame_height,
        frame_enabled: raw.frame_enabled,
        text_height_base: raw.text_height * avg_scale * raw.text_size_multiplier,
        text_size_multiplier: raw.text_size_multiplier,
        symbol_size_multiplier: raw.symbol_size_multiplier,
        symbol_size: BASE_SYMBOL_SIZE * avg_scale * raw.symbol_size_multiplier,
        margin: BASE_MARGIN * avg_scale,
        element_padding: BASE_ELEMENT_PADDING * avg_scale,
        relief_height: raw.relief_height,
        font_name: raw.font_name.clone(),
        spike: SpikeConfig {
            length: raw.spike_length,
            width: raw.spike_width,
            taper_ratio: raw.spike_taper_ratio,
            position: raw.spike_position,
            gusset_size: raw.spike_gusset_size,
            enabled: raw.spike_enabled,
        },
        holes: HoleConfig {
            diameter: raw.hole_diameter * avg_scale,
            margin_x: raw.hole_margin_x * avg_scale,
            margin_y: raw.hole_margin_y * avg_scale,
            enabled: raw.holes_enabled,
        },
    };
    check_content_area(&config)?;
    Ok(config)
}

/// The area inside frame and margin must be non-empty in both directions.
///
/// Margins grow with `avg_scale`, so a very wide and short (or tall and
/// narrow) label can leave no room at all.
fn check_content_area(config: &LabelConfig) -> Result<(), LabelError> {
    let frame = if config.frame_enabled {
        config.frame_width
    } else {
        0.0
    };
    let inset = 2.0 * (frame + config.margin);
    if !(config.height - inset > 0.0) {
        return Err(LabelError::InvalidConfig {
            field: "height",
            value: config.height,
            reason: "leaves no room inside the frame and margin",
        });
    }
    if !(config.width - inset > 0.0) {
        return Err(LabelError::InvalidConfig {
            field: "width",
            value: config.width,
            reason: "leaves no room inside the frame and margin",
        });
    }
    Ok(())
}

fn validate(raw: &RawLabelParams) -> Result<(), LabelError> {
    let positive = [
        ("width", raw.width),
        ("height", raw.height),
        ("thickness", raw.thickness),
        ("text_height", raw.text_height),
        ("text_size_multiplier", raw.text_size_multiplier),
        ("symbol_size_multiplier", raw.symbol_size_multiplier),
        ("spike_length", raw.spike_length),
        ("spike_width", raw.spike_width),
        ("hole_diameter", raw.hole_diameter),
    ];
    for (field, value) in positive {
        // written this way so NaN fails too
        if !(value > 0.0) {
            return Err(LabelError::InvalidConfig {
                field,
                value,
                reason: "must be positive",
            });
        }
    }

    let non_negative = [
        ("corner_radius", raw.corner_radius),
        ("frame_width", raw.frame_width),
        ("frame_height", raw.frame_height),
        ("relief_height", raw.relief_height),
        ("spike_gusset_size", raw.spike_gusset_size),
        ("hole_margin_x", raw.hole_margin_x),
        ("hole_margin_y", raw.hole_margin_y),
    ];
    for (field, value) in non_negative {
        if !(value >= 0.0) {
            return Err(LabelError::InvalidConfig {
                field,
                value,
                reason: "must not be negative",
            });
        }
    }

    if !(raw.spike_taper_ratio > 0.0 && raw.spike_taper_ratio <= 1.0) {
        return Err(LabelError::InvalidConfig {
            field: "spike_taper_ratio",
            value: raw.spike_taper_ratio,
            reason: "must be in (0, 1]",
        });
    }
    if !(-1.0..=1.0).contains(&raw.spike_position) {
        return Err(LabelError::InvalidConfig {
            field: "spike_position",
            value: raw.spike_position,
            reason: "must be in [-1, 1]",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_size_has_unit_scale() {
        let config = resolve(&RawLabelParams::default()).unwrap();
        assert_eq!(config.avg_scale, 1.0);
        assert_eq!(config.symbol_size, 4.0);
        assert_eq!(config.corner_radius, 3.0);
        assert_eq!(config.frame_width, 1.5);
        assert_eq!(config.text_height_base, 8.0);
    }

    #[test]
    fn test_scaling_is_linear_in_avg_scale() {
        let raw = RawLabelParams {
            width: 160.0,
            height: 30.0,
            symbol_size_multiplier: 1.5,
            ..Default::default()
        };
        let config = resolve(&raw).unwrap();
        assert_eq!(config.avg_scale, 1.5);
        assert_eq!(config.symbol_size, 4.0 * 1.5 * 1.5);
        assert_eq!(config.margin, 3.0);
        assert_eq!(config.element_padding, 2.25);
        assert_eq!(config.holes.margin_x, 7.5);
        // physical depths do not scale
        assert_eq!(config.thickness, 2.0);
        assert_eq!(config.spike.width, 10.0);
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        for (field, raw) in [
            ("width", RawLabelParams { width: 0.0, ..Default::default() }),
            ("height", RawLabelParams { height: -5.0, ..Default::default() }),
            ("thickness", RawLabelParams { thickness: 0.0, ..Default::default() }),
            (
                "symbol_size_multiplier",
                RawLabelParams { symbol_size_multiplier: 0.0, ..Default::default() },
            ),
            (
                "text_size_multiplier",
                RawLabelParams { text_size_multiplier: f64::NAN, ..Default::default() },
            ),
        ] {
            match resolve(&raw) {
                Err(LabelError::InvalidConfig { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidConfig for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_spike_position_is_not_clamped() {
        let raw = RawLabelParams {
            spike_position: 1.5,
            ..Default::default()
        };
        let err = resolve(&raw).unwrap_err();
        assert!(err.to_string().contains("spike_position"));
    }

    #[test]
    fn test_rejects_wide_short_label_without_room() {
        let raw = RawLabelParams {
            width: 300.0,
            height: 10.0,
            ..Default::default()
        };
        match resolve(&raw) {
            Err(LabelError::InvalidConfig { field, .. }) => assert_eq!(field, "height"),
            other => panic!("expected InvalidConfig for height, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_tall_narrow_label_without_room() {
        let raw = RawLabelParams {
            width: 10.0,
            height: 100.0,
            ..Default::default()
        };
        match resolve(&raw) {
            Err(LabelError::InvalidConfig { field, .. }) => assert_eq!(field, "width"),
            other => panic!("expected InvalidConfig for width, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_frame_frees_room() {
        // 300x10: 2 * 4.08 of margin fits, 2 * (3.06 + 4.08) does not
        let raw = RawLabelParams {
            width: 300.0,
            height: 10.0,
            frame_enabled: false,
            ..Default::default()
        };
        let config = resolve(&raw).unwrap();
        assert!(config.height - 2.0 * config.margin > 0.0);
    }

    #[test]
    fn test_zero_corner_radius_is_allowed() {
        let raw = RawLabelParams {
            corner_radius: 0.0,
            spike_gusset_size: 0.0,
            ..Default::default()
        };
        assert!(resolve(&raw).is_ok());
    }
}
