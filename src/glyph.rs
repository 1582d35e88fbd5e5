//! Care-requirement symbols: water drop, sun and cactus.
//!
//! Each kind has one silhouette shared by both styles. The outlined style
//! hollows the silhouette's core polygon by an inward offset of
//! [`OUTLINE_STROKE_RATIO`] × size; everything else stays solid. Backends
//! dispatch on [`SymbolStyle`] instead of carrying two copies of the shape.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::types::Point;

/// Outline stroke width as a fraction of symbol size
pub const OUTLINE_STROKE_RATIO: f64 = 0.12;

/// Segments used when approximating arcs with polygons
const ARC_SEGMENTS: usize = 32;

const SUN_RAYS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    WaterDrop,
    Sun,
    Cactus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolStyle {
    Filled,
    Outlined,
}

/// A symbol kind drawn in a given style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolShape {
    pub kind: SymbolKind,
    pub style: SymbolStyle,
}

impl SymbolShape {
    pub fn filled(kind: SymbolKind) -> Self {
        Self {
            kind,
            style: SymbolStyle::Filled,
        }
    }

    pub fn stroke_width(&self, size: f64) -> f64 {
        size * OUTLINE_STROKE_RATIO
    }
}

/// Polygons of a symbol centered on the origin, fitting a `size` square
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    /// The part the outlined style hollows out
    pub core: Vec<Point>,
    /// Parts kept solid in every style (sun rays, cactus arms)
    pub extras: Vec<Vec<Point>>,
}

impl SymbolKind {
    pub fn silhouette(self, size: f64) -> Silhouette {
        match self {
            SymbolKind::WaterDrop => water_drop(size),
            SymbolKind::Sun => sun(size),
            SymbolKind::Cactus => cactus(size),
        }
    }
}

/// Regular polygon approximating a circle
pub fn circle_points(center: Point, radius: f64, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let a = TAU * i as f64 / segments as f64;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Circle hulled to a tip at the top
fn water_drop(size: f64) -> Silhouette {
    let r = size * 0.32;
    let center = Point::new(0.0, -size * 0.5 + r);
    let tip = Point::new(0.0, size * 0.5);
    // Tangent points from the tip sit at pi/2 +/- alpha around the circle
    let alpha = (r / (tip.y - center.y)).acos();
    let start = FRAC_PI_2 + alpha;
    let sweep = TAU - 2.0 * alpha;

    let mut core = Vec::with_capacity(ARC_SEGMENTS + 2);
    core.push(tip);
    for i in 0..=ARC_SEGMENTS {
        let a = start + sweep * i as f64 / ARC_SEGMENTS as f64;
        core.push(Point::new(center.x + r * a.cos(), center.y + r * a.sin()));
    }
    Silhouette {
        core,
        extras: Vec::new(),
    }
}

/// Disc with triangular rays
fn sun(size: f64) -> Silhouette {
    let core = circle_points(Point::new(0.0, 0.0), size * 0.25, ARC_SEGMENTS);
    let half_base = size * 0.07;
    let ray_start = size * 0.2;
    let ray_tip = size * 0.5;

    let extras = (0..SUN_RAYS)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / SUN_RAYS as f64;
            let (sin, cos) = a.sin_cos();
            // perpendicular to the ray direction
            let (px, py) = (-sin * half_base, cos * half_base);
            vec![
                Point::new(cos * ray_start + px, sin * ray_start + py),
                Point::new(cos * ray_tip, sin * ray_tip),
                Point::new(cos * ray_start - px, sin * ray_start - py),
            ]
        })
        .collect();

    Silhouette { core, extras }
}

/// Trunk with one arm on each side
fn cactus(size: f64) -> Silhouette {
    let s = |x: f64, y: f64| Point::new(x * size, y * size);
    let core = vec![s(-0.14, -0.5), s(0.14, -0.5), s(0.14, 0.45), s(-0.14, 0.45)];
    let left_arm = vec![
        s(-0.13, -0.08),
        s(-0.13, 0.04),
        s(-0.24, 0.04),
        s(-0.24, 0.25),
        s(-0.36, 0.25),
        s(-0.36, -0.08),
    ];
    let right_arm = vec![
        s(0.13, 0.0),
        s(0.36, 0.0),
        s(0.36, 0.32),
        s(0.24, 0.32),
        s(0.24, 0.12),
        s(0.13, 0.12),
    ];
    Silhouette {
        core,
        extras: vec![left_arm, right_arm],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(points: &[Point]) -> (f64, f64, f64, f64) {
        points.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        )
    }

    #[test]
    fn test_silhouettes_fit_their_size() {
        let size = 4.0;
        for kind in [SymbolKind::WaterDrop, SymbolKind::Sun, SymbolKind::Cactus] {
            let sil = kind.silhouette(size);
            let mut all = sil.core.clone();
            for extra in &sil.extras {
                all.extend_from_slice(extra);
            }
            let (min_x, max_x, min_y, max_y) = bounds(&all);
            let eps = 1e-9;
            assert!(min_x >= -size / 2.0 - eps && max_x <= size / 2.0 + eps, "{:?}", kind);
            assert!(min_y >= -size / 2.0 - eps && max_y <= size / 2.0 + eps, "{:?}", kind);
        }
    }

    #[test]
    fn test_water_drop_tip_and_bottom() {
        let sil = SymbolKind::WaterDrop.silhouette(10.0);
        assert_eq!(sil.core[0], Point::new(0.0, 5.0));
        let (_, _, min_y, _) = bounds(&sil.core);
        assert!((min_y + 5.0).abs() < 0.05);
    }

    #[test]
    fn test_sun_has_eight_rays() {
        let sil = SymbolKind::Sun.silhouette(4.0);
        assert_eq!(sil.extras.len(), 8);
        assert!(sil.extras.iter().all(|ray| ray.len() == 3));
    }
}
