//! Per-pixel opacity of a spiral, as a pure function of polar coordinates.

use std::f64::consts::{PI, TAU};

use crate::spiral::params::SpiralParams;

/// Width of the anti-aliased ramp around a painted band, in distance-to-line units.
pub const ANTI_ALIAS_BORDER: f64 = 0.08;

/// Opacity evaluator for one parameter snapshot.
///
/// Construction precomputes the center disc radius; evaluation never allocates and never
/// touches shared state, so one field can be shared by every scanline worker.
#[derive(Clone, Copy, Debug)]
pub struct DistanceField {
    params: SpiralParams,
    center_radius: u32,
}

impl DistanceField {
    /// Snapshot `params`. The caller is expected to have validated them.
    pub fn new(params: &SpiralParams) -> Self {
        Self {
            params: *params,
            center_radius: params.center_radius(),
        }
    }

    /// Parameters this field was built from.
    pub fn params(&self) -> &SpiralParams {
        &self.params
    }

    /// Opacity of the pixel at offset `(dx, dy)` from the spiral center.
    pub fn opacity_at(&self, dx: f64, dy: f64) -> u8 {
        self.opacity_polar(dx.hypot(dy), dy.atan2(dx))
    }

    /// Opacity at distance `h` from the center and `angle` radians from the +x axis.
    pub fn opacity_polar(&self, h: f64, angle: f64) -> u8 {
        let radius = f64::from(self.params.radius);

        // One extra pixel past the radius carries the outer anti-alias ring.
        if h >= radius + 1.0 {
            return 0;
        }

        let distance = self.distance_to_line(h, angle);
        let line_width = self.params.line_width;
        let mut alpha: u32 = if distance < line_width + ANTI_ALIAS_BORDER {
            if distance > line_width {
                (255.0 - 255.0 * (distance - line_width) / ANTI_ALIAS_BORDER) as u32
            } else {
                255
            }
        } else {
            0
        };

        let ring = h as u32;
        if ring < self.center_radius {
            alpha = 255;
        } else if ring == self.center_radius {
            let a = h - f64::from(self.center_radius);
            alpha = (f64::from(alpha) * a + 255.0 * (1.0 - a)) as u32;
        }

        if ring == self.params.radius {
            alpha = (f64::from(alpha) * (h - radius)) as u32;
        }

        alpha.min(255) as u8
    }

    /// Normalized distance to the center of the nearest painted band.
    ///
    /// `0.0` is the middle of a band and `1.0` is halfway between two bands.
    pub fn distance_to_line(&self, h: f64, angle: f64) -> f64 {
        let p = &self.params;
        let scaled = f64::from(p.alterations) * h / f64::from(p.radius);
        let segment = scaled.trunc();
        let t = scaled - segment;

        // Alternating segments reverse the twist so arms weave instead of winding.
        let twist = if (segment as u64) % 2 == 1 {
            t * p.twist
        } else {
            p.twist * (1.0 - t)
        };

        let mut twisted = (f64::from(p.curves) * (angle + twist)) % TAU;
        if twisted < 0.0 {
            twisted += TAU;
        }

        2.0 * (twisted / (2.0 * PI) - 0.5).abs()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spiral/field.rs"]
mod tests;
