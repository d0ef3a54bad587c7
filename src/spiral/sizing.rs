//! Texture dimensions for a spiral of a given radius.

use crate::foundation::core::Viewport;
use crate::foundation::error::{SpiralError, SpiralResult};

/// Largest square texture side the layout will request.
pub const MAX_TEXTURE_SIZE: u32 = 1 << 16;

/// Diameter of the synthesized field including the 1-pixel anti-alias ring.
pub fn spiral_size(radius: u32) -> u64 {
    2 * (u64::from(radius) + 1)
}

/// Square power-of-two texture side that holds a spiral of `radius`.
///
/// Exact powers of two pass through unchanged; anything else rounds up. Defined for every
/// radius, `radius = 0` included (side 2). Computed in `u64` so it cannot overflow.
pub fn texture_size(radius: u32) -> u64 {
    spiral_size(radius).next_power_of_two()
}

/// How a spiral texture maps onto a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralLayout {
    /// Viewport the spiral is displayed in.
    pub viewport: Viewport,
    /// Requested radius before rounding, in viewport pixels.
    pub requested_radius: f64,
    /// Rounded spiral radius in texture pixels.
    pub radius: u32,
    /// `2 * (radius + 1)`.
    pub spiral_size: u32,
    /// Power-of-two texture side.
    pub texture_size: u32,
    /// Factor applied to the unit quad so the transparent padding of the texture falls outside
    /// the logical circle.
    pub scale: f64,
}

impl SpiralLayout {
    /// Layout for a spiral that covers the whole viewport, corners included.
    pub fn for_viewport(viewport: Viewport) -> SpiralResult<Self> {
        Self::new(viewport.half_diagonal(), viewport)
    }

    /// Layout for a spiral of radius `requested_radius` shown in `viewport`.
    pub fn new(requested_radius: f64, viewport: Viewport) -> SpiralResult<Self> {
        if viewport.width == 0 || viewport.height == 0 {
            return Err(SpiralError::validation("spiral viewport must be non-empty"));
        }
        if !requested_radius.is_finite() || requested_radius < 0.0 {
            return Err(SpiralError::validation(format!(
                "spiral radius must be a finite non-negative number, got {requested_radius}"
            )));
        }

        let rounded = requested_radius.round();
        if rounded >= f64::from(MAX_TEXTURE_SIZE) {
            return Err(SpiralError::validation(format!(
                "spiral radius {rounded} exceeds the maximum texture size {MAX_TEXTURE_SIZE}"
            )));
        }
        let radius = rounded as u32;

        let size = texture_size(radius);
        if size > u64::from(MAX_TEXTURE_SIZE) {
            return Err(SpiralError::validation(format!(
                "spiral texture of {size}x{size} exceeds the maximum of {MAX_TEXTURE_SIZE}"
            )));
        }
        // Both fit in u32: size <= MAX_TEXTURE_SIZE and spiral_size <= size.
        let texture_size = size as u32;
        let spiral_size = spiral_size(radius) as u32;

        let scale = f64::from(texture_size) / f64::from(spiral_size)
            * (2.0 * requested_radius / f64::from(viewport.min_side()));

        Ok(Self {
            viewport,
            requested_radius,
            radius,
            spiral_size,
            texture_size,
            scale,
        })
    }
}
