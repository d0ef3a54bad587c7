use crate::foundation::error::{SpiralError, SpiralResult};

pub use kurbo::{Affine, Point};

/// Absolute 0-based frame index on the animation timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> SpiralResult<Self> {
        if start.0 > end.0 {
            return Err(SpiralError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SpiralResult<Self> {
        if den == 0 {
            return Err(SpiralError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SpiralError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Output viewport dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> SpiralResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpiralError::validation(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Distance from the viewport center to one of its corners.
    pub fn half_diagonal(self) -> f64 {
        (f64::from(self.width) * 0.5).hypot(f64::from(self.height) * 0.5)
    }

    /// The shorter side, in pixels.
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Axis scales that make horizontal and vertical distances equal.
    ///
    /// The shorter axis spans `[-1, 1]`; the longer one spans `[-s, s]` with `s >= 1`.
    pub fn aspect_scales(self) -> (f64, f64) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        if self.width > self.height {
            (w / h, 1.0)
        } else {
            (1.0, h / w)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
