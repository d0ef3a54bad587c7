use std::f64::consts::TAU;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SpiralError, SpiralResult};

/// Constant-speed rotation of the spiral texture.
///
/// The texture itself never changes; every frame only differs in its rotation angle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpiralAnimation {
    /// Revolutions per second. Positive values turn clockwise on screen.
    pub rotation_speed: f64,
    /// Timeline frame rate.
    pub fps: Fps,
}

impl SpiralAnimation {
    /// Create an animation with a finite speed.
    pub fn new(rotation_speed: f64, fps: Fps) -> SpiralResult<Self> {
        if !rotation_speed.is_finite() {
            return Err(SpiralError::validation("rotation speed must be finite"));
        }
        Ok(Self { rotation_speed, fps })
    }

    /// Seconds since the first frame.
    pub fn time_at(&self, frame: FrameIndex) -> f64 {
        self.fps.frames_to_secs(frame.0)
    }

    /// Rotation in radians at `frame`, counter-clockwise positive, wrapped into `(-2pi, 2pi)`.
    pub fn angle_at(&self, frame: FrameIndex) -> f64 {
        // Wrap the revolution count first so long timelines keep full precision.
        let turns = (self.rotation_speed * self.time_at(frame)).fract();
        let angle = -TAU * turns;
        // Unrotated frames are always +0.0, whatever the sign of the speed.
        if angle == 0.0 { 0.0 } else { angle }
    }
}
