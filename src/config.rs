//! JSON configuration for the screensaver.
//!
//! Every field has a default, so `{}` is a valid configuration and reproduces the classic look:
//! ten white arms on black, turning at 0.35 revolutions per second.

use std::path::Path;

use crate::foundation::core::Fps;
use crate::foundation::error::{SpiralError, SpiralResult};
use crate::render::animation::SpiralAnimation;
use crate::spiral::{Dispatcher, SpiralLayout, SpiralParams, dispatch::DEFAULT_ROWS_PER_TASK};

/// Screensaver configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpiralConfig {
    /// Number of curves that extend from the center.
    pub curves: u32,
    /// Number of twist-direction reversals along the radius.
    pub alterations: u32,
    /// Twist applied along each alteration segment, in radians.
    pub twist: f64,
    /// Painted fraction of each angular period, see [`SpiralParams::line_width`].
    pub line_width: f64,
    /// Rotation speed in revolutions per second (clockwise).
    pub rotation_speed: f64,
    /// Output frames per second.
    pub fps: u32,
    /// Spiral colour, RGB.
    pub foreground: [u8; 3],
    /// Clear colour behind the spiral, RGB.
    pub background: [u8; 3],
    /// Worker configuration.
    pub threading: ThreadingConfig,
}

/// Parallelism knobs shared by texture synthesis and frame rendering.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThreadingConfig {
    /// Use a rayon pool. When `false` everything runs on the calling thread.
    pub parallel: bool,
    /// Worker thread count; `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Texture rows per synthesis task.
    pub rows_per_task: usize,
    /// Frames rendered per parallel batch before they are handed to the sink.
    pub chunk_size: usize,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            rows_per_task: DEFAULT_ROWS_PER_TASK,
            chunk_size: 64,
        }
    }
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            curves: 10,
            alterations: 10,
            twist: 5.0,
            line_width: 0.2,
            rotation_speed: 0.35,
            fps: 25,
            foreground: [255, 255, 255],
            background: [0, 0, 0],
            threading: ThreadingConfig::default(),
        }
    }
}

impl SpiralConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> SpiralResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SpiralError::serde(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> SpiralResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| SpiralError::serde(format!("invalid spiral config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> SpiralResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SpiralError::serde(e.to_string()))
    }

    /// Check everything that does not depend on the viewport.
    pub fn validate(&self) -> SpiralResult<()> {
        if self.curves == 0 {
            return Err(SpiralError::validation("config curves must be >= 1"));
        }
        if self.alterations == 0 {
            return Err(SpiralError::validation("config alterations must be >= 1"));
        }
        if !self.twist.is_finite() {
            return Err(SpiralError::validation("config twist must be finite"));
        }
        if !self.line_width.is_finite() || !(0.0..=1.0).contains(&self.line_width) {
            return Err(SpiralError::validation(
                "config line_width must be within [0, 1]",
            ));
        }
        if !self.rotation_speed.is_finite() {
            return Err(SpiralError::validation("config rotation_speed must be finite"));
        }
        Fps::new(self.fps, 1)?;
        if let Some(n) = self.threading.threads
            && n == 0
        {
            return Err(SpiralError::validation(
                "config threading.threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Shape parameters for a spiral laid out by `layout`.
    pub fn params_for(&self, layout: &SpiralLayout) -> SpiralResult<SpiralParams> {
        SpiralParams::new(
            self.curves,
            self.alterations,
            layout.radius,
            self.twist,
            self.line_width,
        )
    }

    /// Output frame rate.
    pub fn fps(&self) -> SpiralResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Rotation over time.
    pub fn animation(&self) -> SpiralResult<SpiralAnimation> {
        SpiralAnimation::new(self.rotation_speed, self.fps()?)
    }

    /// Texture dispatcher matching [`SpiralConfig::threading`].
    pub fn dispatcher(&self) -> Dispatcher {
        if self.threading.parallel {
            Dispatcher::parallel(self.threading.threads, self.threading.rows_per_task)
        } else {
            Dispatcher::Sequential
        }
    }
}
