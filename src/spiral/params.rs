use crate::foundation::error::{SpiralError, SpiralResult};

/// Minimum squared radius of the opaque center disc, per curve.
///
/// The disc radius is `floor(sqrt(curves * CENTER_RADIUS))`.
pub const CENTER_RADIUS: f64 = 3.0;

/// Shape of a spiral texture.
///
/// Values are plain data; [`SpiralParams::validate`] is called by every constructor that
/// synthesizes pixels, so an invalid set never reaches the distance field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpiralParams {
    /// Number of curves that extend from the center.
    pub curves: u32,
    /// Number of times the twist direction reverses between the center and the rim.
    pub alterations: u32,
    /// Radius in pixels; pixels further than `radius + 1` from the center are transparent.
    pub radius: u32,
    /// Angular twist applied along each alteration segment, in radians.
    pub twist: f64,
    /// Width of the painted band as a fraction of one angular period.
    ///
    /// `0.5` paints half of each period.
    pub line_width: f64,
}

impl SpiralParams {
    /// Create a validated parameter set.
    pub fn new(
        curves: u32,
        alterations: u32,
        radius: u32,
        twist: f64,
        line_width: f64,
    ) -> SpiralResult<Self> {
        let params = Self {
            curves,
            alterations,
            radius,
            twist,
            line_width,
        };
        params.validate()?;
        Ok(params)
    }

    /// Radius of the forced-opaque disc at the center, in whole pixels.
    pub fn center_radius(&self) -> u32 {
        center_radius(self.curves)
    }

    /// Return the same shape with a different radius.
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Check every field; the first violation is reported.
    pub fn validate(&self) -> SpiralResult<()> {
        if self.curves == 0 {
            return Err(SpiralError::validation("spiral curves must be >= 1"));
        }
        if self.alterations == 0 {
            return Err(SpiralError::validation("spiral alterations must be >= 1"));
        }
        if self.radius == 0 {
            return Err(SpiralError::validation("spiral radius must be >= 1"));
        }
        let center = self.center_radius();
        if self.radius <= center {
            return Err(SpiralError::validation(format!(
                "spiral radius {} must exceed the center disc radius {center} for {} curves",
                self.radius, self.curves
            )));
        }
        if !self.twist.is_finite() {
            return Err(SpiralError::validation("spiral twist must be finite"));
        }
        if !self.line_width.is_finite() || !(0.0..=1.0).contains(&self.line_width) {
            return Err(SpiralError::validation(format!(
                "spiral line_width must be within [0, 1], got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}

pub(crate) fn center_radius(curves: u32) -> u32 {
    (f64::from(curves) * CENTER_RADIUS).sqrt().floor() as u32
}
