use crate::foundation::error::{SpiralError, SpiralResult};
use crate::spiral::{
    dispatch::Dispatcher, params::SpiralParams, sizing::texture_size, task::ScanlineTask,
};

/// A synthesized spiral opacity texture.
///
/// Square, row-major, one byte per pixel (`0` transparent, `255` opaque), no padding between
/// rows. The bytes are written once during construction and never change afterwards, so a
/// `&SpiralBuffer` can be read from any number of threads.
///
/// There is no empty or null buffer: code that may or may not hold a texture uses
/// `Option<SpiralBuffer>`, and dropping `None` does nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct SpiralBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
    params: SpiralParams,
}

impl SpiralBuffer {
    /// Synthesize a texture sized by [`texture_size`] for `params.radius`.
    pub fn new(params: &SpiralParams, dispatcher: &Dispatcher) -> SpiralResult<Self> {
        let size = u32::try_from(texture_size(params.radius)).map_err(|_| {
            SpiralError::validation(format!(
                "spiral radius {} needs a texture wider than u32::MAX",
                params.radius
            ))
        })?;
        Self::with_size(params, size, dispatcher)
    }

    /// Synthesize a `size x size` texture with the spiral centered at `(size/2, size/2)`.
    ///
    /// A `size` below [`texture_size`] is allowed and crops the outer ring.
    #[tracing::instrument(skip(dispatcher), err)]
    pub fn with_size(
        params: &SpiralParams,
        size: u32,
        dispatcher: &Dispatcher,
    ) -> SpiralResult<Self> {
        params.validate()?;
        if size == 0 {
            return Err(SpiralError::validation("spiral texture size must be >= 1"));
        }

        let width = size as usize;
        let len = width
            .checked_mul(width)
            .ok_or(SpiralError::Allocation { bytes: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SpiralError::Allocation { bytes: len })?;
        data.resize(len, 0);

        let task = ScanlineTask::new(params, size, size);
        let tasks = dispatcher.dispatch(&task, width, &mut data)?;
        tracing::debug!(size, tasks, "spiral texture synthesized");

        Ok(Self {
            width: size,
            height: size,
            data,
            params: *params,
        })
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels; always equal to [`SpiralBuffer::width`].
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity bytes, `width * height` long, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes in [`SpiralBuffer::data`].
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a buffer is at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Parameters the texture was synthesized from.
    pub fn params(&self) -> &SpiralParams {
        &self.params
    }

    /// Opacity at `(x, y)`, or `None` outside the texture.
    pub fn opacity(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Copy into an 8-bit grayscale image.
    pub fn to_luma_image(&self) -> SpiralResult<image::GrayImage> {
        image::GrayImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| SpiralError::render("spiral buffer length does not match its size"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> SpiralParams {
        SpiralParams {
            curves: 10,
            alterations: 10,
            radius: 50,
            twist: 5.0,
            line_width: 0.2,
        }
    }

    #[test]
    fn reference_texture_center_and_corner() {
        let buf = SpiralBuffer::new(&reference(), &Dispatcher::Sequential).unwrap();
        assert_eq!(buf.width(), 128);
        assert_eq!(buf.height(), 128);
        assert_eq!(buf.len(), 128 * 128);
        assert_eq!(buf.opacity(64, 64), Some(255));
        assert_eq!(buf.opacity(0, 0), Some(0));
        assert_eq!(buf.opacity(128, 0), None);
    }

    #[test]
    fn outside_radius_is_transparent_and_center_is_opaque() {
        let params = reference();
        let buf = SpiralBuffer::new(&params, &Dispatcher::default()).unwrap();
        let c = f64::from(buf.width()) * 0.5;
        let center = f64::from(params.center_radius());
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                let h = (f64::from(x) - c).hypot(f64::from(y) - c);
                let a = buf.opacity(x, y).unwrap();
                if h > f64::from(params.radius) + 1.0 {
                    assert_eq!(a, 0, "({x}, {y})");
                }
                if h < center {
                    assert_eq!(a, 255, "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn invalid_params_never_allocate() {
        let bad = SpiralParams {
            curves: 0,
            ..reference()
        };
        assert!(SpiralBuffer::new(&bad, &Dispatcher::Sequential).is_err());
        assert!(SpiralBuffer::with_size(&reference(), 0, &Dispatcher::Sequential).is_err());
    }

    #[test]
    fn explicit_size_crops() {
        let buf = SpiralBuffer::with_size(&reference(), 32, &Dispatcher::Sequential).unwrap();
        assert_eq!(buf.width(), 32);
        assert_eq!(buf.opacity(16, 16), Some(255));
        assert_eq!(buf.len(), 32 * 32);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let err = SpiralBuffer::with_size(&reference(), u32::MAX, &Dispatcher::Sequential)
            .unwrap_err();
        let expected = (u32::MAX as usize)
            .checked_mul(u32::MAX as usize)
            .unwrap_or(usize::MAX);
        match err {
            SpiralError::Allocation { bytes } => assert_eq!(bytes, expected),
            other => panic!("expected allocation error, got {other}"),
        }
    }

    #[test]
    fn luma_image_shares_layout() {
        let buf = SpiralBuffer::new(&reference(), &Dispatcher::Sequential).unwrap();
        let img = buf.to_luma_image().unwrap();
        assert_eq!(img.dimensions(), (128, 128));
        assert_eq!(img.get_pixel(64, 64).0, [255]);
        assert_eq!(img.get_pixel(3, 120).0, [buf.opacity(3, 120).unwrap()]);
    }

    #[test]
    fn dropping_an_absent_buffer_is_a_no_op() {
        let absent: Option<SpiralBuffer> = None;
        drop(absent);

        let present = SpiralBuffer::new(&reference(), &Dispatcher::Sequential).ok();
        assert!(present.is_some());
        drop(present);
    }
}
