use crate::config::SpiralConfig;
use crate::foundation::core::{Affine, FrameIndex, Point, Viewport};
use crate::foundation::error::{SpiralError, SpiralResult};
use crate::foundation::math::blend_channel;
use crate::render::animation::SpiralAnimation;
use crate::spiral::{Dispatcher, SpiralBuffer, SpiralLayout};

/// A rendered frame as opaque RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes; alpha is always 255.
    pub data: Vec<u8>,
}

/// Everything needed to draw the screensaver into a viewport.
///
/// Owns the synthesized texture for its whole lifetime; frames only borrow it. Construct once
/// per viewport and drop when done.
#[derive(Debug)]
pub struct SpiralScene {
    texture: SpiralBuffer,
    layout: SpiralLayout,
    animation: SpiralAnimation,
    foreground: [u8; 3],
    background: [u8; 3],
}

impl SpiralScene {
    /// Lay out and synthesize a spiral covering `viewport`, using the configured dispatcher.
    pub fn new(config: &SpiralConfig, viewport: Viewport) -> SpiralResult<Self> {
        Self::with_dispatcher(config, viewport, &config.dispatcher())
    }

    /// Like [`SpiralScene::new`] with an explicit texture dispatcher.
    pub fn with_dispatcher(
        config: &SpiralConfig,
        viewport: Viewport,
        dispatcher: &Dispatcher,
    ) -> SpiralResult<Self> {
        config.validate()?;
        let layout = SpiralLayout::for_viewport(viewport)?;
        let params = config.params_for(&layout)?;
        let texture = SpiralBuffer::with_size(&params, layout.texture_size, dispatcher)?;
        tracing::info!(
            viewport_width = viewport.width,
            viewport_height = viewport.height,
            radius = layout.radius,
            texture_size = layout.texture_size,
            scale = layout.scale,
            "spiral scene ready"
        );
        Self::from_parts(
            texture,
            layout,
            config.animation()?,
            config.foreground,
            config.background,
        )
    }

    /// Assemble a scene from an existing texture.
    pub fn from_parts(
        texture: SpiralBuffer,
        layout: SpiralLayout,
        animation: SpiralAnimation,
        foreground: [u8; 3],
        background: [u8; 3],
    ) -> SpiralResult<Self> {
        if texture.width() != layout.texture_size {
            return Err(SpiralError::validation(format!(
                "texture is {}x{} but the layout expects {}x{}",
                texture.width(),
                texture.height(),
                layout.texture_size,
                layout.texture_size
            )));
        }
        Ok(Self {
            texture,
            layout,
            animation,
            foreground,
            background,
        })
    }

    /// The synthesized texture.
    pub fn texture(&self) -> &SpiralBuffer {
        &self.texture
    }

    /// How the texture maps onto the viewport.
    pub fn layout(&self) -> &SpiralLayout {
        &self.layout
    }

    /// Rotation over time.
    pub fn animation(&self) -> &SpiralAnimation {
        &self.animation
    }

    /// Output viewport.
    pub fn viewport(&self) -> Viewport {
        self.layout.viewport
    }

    /// Render one frame.
    pub fn render_frame(&self, frame: FrameIndex) -> FrameRGBA {
        let Viewport { width, height } = self.viewport();
        let mut data = vec![0u8; width as usize * height as usize * 4];
        self.render_rotated_into(self.animation.angle_at(frame), &mut data);
        FrameRGBA {
            width,
            height,
            data,
        }
    }

    /// Render the spiral rotated by `angle` radians into an RGBA8 buffer of viewport size.
    pub(crate) fn render_rotated_into(&self, angle: f64, out: &mut [u8]) {
        let width = self.viewport().width as usize;
        let to_texel = self.pixel_to_texel(angle);
        let [fr, fg, fb] = self.foreground;
        let [br, bg, bb] = self.background;

        for (py, line) in out.chunks_exact_mut(width * 4).enumerate() {
            for (px, rgba) in line.chunks_exact_mut(4).enumerate() {
                let t = to_texel * Point::new(px as f64 + 0.5, py as f64 + 0.5);
                let a = self.sample(t.x, t.y);
                rgba[0] = blend_channel(fr, br, a);
                rgba[1] = blend_channel(fg, bg, a);
                rgba[2] = blend_channel(fb, bb, a);
                rgba[3] = 255;
            }
        }
    }

    /// Map output pixel coordinates to texel coordinates for a rotation of `angle`.
    ///
    /// The unit quad `[-1, 1]^2` carries the whole texture; it is scaled by `layout.scale`,
    /// rotated, and shown through an aspect-corrected view where the shorter axis spans `[-1, 1]`.
    fn pixel_to_texel(&self, angle: f64) -> Affine {
        let Viewport { width, height } = self.viewport();
        let (xs, ys) = self.viewport().aspect_scales();
        let to_view = Affine::new([
            2.0 * xs / f64::from(width),
            0.0,
            0.0,
            -2.0 * ys / f64::from(height),
            -xs,
            ys,
        ]);
        let quad_to_view = Affine::rotate(angle) * Affine::scale(self.layout.scale);
        let half = 0.5 * f64::from(self.texture.width());
        let quad_to_texel = Affine::new([half, 0.0, 0.0, half, half - 0.5, half - 0.5]);
        quad_to_texel * quad_to_view.inverse() * to_view
    }

    /// Bilinear opacity lookup; texels outside the texture are transparent.
    fn sample(&self, tx: f64, ty: f64) -> u8 {
        let x0 = tx.floor();
        let y0 = ty.floor();
        let fx = tx - x0;
        let fy = ty - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = lerp(self.texel(x0, y0), self.texel(x0 + 1, y0), fx);
        let bottom = lerp(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy).round().clamp(0.0, 255.0) as u8
    }

    fn texel(&self, x: i64, y: i64) -> f64 {
        let size = i64::from(self.texture.width());
        if x < 0 || y < 0 || x >= size || y >= size {
            return 0.0;
        }
        let idx = (y * size + x) as usize;
        f64::from(self.texture.data()[idx])
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
