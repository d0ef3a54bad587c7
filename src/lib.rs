//! Spiralsaver draws a rotating, woven spiral.
//!
//! The spiral is a single-channel opacity texture synthesized once, in parallel, from a handful
//! of shape parameters. Animation never touches the texture again: each frame only rotates it
//! and composites it over a background.
//!
//! - Synthesize a [`SpiralBuffer`] from [`SpiralParams`] with a [`Dispatcher`]
//! - Or build a [`SpiralScene`] for a viewport from a [`SpiralConfig`]
//! - Render single frames or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// JSON configuration.
pub mod config;
/// Frame sinks: in-memory, PNG sequence, ffmpeg MP4.
pub mod encode;
/// Frame compositing and range rendering.
pub mod render;
/// Texture synthesis.
pub mod spiral;

pub use crate::foundation::core::{Affine, Fps, FrameIndex, FrameRange, Point, Viewport};
pub use crate::foundation::error::{SpiralError, SpiralResult};

pub use crate::config::{SpiralConfig, ThreadingConfig};
pub use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder, FfmpegSink, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png_rgba,
};
pub use crate::render::animation::SpiralAnimation;
pub use crate::render::pipeline::{RenderStats, RenderThreading, render_frames, render_to_sink};
pub use crate::render::scene::{FrameRGBA, SpiralScene};
pub use crate::spiral::{
    DistanceField, Dispatcher, ParallelOpts, RowTask, ScanlineTask, SpiralBuffer, SpiralLayout,
    SpiralParams, partition_rows, spiral_size, texture_size,
};
