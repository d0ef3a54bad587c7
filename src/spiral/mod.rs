//! Spiral texture synthesis.
//!
//! [`SpiralBuffer::new`] sizes a square power-of-two texture for the requested radius, splits its
//! rows among [`RowTask`] invocations through a [`Dispatcher`], and evaluates the
//! [`DistanceField`] for every pixel. The result is identical for every way of splitting the rows.

/// The finished texture.
pub mod buffer;
/// Row-range fan-out over a rayon pool.
pub mod dispatch;
/// Per-pixel opacity.
pub mod field;
/// Shape parameters.
pub mod params;
/// Power-of-two sizing and display scale.
pub mod sizing;
/// Scanline work units.
pub mod task;

pub use buffer::SpiralBuffer;
pub use dispatch::{Dispatcher, ParallelOpts, partition_rows};
pub use field::{ANTI_ALIAS_BORDER, DistanceField};
pub use params::SpiralParams;
pub use sizing::{MAX_TEXTURE_SIZE, SpiralLayout, spiral_size, texture_size};
pub use task::{RowTask, ScanlineTask};
