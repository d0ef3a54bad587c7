//! CPU compositing of the rotating spiral into RGBA frames.

/// Rotation over time.
pub mod animation;
/// Range rendering, sequential or on a rayon pool.
pub mod pipeline;
/// The scene: texture, layout and colours.
pub mod scene;
