//! Frame sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by
//! [`render_to_sink`](crate::render_to_sink).

/// `ffmpeg`-based MP4 output via the system `ffmpeg` binary.
pub mod ffmpeg;
/// Generic frame sink trait, in-memory and PNG sequence sinks.
pub mod sink;
