use std::{
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::encode::sink::{FrameSink, SinkConfig, ensure_dir};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SpiralError, SpiralResult};
use crate::render::scene::FrameRGBA;

/// Encoder settings for one MP4 file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Frame width in pixels; must be even.
    pub width: u32,
    /// Frame height in pixels; must be even.
    pub height: u32,
    /// Integer frames per second.
    pub fps: u32,
    /// Output file.
    pub out_path: PathBuf,
    /// Replace `out_path` if it exists.
    pub overwrite: bool,
}

impl EncodeConfig {
    /// Check the settings against what the libx264/yuv420p pipeline accepts.
    pub fn validate(&self) -> SpiralResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SpiralError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(SpiralError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SpiralError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

/// Return `true` when a working `ffmpeg` binary is on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Streams raw RGBA frames into a system `ffmpeg` process.
///
/// Dropping an encoder without calling [`FfmpegEncoder::finish`] still closes `ffmpeg`'s stdin
/// and waits for the process, so no child outlives the encoder.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    /// Spawn `ffmpeg` for `cfg`.
    pub fn new(cfg: EncodeConfig) -> SpiralResult<Self> {
        cfg.validate()?;
        if let Some(parent) = cfg.out_path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_dir(parent)?;
        }

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(SpiralError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(SpiralError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            SpiralError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpiralError::encode("failed to open ffmpeg stdin (unexpected)"))?;

        tracing::debug!(out = %cfg.out_path.display(), "ffmpeg spawned");
        Ok(Self {
            cfg,
            child: Some(child),
            stdin: Some(stdin),
        })
    }

    /// Write one frame.
    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> SpiralResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(SpiralError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != self.cfg.width as usize * self.cfg.height as usize * 4 {
            return Err(SpiralError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SpiralError::encode("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&frame.data).map_err(|e| {
            SpiralError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    /// Close stdin and wait for `ffmpeg` to finish the file.
    pub fn finish(mut self) -> SpiralResult<()> {
        drop(self.stdin.take());

        let child = self
            .child
            .take()
            .ok_or_else(|| SpiralError::encode("ffmpeg encoder is already finalized"))?;
        let output = child.wait_with_output().map_err(|e| {
            SpiralError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpiralError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            match child.wait() {
                Ok(status) => tracing::warn!(
                    %status,
                    out = %self.cfg.out_path.display(),
                    "ffmpeg encoder dropped before finish"
                ),
                Err(e) => tracing::warn!(error = %e, "failed to wait for abandoned ffmpeg"),
            }
        }
    }
}

/// [`FrameSink`] that encodes an MP4 through [`FfmpegEncoder`].
///
/// Requires an integer frame rate.
pub struct FfmpegSink {
    out_path: PathBuf,
    overwrite: bool,
    encoder: Option<FfmpegEncoder>,
}

impl FfmpegSink {
    /// Sink writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite,
            encoder: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SpiralResult<()> {
        if cfg.fps.den != 1 {
            return Err(SpiralError::validation(
                "mp4 output currently requires integer fps (fps.den == 1)",
            ));
        }
        self.encoder = Some(FfmpegEncoder::new(EncodeConfig {
            width: cfg.width,
            height: cfg.height,
            fps: cfg.fps.num,
            out_path: self.out_path.clone(),
            overwrite: self.overwrite,
        })?);
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> SpiralResult<()> {
        self.encoder
            .as_mut()
            .ok_or_else(|| SpiralError::encode("ffmpeg sink used before begin"))?
            .encode_frame(frame)
    }

    fn end(&mut self) -> SpiralResult<()> {
        match self.encoder.take() {
            Some(enc) => enc.finish(),
            None => Err(SpiralError::encode("ffmpeg sink ended before begin")),
        }
    }
}
