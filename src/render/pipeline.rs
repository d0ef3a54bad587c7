use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::ThreadingConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{SpiralError, SpiralResult};
use crate::render::scene::{FrameRGBA, SpiralScene};
use crate::spiral::dispatch::build_thread_pool;

/// Frame-level threading for range renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    /// Render frames on a rayon pool.
    pub parallel: bool,
    /// Frames per batch; each batch is rendered, then handed out in order.
    pub chunk_size: usize,
    /// Worker thread count. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Render each distinct rotation angle once and clone it for repeats.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

impl From<&ThreadingConfig> for RenderThreading {
    fn from(cfg: &ThreadingConfig) -> Self {
        Self {
            parallel: cfg.parallel,
            chunk_size: cfg.chunk_size,
            threads: cfg.threads,
            static_frame_elision: true,
        }
    }
}

/// Counters from a range render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames produced.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames copied from an identical earlier frame.
    pub frames_elided: u64,
}

impl RenderStats {
    fn add(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render every frame of `range`, in order.
///
/// Output is byte-identical for every threading configuration.
pub fn render_frames(
    scene: &SpiralScene,
    range: FrameRange,
    threading: &RenderThreading,
) -> SpiralResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    let stats = render_chunks(scene, range, threading, |_, frame| {
        out.push(frame);
        Ok(())
    })?;
    Ok((out, stats))
}

/// Render `range` and stream the frames into `sink`.
#[tracing::instrument(skip(scene, sink), err)]
pub fn render_to_sink(
    scene: &SpiralScene,
    range: FrameRange,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> SpiralResult<RenderStats> {
    let fps = scene.animation().fps;
    let viewport = scene.viewport();
    sink.begin(SinkConfig {
        width: viewport.width,
        height: viewport.height,
        fps,
    })?;
    let stats = render_chunks(scene, range, threading, |idx, frame| {
        sink.push_frame(idx, &frame)
    })?;
    sink.end()?;
    tracing::info!(
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "range rendered"
    );
    Ok(stats)
}

fn render_chunks(
    scene: &SpiralScene,
    range: FrameRange,
    threading: &RenderThreading,
    mut emit: impl FnMut(FrameIndex, FrameRGBA) -> SpiralResult<()>,
) -> SpiralResult<RenderStats> {
    if range.is_empty() {
        return Err(SpiralError::validation("render range must be non-empty"));
    }

    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let pool = if threading.parallel {
        build_thread_pool(threading.threads)?
    } else {
        None
    };

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = chunk_start.saturating_add(chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))
            .map_err(|e| SpiralError::render(format!("invalid chunk range: {e}")))?;

        let (frames, chunk_stats) = render_chunk(scene, chunk, threading, pool.as_ref())?;
        for (offset, frame) in frames.into_iter().enumerate() {
            emit(FrameIndex(chunk_start + offset as u64), frame)?;
        }

        stats.add(chunk_stats);
        chunk_start = chunk_end;
    }
    Ok(stats)
}

fn render_chunk(
    scene: &SpiralScene,
    range: FrameRange,
    threading: &RenderThreading,
    pool: Option<&rayon::ThreadPool>,
) -> SpiralResult<(Vec<FrameRGBA>, RenderStats)> {
    let angles: Vec<f64> = (range.start.0..range.end.0)
        .map(|f| scene.animation().angle_at(FrameIndex(f)))
        .collect();

    let mut unique_angles = Vec::<f64>::with_capacity(angles.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(angles.len());
    if threading.static_frame_elision {
        let mut first = HashMap::<u64, usize>::new();
        for &angle in &angles {
            let slot = *first.entry(angle.to_bits()).or_insert_with(|| {
                unique_angles.push(angle);
                unique_angles.len() - 1
            });
            frame_to_unique.push(slot);
        }
    } else {
        unique_angles.extend_from_slice(&angles);
        frame_to_unique.extend(0..angles.len());
    }

    let render_one = |angle: &f64| -> FrameRGBA {
        let viewport = scene.viewport();
        let mut data = vec![0u8; viewport.width as usize * viewport.height as usize * 4];
        scene.render_rotated_into(*angle, &mut data);
        FrameRGBA {
            width: viewport.width,
            height: viewport.height,
            data,
        }
    };

    let rendered: Vec<FrameRGBA> = match (threading.parallel, pool) {
        (false, _) => unique_angles.iter().map(render_one).collect(),
        (true, Some(pool)) => pool.install(|| unique_angles.par_iter().map(render_one).collect()),
        (true, None) => unique_angles.par_iter().map(render_one).collect(),
    };

    let mut unique_frames: Vec<Option<FrameRGBA>> = rendered.into_iter().map(Some).collect();
    let mut remaining = vec![0usize; unique_frames.len()];
    for &u in &frame_to_unique {
        remaining[u] += 1;
    }

    let mut out = Vec::<FrameRGBA>::with_capacity(frame_to_unique.len());
    for u in frame_to_unique {
        let frame = if remaining[u] == 1 {
            unique_frames[u].take()
        } else {
            unique_frames[u].clone()
        };
        out.push(frame.ok_or_else(|| {
            SpiralError::render("internal error: unique frame missing at final take")
        })?);
        remaining[u] -= 1;
    }

    let total = angles.len() as u64;
    let rendered_count = unique_angles.len() as u64;
    Ok((
        out,
        RenderStats {
            frames_total: total,
            frames_rendered: rendered_count,
            frames_elided: total.saturating_sub(rendered_count),
        },
    ))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}
