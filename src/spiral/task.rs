use std::ops::Range;

use crate::spiral::{field::DistanceField, params::SpiralParams};

/// Work that fills a contiguous range of rows of a row-major byte buffer.
///
/// `out` covers exactly `rows` (`rows.len() * row_len` bytes) and is never shared with another
/// invocation. Implementations read only immutable state, which is what makes the `Sync` bound
/// sufficient for dispatching them across threads.
pub trait RowTask: Sync {
    /// Fill every byte of `out`, which holds the rows `rows`.
    fn fill_rows(&self, rows: Range<u32>, out: &mut [u8]);
}

/// Evaluates the spiral distance field over whole scanlines.
#[derive(Clone, Copy, Debug)]
pub struct ScanlineTask {
    field: DistanceField,
    width: u32,
    cx: f64,
    cy: f64,
}

impl ScanlineTask {
    /// Task for a `width x height` buffer with the spiral centered at `(width/2, height/2)`.
    pub fn new(params: &SpiralParams, width: u32, height: u32) -> Self {
        Self {
            field: DistanceField::new(params),
            width,
            cx: 0.5 * f64::from(width),
            cy: 0.5 * f64::from(height),
        }
    }

    /// Row length in bytes.
    pub fn width(&self) -> u32 {
        self.width
    }
}

impl RowTask for ScanlineTask {
    fn fill_rows(&self, rows: Range<u32>, out: &mut [u8]) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        debug_assert_eq!(out.len(), (rows.end - rows.start) as usize * width);

        for (y, line) in rows.zip(out.chunks_exact_mut(width)) {
            let dy = f64::from(y) - self.cy;
            for (x, px) in line.iter_mut().enumerate() {
                *px = self.field.opacity_at(x as f64 - self.cx, dy);
            }
        }
    }
}
