//! Fork/join distribution of [`RowTask`]s over disjoint row ranges.

use std::ops::Range;

use rayon::prelude::*;

use crate::foundation::error::{SpiralError, SpiralResult};
use crate::spiral::task::RowTask;

/// Default number of rows handed to one parallel task.
pub const DEFAULT_ROWS_PER_TASK: usize = 16;

/// How a row-major buffer is split among workers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatcher {
    /// One task over every row, on the calling thread.
    Sequential,
    /// Row ranges of `rows_per_task` rows run on a dedicated rayon pool.
    Parallel(ParallelOpts),
}

/// Options for [`Dispatcher::Parallel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelOpts {
    /// Worker thread count. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Rows per task; `0` is treated as `1`.
    pub rows_per_task: usize,
}

impl Default for ParallelOpts {
    fn default() -> Self {
        Self {
            threads: None,
            rows_per_task: DEFAULT_ROWS_PER_TASK,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::Parallel(ParallelOpts::default())
    }
}

impl Dispatcher {
    /// Parallel dispatcher with explicit threads and chunking.
    pub fn parallel(threads: Option<usize>, rows_per_task: usize) -> Self {
        Self::Parallel(ParallelOpts {
            threads,
            rows_per_task,
        })
    }

    /// Run `task` over every row of `out`, returning once all rows are written.
    ///
    /// `out` is interpreted as rows of `row_len` bytes. Returns the number of task invocations.
    pub fn dispatch<T: RowTask>(
        &self,
        task: &T,
        row_len: usize,
        out: &mut [u8],
    ) -> SpiralResult<usize> {
        if row_len == 0 {
            return Err(SpiralError::validation("dispatch row length must be >= 1"));
        }
        if !out.len().is_multiple_of(row_len) {
            return Err(SpiralError::validation(format!(
                "dispatch buffer of {} bytes is not a whole number of {row_len}-byte rows",
                out.len()
            )));
        }
        let height = u32::try_from(out.len() / row_len)
            .map_err(|_| SpiralError::validation("dispatch buffer has more than u32::MAX rows"))?;

        match self {
            Self::Sequential => {
                task.fill_rows(0..height, out);
                Ok(1)
            }
            Self::Parallel(opts) => {
                let ranges = partition_rows(height, opts.rows_per_task);
                let jobs = split_rows(out, row_len, &ranges);
                let tasks = jobs.len();
                let run = || {
                    tracing::debug!(
                        rows = height,
                        tasks,
                        threads = rayon::current_num_threads(),
                        "dispatching row tasks"
                    );
                    jobs.into_par_iter()
                        .for_each(|(rows, slice)| task.fill_rows(rows, slice));
                };
                match build_thread_pool(opts.threads)? {
                    Some(pool) => pool.install(run),
                    None => run(),
                }
                Ok(tasks)
            }
        }
    }
}

/// Split `[0, height)` into consecutive ranges of at most `rows_per_task` rows.
///
/// The ranges are disjoint, ordered, and cover every row exactly once.
pub fn partition_rows(height: u32, rows_per_task: usize) -> Vec<Range<u32>> {
    let step = u32::try_from(rows_per_task.max(1)).unwrap_or(u32::MAX);
    let mut out = Vec::with_capacity(height.div_ceil(step) as usize);
    let mut start = 0u32;
    while start < height {
        let end = start.saturating_add(step).min(height);
        out.push(start..end);
        start = end;
    }
    out
}

fn split_rows<'a>(
    mut out: &'a mut [u8],
    row_len: usize,
    ranges: &[Range<u32>],
) -> Vec<(Range<u32>, &'a mut [u8])> {
    let mut jobs = Vec::with_capacity(ranges.len());
    for rows in ranges {
        let len = (rows.end - rows.start) as usize * row_len;
        let (head, tail) = std::mem::take(&mut out).split_at_mut(len);
        jobs.push((rows.clone(), head));
        out = tail;
    }
    jobs
}

/// Dedicated pool for an explicit thread count; `None` means "use the global rayon pool".
pub(crate) fn build_thread_pool(
    threads: Option<usize>,
) -> SpiralResult<Option<rayon::ThreadPool>> {
    let Some(n) = threads else {
        return Ok(None);
    };
    if n == 0 {
        return Err(SpiralError::validation(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map(Some)
        .map_err(|e| SpiralError::render(format!("failed to build rayon thread pool: {e}")))
}
