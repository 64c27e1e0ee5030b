//! Row-partitioned multi-threaded dispatch
//!
//! The output is split into chunks of whole rows. Each task zeroes the border
//! cells of its rows and convolves their interior, so no two tasks ever write
//! the same byte and no synchronization is needed beyond rayon's join at the
//! end of the call. The input is only read.
//!
//! Without the `parallel` feature the same chunks run in order on the calling
//! thread, producing identical bytes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::backends::{convolve_row_with_border, RowKernel};

/// Border and interior of the whole image, `rows_per_task` rows per task
///
/// Runs on the current rayon pool (the global one unless called inside
/// `ThreadPool::install`).
///
/// # Safety
///
/// - The instruction set `K` targets must be available
/// - `input.len()` and `output.len()` must both equal `width * height`
/// - `width >= 1` and `rows_per_task >= 1`
pub(crate) unsafe fn convolve_image_parallel<K: RowKernel>(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
    rows_per_task: usize,
) {
    let chunk_len = width * rows_per_task;

    let process_chunk = |(chunk_idx, chunk): (usize, &mut [u8])| {
        let first_row = chunk_idx * rows_per_task;
        for (offset, out_row) in chunk.chunks_exact_mut(width).enumerate() {
            // SAFETY: capability and buffer sizes are guaranteed by the caller;
            // each chunk covers a distinct set of rows.
            unsafe {
                convolve_row_with_border::<K>(input, width, height, first_row + offset, out_row);
            }
        }
    };

    #[cfg(feature = "parallel")]
    output
        .par_chunks_mut(chunk_len)
        .enumerate()
        .for_each(process_chunk);

    #[cfg(not(feature = "parallel"))]
    output
        .chunks_mut(chunk_len)
        .enumerate()
        .for_each(process_chunk);
}

/// Run `op` on a dedicated pool of `threads` workers
#[cfg(feature = "parallel")]
pub(crate) fn with_thread_pool<R: Send>(
    threads: usize,
    op: impl FnOnce() -> R + Send,
) -> crate::Result<R> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| crate::SobelError::ThreadPool(e.to_string()))?;
    Ok(pool.install(op))
}

/// Without rayon every call already runs on the caller's thread
#[cfg(not(feature = "parallel"))]
pub(crate) fn with_thread_pool<R: Send>(
    _threads: usize,
    op: impl FnOnce() -> R + Send,
) -> crate::Result<R> {
    Ok(op())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::convolve_image;
    use crate::backends::scalar::ScalarKernel;
    use crate::magnitude::{AbsSum, Euclidean};

    fn gradient_image(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .map(|i| ((i % width) * 13 + (i / width) * 29) as u8)
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential_for_any_chunking() {
        let (width, height) = (23, 17);
        let input = gradient_image(width, height);

        let mut expected = vec![0u8; width * height];
        unsafe {
            convolve_image::<ScalarKernel<AbsSum>>(&input, width, height, &mut expected);
        }

        for rows_per_task in [1, 2, 3, 5, 16, 17, 100] {
            let mut output = vec![123u8; width * height];
            unsafe {
                convolve_image_parallel::<ScalarKernel<AbsSum>>(
                    &input,
                    width,
                    height,
                    &mut output,
                    rows_per_task,
                );
            }
            assert_eq!(output, expected, "rows_per_task={rows_per_task}");
        }
    }

    #[test]
    fn test_parallel_degenerate_sizes() {
        for (width, height) in [(1, 1), (1, 4), (4, 1), (2, 2), (2, 30), (30, 2)] {
            let input = vec![255u8; width * height];
            let mut output = vec![1u8; width * height];
            unsafe {
                convolve_image_parallel::<ScalarKernel<Euclidean>>(
                    &input,
                    width,
                    height,
                    &mut output,
                    1,
                );
            }
            assert!(output.iter().all(|&v| v == 0), "{width}x{height}");
        }
    }

    #[test]
    fn test_dedicated_pool_runs_op() {
        let value = with_thread_pool(2, || 40 + 2).unwrap();
        assert_eq!(value, 42);
    }
}
