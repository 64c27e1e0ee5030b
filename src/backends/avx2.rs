//! AVX2 backend implementation (x86_64 advanced SIMD)
//!
//! Two row kernels share the same windowed loads and tap accumulation:
//!
//! - [`Avx2ExactKernel`]: 16 pixels per step. One 128-bit load per window is
//!   widened to 16 x i16, the sums are widened again to i32/f32 and reduced
//!   with a square root. Bit-identical to the scalar Euclidean reference.
//! - [`Avx2DualLaneKernel`]: 32 pixels per step. One 256-bit load per window
//!   is split into two 128-bit halves, each widened to 16 x i16, and reduced
//!   with saturating `|sumX| + |sumY|`.
//!
//! Each window sits at `x - 1`, `x` or `x + 1` of a kernel row. A step is only
//! taken while `x + LANES <= width - 1`, so every load stays inside its own
//! image row; the remainder of the row goes through the scalar kernel with
//! the same magnitude policy.
//!
//! # Safety
//!
//! All AVX2 intrinsics are marked `unsafe` by Rust. Callers must have
//! verified AVX2 support (see [`crate::is_avx2_available`]).

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::scalar::ScalarKernel;
use super::RowKernel;
use crate::kernel::{GX, GY};
use crate::magnitude::{AbsSum, Euclidean};

/// AVX2 16-lane kernel with exact Euclidean magnitude
pub struct Avx2ExactKernel;

/// AVX2 32-lane (two 16-lane halves) kernel with abs-sum magnitude
pub struct Avx2DualLaneKernel;

/// Running `sumX` / `sumY` for 16 pixels in i16 lanes
#[derive(Clone, Copy)]
struct Accumulators {
    x: __m256i,
    y: __m256i,
}

impl Accumulators {
    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn zero() -> Self {
        Self {
            x: _mm256_setzero_si256(),
            y: _mm256_setzero_si256(),
        }
    }
}

/// 16 samples starting at `ptr`, widened to i16
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load_window_16(ptr: *const u8) -> __m256i {
    _mm256_cvtepu8_epi16(_mm_loadu_si128(ptr as *const __m128i))
}

/// 32 samples starting at `ptr`, as two widened 16-lane halves (low, high)
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load_window_32(ptr: *const u8) -> (__m256i, __m256i) {
    let bytes = _mm256_loadu_si256(ptr as *const __m256i);
    (
        _mm256_cvtepu8_epi16(_mm256_castsi256_si128(bytes)),
        _mm256_cvtepu8_epi16(_mm256_extracti128_si256::<1>(bytes)),
    )
}

/// Multiply the left/center/right windows of kernel row `ky` and accumulate
///
/// Products are at most 2 * 255 and the full sums stay within ±1020, so
/// wrapping i16 arithmetic never overflows.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn accumulate_taps(acc: &mut Accumulators, ky: usize, windows: [__m256i; 3]) {
    for (kx, window) in windows.into_iter().enumerate() {
        let gx = GX[ky][kx];
        let gy = GY[ky][kx];
        if gx != 0 {
            acc.x = _mm256_add_epi16(acc.x, _mm256_mullo_epi16(_mm256_set1_epi16(gx), window));
        }
        if gy != 0 {
            acc.y = _mm256_add_epi16(acc.y, _mm256_mullo_epi16(_mm256_set1_epi16(gy), window));
        }
    }
}

/// `round(sqrt(x² + y²))` for 8 i32 lanes
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn euclidean_epi32(x: __m256i, y: __m256i) -> __m256i {
    let fx = _mm256_cvtepi32_ps(x);
    let fy = _mm256_cvtepi32_ps(y);
    let squared = _mm256_add_ps(_mm256_mul_ps(fx, fx), _mm256_mul_ps(fy, fy));
    // cvtps rounds to nearest under the default MXCSR mode
    _mm256_cvtps_epi32(_mm256_sqrt_ps(squared))
}

/// Reduce 16 pixels of accumulators to 16 saturated bytes, in pixel order
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn reduce_euclidean(acc: Accumulators) -> __m128i {
    let x_lo = _mm256_cvtepi16_epi32(_mm256_castsi256_si128(acc.x));
    let x_hi = _mm256_cvtepi16_epi32(_mm256_extracti128_si256::<1>(acc.x));
    let y_lo = _mm256_cvtepi16_epi32(_mm256_castsi256_si128(acc.y));
    let y_hi = _mm256_cvtepi16_epi32(_mm256_extracti128_si256::<1>(acc.y));

    let mag_lo = euclidean_epi32(x_lo, y_lo);
    let mag_hi = euclidean_epi32(x_hi, y_hi);

    // packs interleaves per 128-bit lane: [lo 0-3, hi 0-3, lo 4-7, hi 4-7]
    let packed = _mm256_packs_epi32(mag_lo, mag_hi);
    let ordered = _mm256_permute4x64_epi64::<0b11_01_10_00>(packed);

    _mm_packus_epi16(
        _mm256_castsi256_si128(ordered),
        _mm256_extracti128_si256::<1>(ordered),
    )
}

/// Saturating `|sumX| + |sumY|` for 16 i16 lanes
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn abs_sum_epi16(acc: Accumulators) -> __m256i {
    _mm256_adds_epu16(_mm256_abs_epi16(acc.x), _mm256_abs_epi16(acc.y))
}

impl RowKernel for Avx2ExactKernel {
    const LANES: usize = 16;
    type Magnitude = Euclidean;

    #[target_feature(enable = "avx2")]
    unsafe fn convolve_row(input: &[u8], width: usize, y: usize, out_row: &mut [u8]) {
        debug_assert_eq!(out_row.len(), width);
        debug_assert!((y + 2) * width <= input.len());

        let mut x = 1;

        // Process 16 pixels at a time
        while x + Self::LANES < width {
            let mut acc = Accumulators::zero();

            for ky in 0..3 {
                let left = input.as_ptr().add((y + ky - 1) * width + x - 1);
                accumulate_taps(
                    &mut acc,
                    ky,
                    [
                        load_window_16(left),
                        load_window_16(left.add(1)),
                        load_window_16(left.add(2)),
                    ],
                );
            }

            let result = reduce_euclidean(acc);
            _mm_storeu_si128(out_row.as_mut_ptr().add(x) as *mut __m128i, result);

            x += Self::LANES;
        }

        // Handle remaining pixels with scalar code
        ScalarKernel::<Euclidean>::convolve_span(input, width, y, x..width - 1, out_row);
    }
}

impl RowKernel for Avx2DualLaneKernel {
    const LANES: usize = 32;
    type Magnitude = AbsSum;

    #[target_feature(enable = "avx2")]
    unsafe fn convolve_row(input: &[u8], width: usize, y: usize, out_row: &mut [u8]) {
        debug_assert_eq!(out_row.len(), width);
        debug_assert!((y + 2) * width <= input.len());

        let mut x = 1;

        // Process 32 pixels at a time as two 16-lane halves
        while x + Self::LANES < width {
            let mut low = Accumulators::zero();
            let mut high = Accumulators::zero();

            for ky in 0..3 {
                let left = input.as_ptr().add((y + ky - 1) * width + x - 1);
                let (left_lo, left_hi) = load_window_32(left);
                let (center_lo, center_hi) = load_window_32(left.add(1));
                let (right_lo, right_hi) = load_window_32(left.add(2));

                accumulate_taps(&mut low, ky, [left_lo, center_lo, right_lo]);
                accumulate_taps(&mut high, ky, [left_hi, center_hi, right_hi]);
            }

            // packus interleaves per 128-bit lane: [lo 0-7, hi 0-7, lo 8-15, hi 8-15]
            let packed = _mm256_packus_epi16(abs_sum_epi16(low), abs_sum_epi16(high));
            let ordered = _mm256_permute4x64_epi64::<0b11_01_10_00>(packed);
            _mm256_storeu_si256(out_row.as_mut_ptr().add(x) as *mut __m256i, ordered);

            x += Self::LANES;
        }

        // Handle remaining pixels with the same abs-sum formula
        ScalarKernel::<AbsSum>::convolve_span(input, width, y, x..width - 1, out_row);
    }
}
