//! Magnitude policies: how `(sumX, sumY)` is reduced to one output byte
//!
//! The two policies are distinct and never stand in for one another:
//!
//! - [`Euclidean`]: `round(sqrt(sumX² + sumY²))`, clamped to 255
//! - [`AbsSum`]: `|sumX| + |sumY|`, clamped to 255
//!
//! For any pair of sums `max(|sumX|, |sumY|) <= Euclidean <= AbsSum`, and
//! `AbsSum` overestimates the Euclidean magnitude by at most a factor of √2.

/// Reduction of the two gradient accumulators to an 8-bit magnitude
pub trait MagnitudePolicy: Copy + Send + Sync + 'static {
    /// Reduce the accumulators of one pixel, saturating to `[0, 255]`
    fn magnitude(sum_x: i32, sum_y: i32) -> u8;
}

/// True Euclidean magnitude via square root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl MagnitudePolicy for Euclidean {
    #[inline]
    fn magnitude(sum_x: i32, sum_y: i32) -> u8 {
        let squared = (i64::from(sum_x).pow(2) + i64::from(sum_y).pow(2)) as f64;
        let magnitude = squared.sqrt().round();
        if magnitude >= 255.0 {
            255
        } else {
            magnitude as u8
        }
    }
}

/// Abs-sum approximation, no floating point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsSum;

impl MagnitudePolicy for AbsSum {
    #[inline]
    fn magnitude(sum_x: i32, sum_y: i32) -> u8 {
        let magnitude = sum_x.unsigned_abs().saturating_add(sum_y.unsigned_abs());
        magnitude.min(255) as u8
    }
}
