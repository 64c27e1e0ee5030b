//! Sobel kernel coefficients and the per-pixel gradient accumulation
//!
//! Both kernels are fixed 3x3 integer matrices indexed `[row][col]`, where
//! row 0 is the line above the pixel and col 0 the column to its left.
//!
//! With 8-bit samples the accumulated sums stay within `[-1020, 1020]`, so
//! 16-bit signed lanes are wide enough for accumulation; squaring needs
//! 32-bit integers or floats.

/// Horizontal gradient kernel
pub const GX: [[i16; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Vertical gradient kernel
pub const GY: [[i16; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Largest absolute value either accumulator can reach for 8-bit input
pub const MAX_ABS_SUM: i32 = 4 * 255;

/// Compute `(sumX, sumY)` for the interior pixel `(x, y)`
///
/// Reads the 3x3 neighborhood row by row, left to right.
///
/// # Panics
///
/// Panics if the neighborhood is out of bounds, i.e. if `(x, y)` is not an
/// interior pixel of an image `width` pixels wide backed by `input`.
///
/// # Examples
///
/// ```
/// use borde::gradient_at;
///
/// // Left column dark, right column bright
/// let input = [0, 0, 255, 0, 0, 255, 0, 0, 255];
/// assert_eq!(gradient_at(&input, 3, 1, 1), (1020, 0));
/// ```
#[inline]
pub fn gradient_at(input: &[u8], width: usize, x: usize, y: usize) -> (i32, i32) {
    assert!(
        x >= 1 && x + 1 < width && y >= 1,
        "({x}, {y}) is not an interior pixel"
    );

    let mut sum_x = 0i32;
    let mut sum_y = 0i32;

    for ky in 0..3 {
        let start = (y + ky - 1) * width + x - 1;
        let window = &input[start..start + 3];
        for (kx, &pixel) in window.iter().enumerate() {
            let pixel = i32::from(pixel);
            sum_x += i32::from(GX[ky][kx]) * pixel;
            sum_y += i32::from(GY[ky][kx]) * pixel;
        }
    }

    (sum_x, sum_y)
}
