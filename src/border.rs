//! One-pixel border zeroing
//!
//! Interior convolution never writes border cells, so the border can be
//! written before the interior ([`zero_border`]) or row by row alongside it
//! ([`zero_row_border`]) without any two writers touching the same byte.

/// Zero the outermost rows and columns of a `width x height` image
///
/// Images narrower or shorter than 3 pixels are entirely border and end up
/// all zero.
///
/// # Panics
///
/// Panics if `output.len() < width * height`.
///
/// # Examples
///
/// ```
/// use borde::border::zero_border;
///
/// let mut image = vec![9u8; 4 * 3];
/// zero_border(4, 3, &mut image);
/// assert_eq!(image, [0, 0, 0, 0, 0, 9, 9, 0, 0, 0, 0, 0]);
/// ```
pub fn zero_border(width: usize, height: usize, output: &mut [u8]) {
    if width == 0 || height == 0 {
        return;
    }

    output[..width].fill(0);
    output[(height - 1) * width..height * width].fill(0);

    for row in output[..height * width].chunks_exact_mut(width) {
        row[0] = 0;
        row[width - 1] = 0;
    }
}

/// Zero the border cells that fall in row `y` of a `height`-row image
///
/// Returns `true` when the row has an interior left to compute.
#[inline]
pub fn zero_row_border(y: usize, height: usize, out_row: &mut [u8]) -> bool {
    let width = out_row.len();
    if width == 0 {
        return false;
    }

    if y == 0 || y + 1 >= height || width < 3 {
        out_row.fill(0);
        return false;
    }

    out_row[0] = 0;
    out_row[width - 1] = 0;
    true
}
