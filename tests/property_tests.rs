//! Property-based tests over every variant
//!
//! Variants that need AVX2 are skipped (their calls must report
//! `UnsupportedBackend`) when the processor lacks it.

use borde::{
    apply_sobel, apply_sobel_with_config, gradient_at, is_avx2_available, Backend, SobelConfig,
    SobelError, Variant,
};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 64;

/// Random image with dimensions in the given ranges
fn image(
    widths: std::ops::Range<usize>,
    heights: std::ops::Range<usize>,
) -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
    (widths, heights).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), w * h).prop_map(move |data| (w, h, data))
    })
}

/// Runs `variant`; `None` when it is unavailable on this processor
fn run(variant: Variant, input: &[u8], width: usize, height: usize) -> Option<Vec<u8>> {
    let mut output = vec![0xAA; input.len()];
    match apply_sobel(variant, input, width, height, &mut output) {
        Ok(()) => Some(output),
        Err(SobelError::UnsupportedBackend(Backend::AVX2)) if !is_avx2_available() => None,
        Err(e) => panic!("{variant:?} failed: {e}"),
    }
}

fn is_border(x: usize, y: usize, width: usize, height: usize) -> bool {
    x == 0 || y == 0 || x + 1 == width || y + 1 == height
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    /// Every border cell is 0 for every variant
    #[test]
    fn prop_border_is_zero((width, height, input) in image(1..80, 1..12)) {
        for variant in Variant::ALL {
            let Some(output) = run(variant, &input, width, height) else { continue };
            for y in 0..height {
                for x in 0..width {
                    if is_border(x, y, width, height) {
                        prop_assert_eq!(output[y * width + x], 0, "{:?} at ({}, {})", variant, x, y);
                    }
                }
            }
        }
    }

    /// AVX2 exact output is byte-identical to the scalar reference
    #[test]
    fn prop_exact_variants_agree((width, height, input) in image(3..120, 3..8)) {
        let reference = run(Variant::Reference, &input, width, height).unwrap();
        if let Some(avx2) = run(Variant::Avx2Exact, &input, width, height) {
            prop_assert_eq!(avx2, reference);
        }
    }

    /// max(|sumX|, |sumY|) <= approx <= |sumX| + |sumY| (both saturated)
    #[test]
    fn prop_dual_lane_within_bounds((width, height, input) in image(3..120, 3..8)) {
        for variant in [Variant::Avx2DualLane, Variant::ParallelDualLane] {
            let Some(output) = run(variant, &input, width, height) else { continue };
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    let (sx, sy) = gradient_at(&input, width, x, y);
                    let lower = sx.abs().max(sy.abs()).min(255);
                    let upper = (sx.abs() + sy.abs()).min(255);
                    let value = i32::from(output[y * width + x]);
                    prop_assert!(lower <= value && value <= upper, "{:?} at ({}, {})", variant, x, y);
                    prop_assert_eq!(value, upper);
                }
            }
        }
    }

    /// Approximation never undershoots the exact magnitude, never exceeds √2 of it
    #[test]
    fn prop_dual_lane_vs_reference((width, height, input) in image(3..70, 3..7)) {
        let reference = run(Variant::Reference, &input, width, height).unwrap();
        let Some(approx) = run(Variant::Avx2DualLane, &input, width, height) else {
            return Ok(());
        };
        for (&exact, &approx) in reference.iter().zip(&approx) {
            prop_assert!(approx >= exact);
            let ceiling = (f64::from(exact) + 0.5) * std::f64::consts::SQRT_2;
            prop_assert!(f64::from(approx) <= ceiling.min(255.0).ceil());
        }
    }

    /// Worker count and chunk height never change the parallel output
    #[test]
    fn prop_partition_independence(
        (width, height, input) in image(1..100, 1..40),
        threads in 1usize..5,
        rows_per_task in 1usize..9,
    ) {
        if !is_avx2_available() {
            return Ok(());
        }

        let single = run(Variant::Avx2DualLane, &input, width, height).unwrap();
        let config = SobelConfig::new()
            .with_variant(Variant::ParallelDualLane)
            .with_threads(threads)
            .with_rows_per_task(rows_per_task);
        let mut output = vec![0x55; input.len()];
        apply_sobel_with_config(&config, &input, width, height, &mut output).unwrap();
        prop_assert_eq!(output, single);
    }
}
