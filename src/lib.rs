//! Borde: Sobel gradient-magnitude kernels
//!
//! **Borde** (Spanish: "edge") computes the Sobel gradient magnitude of an
//! 8-bit grayscale image. One contract, four execution strategies:
//!
//! 1. **Reference** - scalar, exact `round(sqrt(sumX² + sumY²))`
//! 2. **AVX2 exact** - 16 pixels per step, bit-identical to the reference
//! 3. **AVX2 dual-lane** - 32 pixels per step, `|sumX| + |sumY|` approximation
//! 4. **Parallel dual-lane** - the dual-lane kernel over row-disjoint chunks
//!    on a rayon pool
//!
//! Every variant writes 0 to the one-pixel border and saturates interior
//! values to `[0, 255]`. The exact and abs-sum formulas are distinct
//! policies; the abs-sum result lies in `[max(|sumX|, |sumY|), |sumX| + |sumY|]`.
//!
//! # Design Principles
//!
//! - **One convolution core**: row kernels parameterized by lane width and
//!   magnitude policy, shared border and row drivers
//! - **Fail fast**: buffers are validated and the AVX2 capability is checked
//!   before a single output byte is written
//! - **Zero unsafe in public API**: `unsafe` is isolated in the backends
//!
//! # Quick Start
//!
//! ```rust
//! use borde::{apply_sobel, Variant};
//!
//! // 5x5 image with a bright column at x = 2
//! let input: Vec<u8> = (0..25).map(|i| if i % 5 == 2 { 255 } else { 0 }).collect();
//! let mut output = vec![0u8; 25];
//!
//! apply_sobel(Variant::Reference, &input, 5, 5, &mut output).unwrap();
//! assert_eq!(&output[10..15], &[0, 255, 0, 255, 0]);
//! ```

pub mod backends;
pub mod border;
pub mod config;
pub mod error;
pub mod image;
pub mod kernel;
pub mod magnitude;
mod parallel;

pub use config::SobelConfig;
pub use error::{BufferRole, Result, SobelError};
pub use image::{validate_buffers, GrayImage};
pub use kernel::gradient_at;
pub use magnitude::{AbsSum, Euclidean, MagnitudePolicy};

#[cfg(feature = "tracing")]
use tracing::instrument;

use backends::scalar::ScalarKernel;

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Scalar fallback (no SIMD)
    Scalar,
    /// AVX2 (256-bit integer SIMD)
    AVX2,
    /// Auto-select best available
    Auto,
}

impl Backend {
    /// Select the best available backend for the current platform
    ///
    /// This is a convenience wrapper around `select_best_available_backend()`
    pub fn select_best() -> Self {
        select_best_available_backend()
    }

    /// Whether this backend can run on the executing processor
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar | Backend::Auto => true,
            Backend::AVX2 => is_avx2_available(),
        }
    }
}

/// Execution strategy for one Sobel call
///
/// The exact variants (`Reference`, `Avx2Exact`) produce identical bytes; the
/// dual-lane variants (`Avx2DualLane`, `ParallelDualLane`) produce identical
/// bytes to each other and use the abs-sum approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Scalar exact magnitude, the correctness oracle
    Reference,
    /// AVX2, 16 lanes, exact magnitude
    Avx2Exact,
    /// AVX2, 2 x 16 lanes, abs-sum magnitude
    Avx2DualLane,
    /// AVX2 dual-lane kernel over row-disjoint chunks on worker threads
    ParallelDualLane,
    /// `Avx2Exact` when AVX2 is present, `Reference` otherwise
    Auto,
}

impl Variant {
    /// All concrete variants, in the order above
    pub const ALL: [Variant; 4] = [
        Variant::Reference,
        Variant::Avx2Exact,
        Variant::Avx2DualLane,
        Variant::ParallelDualLane,
    ];

    /// Resolve `Auto` against the executing processor
    ///
    /// Concrete variants are returned unchanged. `Auto` never switches the
    /// magnitude formula: it only picks between the two exact variants.
    pub fn resolve(self) -> Variant {
        match self {
            Variant::Auto if is_avx2_available() => Variant::Avx2Exact,
            Variant::Auto => Variant::Reference,
            concrete => concrete,
        }
    }

    /// Instruction set the variant requires
    pub fn backend(self) -> Backend {
        match self {
            Variant::Reference => Backend::Scalar,
            Variant::Avx2Exact | Variant::Avx2DualLane | Variant::ParallelDualLane => Backend::AVX2,
            Variant::Auto => Backend::Auto,
        }
    }

    /// True for the variants computing `round(sqrt(sumX² + sumY²))`
    pub fn is_exact(self) -> bool {
        match self.resolve() {
            Variant::Reference | Variant::Avx2Exact => true,
            Variant::Avx2DualLane | Variant::ParallelDualLane | Variant::Auto => false,
        }
    }
}

/// Runtime AVX2 detection for the vector kernels
///
/// # Examples
///
/// ```
/// use borde::{is_avx2_available, Backend};
///
/// assert_eq!(Backend::AVX2.is_available(), is_avx2_available());
/// ```
pub fn is_avx2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("avx2")
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Select the best available backend for the current platform
///
/// **x86_64**: AVX2 if detected, else Scalar. **Other platforms**: Scalar.
pub fn select_best_available_backend() -> Backend {
    if is_avx2_available() {
        Backend::AVX2
    } else {
        Backend::Scalar
    }
}

/// Fail with `UnsupportedBackend` unless `available`
fn require_avx2(available: bool) -> Result<()> {
    if available {
        Ok(())
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("AVX2 is not supported on this processor");
        Err(SobelError::UnsupportedBackend(Backend::AVX2))
    }
}

/// Which AVX2 driver a call runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Avx2Path {
    Exact,
    DualLane,
    Parallel {
        threads: Option<usize>,
        rows_per_task: usize,
    },
}

/// Validate, check the capability, then run `path`
///
/// `avx2_available` is the result of AVX2 detection; nothing is
/// written to `output` unless every check passes.
fn run_avx2(
    path: Avx2Path,
    avx2_available: bool,
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    validate_buffers(input, width, height, output)?;
    require_avx2(avx2_available)?;

    #[cfg(target_arch = "x86_64")]
    match path {
        // SAFETY: AVX2 support was verified; buffer lengths were validated.
        Avx2Path::Exact => unsafe {
            backends::convolve_image::<backends::avx2::Avx2ExactKernel>(
                input, width, height, output,
            );
        },
        // SAFETY: as above.
        Avx2Path::DualLane => unsafe {
            backends::convolve_image::<backends::avx2::Avx2DualLaneKernel>(
                input, width, height, output,
            );
        },
        Avx2Path::Parallel {
            threads,
            rows_per_task,
        } => {
            let rows_per_task = rows_per_task.clamp(1, height);
            let mut run = || {
                // SAFETY: AVX2 support was verified; buffer lengths were
                // validated and width >= 1.
                unsafe {
                    parallel::convolve_image_parallel::<backends::avx2::Avx2DualLaneKernel>(
                        input,
                        width,
                        height,
                        output,
                        rows_per_task,
                    );
                }
            };

            match threads {
                Some(threads) => parallel::with_thread_pool(threads.max(1), run)?,
                None => run(),
            }
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    let _ = path;

    Ok(())
}

/// Scalar reference: exact Euclidean magnitude for every interior pixel
///
/// # Errors
///
/// Returns `InvalidDimensions` or `SizeMismatch` for a bad call; `output`
/// is untouched in that case.
///
/// # Examples
///
/// ```
/// use borde::apply_sobel_reference;
///
/// let input = [10u8; 16];
/// let mut output = [99u8; 16];
/// apply_sobel_reference(&input, 4, 4, &mut output).unwrap();
/// assert_eq!(output, [0u8; 16]);
/// ```
#[cfg_attr(feature = "tracing", instrument(skip(input, output)))]
pub fn apply_sobel_reference(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    validate_buffers(input, width, height, output)?;

    // SAFETY: the scalar kernel needs no special instructions; buffer
    // lengths were validated above.
    unsafe {
        backends::convolve_image::<ScalarKernel<Euclidean>>(input, width, height, output);
    }
    Ok(())
}

/// AVX2 16-lane exact variant, bit-identical to [`apply_sobel_reference`]
///
/// # Errors
///
/// - `InvalidDimensions` / `SizeMismatch` for a bad call
/// - `UnsupportedBackend(Backend::AVX2)` if the processor lacks AVX2
///
/// `output` is untouched on every error.
#[cfg_attr(feature = "tracing", instrument(skip(input, output)))]
pub fn apply_sobel_avx2_exact(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    run_avx2(
        Avx2Path::Exact,
        is_avx2_available(),
        input,
        width,
        height,
        output,
    )
}

/// AVX2 32-lane dual-lane variant with abs-sum magnitude
///
/// # Errors
///
/// - `InvalidDimensions` / `SizeMismatch` for a bad call
/// - `UnsupportedBackend(Backend::AVX2)` if the processor lacks AVX2
///
/// `output` is untouched on every error.
#[cfg_attr(feature = "tracing", instrument(skip(input, output)))]
pub fn apply_sobel_avx2_dual_lane(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    run_avx2(
        Avx2Path::DualLane,
        is_avx2_available(),
        input,
        width,
        height,
        output,
    )
}

/// Multi-threaded dual-lane variant on rayon's global pool, one row per task
///
/// Produces the same bytes as [`apply_sobel_avx2_dual_lane`]. Use
/// [`apply_sobel_with_config`] to pick a worker count or chunk height.
///
/// # Errors
///
/// - `InvalidDimensions` / `SizeMismatch` for a bad call
/// - `UnsupportedBackend(Backend::AVX2)` if the processor lacks AVX2; there
///   is no silent fallback to a slower variant
///
/// `output` is untouched on every error.
#[cfg_attr(feature = "tracing", instrument(skip(input, output)))]
pub fn apply_sobel_parallel(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    run_parallel(input, width, height, output, None, 1)
}

fn run_parallel(
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
    threads: Option<usize>,
    rows_per_task: usize,
) -> Result<()> {
    run_avx2(
        Avx2Path::Parallel {
            threads,
            rows_per_task,
        },
        is_avx2_available(),
        input,
        width,
        height,
        output,
    )
}

/// Run `variant` on the given buffers
///
/// `Variant::Auto` resolves to the fastest exact variant available.
///
/// # Errors
///
/// See the per-variant entry points.
#[cfg_attr(feature = "tracing", instrument(skip(input, output)))]
pub fn apply_sobel(
    variant: Variant,
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    apply_sobel_with_config(
        &SobelConfig::new().with_variant(variant),
        input,
        width,
        height,
        output,
    )
}

/// Run the configured variant on the given buffers
///
/// # Errors
///
/// See the per-variant entry points; additionally `ThreadPool` if a
/// dedicated worker pool cannot be built.
///
/// # Examples
///
/// ```
/// use borde::{apply_sobel_with_config, SobelConfig, Variant};
///
/// let config = SobelConfig::new().with_variant(Variant::Reference).build();
/// let input = [0u8; 9];
/// let mut output = [1u8; 9];
/// apply_sobel_with_config(&config, &input, 3, 3, &mut output).unwrap();
/// assert_eq!(output, [0u8; 9]);
/// ```
#[cfg_attr(feature = "tracing", instrument(skip(input, output)))]
pub fn apply_sobel_with_config(
    config: &SobelConfig,
    input: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<()> {
    let variant = config.variant.resolve();

    #[cfg(feature = "tracing")]
    tracing::debug!(requested = ?config.variant, resolved = ?variant, "dispatching sobel");

    match variant {
        Variant::Reference => apply_sobel_reference(input, width, height, output),
        Variant::Avx2Exact => apply_sobel_avx2_exact(input, width, height, output),
        Variant::Avx2DualLane => apply_sobel_avx2_dual_lane(input, width, height, output),
        Variant::ParallelDualLane => run_parallel(
            input,
            width,
            height,
            output,
            config.threads,
            config.rows_per_task,
        ),
        Variant::Auto => unreachable!("resolve() never yields Auto"),
    }
}
