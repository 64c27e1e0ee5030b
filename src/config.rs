//! Call configuration
//!
//! # Examples
//!
//! ```
//! use borde::config::SobelConfig;
//! use borde::Variant;
//!
//! // Defaults: auto-selected exact variant, global worker pool
//! let default = SobelConfig::default();
//! assert_eq!(default.variant, Variant::Auto);
//!
//! // Dual-lane parallel variant on four dedicated workers
//! let custom = SobelConfig::new()
//!     .with_variant(Variant::ParallelDualLane)
//!     .with_threads(4)
//!     .with_rows_per_task(8)
//!     .build();
//! assert_eq!(custom.threads, Some(4));
//! ```

use crate::Variant;

/// Settings for [`crate::apply_sobel_with_config`]
///
/// `threads` and `rows_per_task` only affect the parallel variant and never
/// change the bytes it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SobelConfig {
    /// Execution strategy
    pub variant: Variant,
    /// Dedicated worker count (`None` = rayon's global pool)
    pub threads: Option<usize>,
    /// Image rows handed to each parallel task (at least 1)
    pub rows_per_task: usize,
}

impl Default for SobelConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Auto,
            threads: None,
            rows_per_task: 1,
        }
    }
}

impl SobelConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Run the parallel variant on a dedicated pool of `threads` workers
    ///
    /// Zero is clamped to a single worker.
    ///
    /// # Examples
    ///
    /// ```
    /// use borde::config::SobelConfig;
    ///
    /// assert_eq!(SobelConfig::new().with_threads(0).threads, Some(1));
    /// ```
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    /// Set how many rows each parallel task processes
    ///
    /// Zero is clamped to 1.
    pub fn with_rows_per_task(mut self, rows: usize) -> Self {
        self.rows_per_task = rows.max(1);
        self
    }

    /// Finalize the configuration
    pub fn build(self) -> Self {
        self
    }
}
