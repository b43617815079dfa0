//! # Parallel Prefix Sum via an Array-Mapped Scan Tree
//!
//! This library computes inclusive running totals (the Ladner-Fischer
//! scan) over a borrowed slice:
//!
//! 1. **Up-sweep**: build a complete binary tree of subtree sums, the
//!    leaf row padded with zeros up to the next power of two.
//! 2. **Down-sweep**: push each node's "sum of everything to its left"
//!    down the tree; every real leaf writes `offset + own value`.
//!
//! Both sweeps fork a transient task for the left subtree while the
//! current context takes the right one, but only in the top
//! `parallel_depth` levels of the tree. That bounds the fan-out to
//! `2^parallel_depth` concurrent tasks regardless of input size, while
//! the heaviest subtrees are still summed in parallel.
//!
//! ## Usage Example
//!
//! ```
//! use parascan::ScanEngine;
//!
//! let data = [1u64, 2, 3, 4, 5];
//! let engine = ScanEngine::new(&data)?;
//!
//! let mut prefix = vec![0u64; data.len()];
//! engine.compute(&mut prefix)?;
//! assert_eq!(prefix, [1, 3, 6, 10, 15]);
//! # Ok::<(), parascan::ScanError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules - each implements one half of the algorithm
pub mod scan; // Up-sweep / down-sweep engine
pub mod tree; // Array-mapped tree geometry

// Re-exports for convenience
pub use scan::ScanEngine;
pub use tree::TreeLayout;

use num_traits::Zero;
use thiserror::Error;

/// Configuration parameters for the scan engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Fan-out cutoff: recursion forks a task for the left subtree at
    /// tree levels `0..parallel_depth` (root = level 0), so at most
    /// `2^parallel_depth` tasks run at the widest level. Zero keeps
    /// both sweeps fully sequential.
    pub parallel_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel_depth: Self::DEFAULT_PARALLEL_DEPTH,
        }
    }
}

impl ScanConfig {
    /// Default fan-out cutoff: the top four levels fork, at most 16
    /// concurrent tasks.
    pub const DEFAULT_PARALLEL_DEPTH: usize = 4;

    /// Fully sequential configuration: no tasks are ever forked.
    pub fn sequential() -> Self {
        Self { parallel_depth: 0 }
    }

    /// Derive the cutoff from the hardware: the smallest depth whose
    /// task bound `2^depth` covers the available cores, capped at 8.
    pub fn for_available_parallelism() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let parallel_depth = workers.next_power_of_two().trailing_zeros() as usize;

        Self {
            parallel_depth: parallel_depth.min(8),
        }
    }

    /// Upper bound on concurrently forked tasks at the widest level.
    pub fn max_tasks(&self) -> usize {
        1 << self.parallel_depth
    }
}

/// Errors that can occur while building or running a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Launching a fork-join task failed (resource exhaustion). The
    /// failure is fatal: it is never retried and never silently
    /// degraded to sequential execution.
    #[error("failed to launch scan task: {0}")]
    TaskSpawn(#[from] std::io::Error),

    /// The output buffer handed to [`ScanEngine::compute`] does not
    /// have the input's length.
    #[error("output length {actual} does not match input length {expected}")]
    LengthMismatch {
        /// Required length (the input length).
        expected: usize,
        /// Length the caller actually provided.
        actual: usize,
    },
}

/// Convenience entry point: scan `input` into a freshly allocated
/// vector using the default configuration.
pub fn prefix_sum<T>(input: &[T]) -> Result<Vec<T>, ScanError>
where
    T: Zero + Copy + Send + Sync,
{
    let engine = ScanEngine::new(input)?;
    let mut output = vec![T::zero(); input.len()];
    engine.compute(&mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cutoff_bounds_tasks_to_sixteen() {
        let config = ScanConfig::default();
        assert_eq!(config.parallel_depth, 4);
        assert_eq!(config.max_tasks(), 16);
    }

    #[test]
    fn sequential_config_never_forks() {
        let config = ScanConfig::sequential();
        assert_eq!(config.parallel_depth, 0);
        assert_eq!(config.max_tasks(), 1);
    }

    #[test]
    fn hardware_config_covers_available_cores() {
        let config = ScanConfig::for_available_parallelism();
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert!(config.max_tasks() >= workers.min(256));
        assert!(config.parallel_depth <= 8);
    }

    #[test]
    fn prefix_sum_convenience_matches_running_total() {
        assert_eq!(prefix_sum(&[1u32, 2, 3, 4]).unwrap(), vec![1, 3, 6, 10]);
    }
}
