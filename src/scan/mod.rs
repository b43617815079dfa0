//! Up-sweep / down-sweep scan engine
//!
//! Two passes over the array-mapped tree:
//!
//! 1. **Build (up-sweep)**: `tree[i]` becomes the sum of every real
//!    input value under node `i`; padding leaves contribute zero.
//! 2. **Compute (down-sweep)**: each node pushes the sum of everything
//!    strictly to its left down as an offset; real leaves write
//!    `offset + own value` into the caller's output.
//!
//! Both passes fork a transient task for the left subtree while the
//! current context takes the right one, but only at levels above the
//! configured cutoff; below it recursion stays sequential. A node's
//! combine (and a right subtree's offset read) happens strictly after
//! the forked left task has joined.

mod shared;

use std::thread;

use num_traits::Zero;

use crate::tree::TreeLayout;
use crate::{ScanConfig, ScanError};
use shared::SharedWrites;

/// Parallel inclusive prefix-sum engine.
///
/// Construction performs the full up-sweep, so the tree of subtree
/// sums is complete before the engine is handed back. The input slice
/// is borrowed (never copied) for the engine's lifetime, which also
/// keeps the caller from mutating it while scans are outstanding.
/// [`compute`](Self::compute) only reads the tree and the input, so it
/// may be called any number of times with identical results.
#[derive(Debug)]
pub struct ScanEngine<'a, T> {
    layout: TreeLayout,
    input: &'a [T],
    tree: Box<[T]>,
    parallel_depth: usize,
}

impl<'a, T> ScanEngine<'a, T>
where
    T: Zero + Copy + Send + Sync,
{
    /// Build the engine (full up-sweep) with the default configuration.
    pub fn new(input: &'a [T]) -> Result<Self, ScanError> {
        Self::with_config(input, ScanConfig::default())
    }

    /// Build the engine with an explicit configuration.
    pub fn with_config(input: &'a [T], config: ScanConfig) -> Result<Self, ScanError> {
        let layout = TreeLayout::for_len(input.len());
        let mut tree = vec![T::zero(); layout.tree_size()].into_boxed_slice();

        {
            let span = tracing::debug_span!(
                "up_sweep",
                len = input.len(),
                parallel_depth = config.parallel_depth
            );
            let _enter = span.enter();

            let sums = SharedWrites::new(&mut tree);
            let sweep = UpSweep {
                layout,
                input,
                sums: &sums,
                parallel_depth: config.parallel_depth,
            };
            sweep.fill(0, 0)?;
        }

        Ok(Self {
            layout,
            input,
            tree,
            parallel_depth: config.parallel_depth,
        })
    }

    /// Down-sweep the built tree into `output`, writing the inclusive
    /// prefix sum of the input.
    ///
    /// `output` must have exactly the input's length (anything else is
    /// [`ScanError::LengthMismatch`]). Every slot is written exactly
    /// once and none is ever read.
    pub fn compute(&self, output: &mut [T]) -> Result<(), ScanError> {
        if output.len() != self.input.len() {
            return Err(ScanError::LengthMismatch {
                expected: self.input.len(),
                actual: output.len(),
            });
        }

        let span = tracing::debug_span!("down_sweep", len = self.input.len());
        let _enter = span.enter();

        let prefixes = SharedWrites::new(output);
        let sweep = DownSweep {
            layout: self.layout,
            input: self.input,
            sums: &self.tree,
            prefixes: &prefixes,
            parallel_depth: self.parallel_depth,
        };
        sweep.fill(0, 0, T::zero())
    }

    /// Sum of the entire input: the root of the scan tree.
    pub fn total(&self) -> T {
        self.tree[0]
    }

    /// Number of input elements covered by the engine.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the engine covers an empty input.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

/// Immutable up-sweep context shared by every forked task.
struct UpSweep<'e, T> {
    layout: TreeLayout,
    input: &'e [T],
    sums: &'e SharedWrites<'e, T>,
    parallel_depth: usize,
}

impl<T> UpSweep<'_, T>
where
    T: Zero + Copy + Send + Sync,
{
    /// Fill `sums[node]` with the subtree total and return it.
    fn fill(&self, node: usize, level: usize) -> Result<T, ScanError> {
        if self.layout.is_leaf(node) {
            let pos = self.layout.leaf_position(node);
            let value = if pos < self.layout.len() {
                self.input[pos]
            } else {
                T::zero()
            };
            // SAFETY: every node index is reached by exactly one
            // recursive call, so this write cannot alias another.
            unsafe { self.sums.write(node, value) };
            return Ok(value);
        }

        let (lhs, rhs) = (self.layout.left(node), self.layout.right(node));
        let total = if level < self.parallel_depth {
            let (left_sum, right_sum) = thread::scope(|s| {
                let left_task = thread::Builder::new()
                    .spawn_scoped(s, move || self.fill(lhs, level + 1))
                    .map_err(ScanError::TaskSpawn)?;
                let right_sum = self.fill(rhs, level + 1)?;
                let left_sum = join_task(left_task)?;
                Ok::<_, ScanError>((left_sum, right_sum))
            })?;
            left_sum + right_sum
        } else {
            self.fill(lhs, level + 1)? + self.fill(rhs, level + 1)?
        };

        // SAFETY: as above, `node` belongs to this call alone.
        unsafe { self.sums.write(node, total) };
        Ok(total)
    }
}

/// Immutable down-sweep context shared by every forked task.
struct DownSweep<'e, T> {
    layout: TreeLayout,
    input: &'e [T],
    sums: &'e [T],
    prefixes: &'e SharedWrites<'e, T>,
    parallel_depth: usize,
}

impl<T> DownSweep<'_, T>
where
    T: Zero + Copy + Send + Sync,
{
    /// Write `incoming + input[pos]` at every real leaf under `node`,
    /// where `incoming` is the sum of all real elements strictly to
    /// the left of the subtree.
    fn fill(&self, node: usize, level: usize, incoming: T) -> Result<(), ScanError> {
        if self.layout.is_leaf(node) {
            let pos = self.layout.leaf_position(node);
            if pos < self.layout.len() {
                // SAFETY: exactly one root-to-leaf path addresses
                // `pos`, so output slots never alias across tasks.
                unsafe { self.prefixes.write(pos, incoming + self.input[pos]) };
            }
            return Ok(());
        }

        let (lhs, rhs) = (self.layout.left(node), self.layout.right(node));
        // The left subtree's total was fixed during the up-sweep, so
        // reading it here races with nothing.
        let right_incoming = incoming + self.sums[lhs];

        if level < self.parallel_depth {
            thread::scope(|s| {
                let left_task = thread::Builder::new()
                    .spawn_scoped(s, move || self.fill(lhs, level + 1, incoming))
                    .map_err(ScanError::TaskSpawn)?;
                self.fill(rhs, level + 1, right_incoming)?;
                join_task(left_task)
            })
        } else {
            self.fill(lhs, level + 1, incoming)?;
            self.fill(rhs, level + 1, right_incoming)
        }
    }
}

fn join_task<T>(task: thread::ScopedJoinHandle<'_, Result<T, ScanError>>) -> Result<T, ScanError> {
    match task.join() {
        Ok(result) => result,
        // A panic in a forked sweep is a bug in the sweep itself;
        // surface it on the joining context instead of converting it
        // into a scan error.
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
