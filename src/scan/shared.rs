//! Shared write access for disjoint-index parallel fills

use std::cell::UnsafeCell;

/// View of a mutable slice that concurrent tasks may fill, provided no
/// two tasks ever address the same index.
///
/// Both sweep phases satisfy that by construction: the up-sweep writes
/// each tree node from exactly one recursive call, and the down-sweep
/// writes each output slot from exactly one root-to-leaf path. Heap
/// layout scatters a subtree's node indices across the buffer, so the
/// partition cannot be expressed with `split_at_mut`; this view
/// carries the disjointness invariant instead.
pub(crate) struct SharedWrites<'a, T> {
    cells: &'a [UnsafeCell<T>],
}

impl<'a, T> SharedWrites<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        // SAFETY: `UnsafeCell<T>` has the same memory layout as `T`,
        // and the exclusive borrow guarantees no other live view of
        // the data exists while this one does.
        let cells = unsafe { &*(slice as *mut [T] as *const [UnsafeCell<T>]) };
        Self { cells }
    }

    /// Store `value` at `index`.
    ///
    /// # Safety
    ///
    /// No other task may read or write `index` for the duration of the
    /// enclosing fork-join region.
    pub(crate) unsafe fn write(&self, index: usize, value: T) {
        *self.cells[index].get() = value;
    }
}

// SAFETY: tasks only ever touch pairwise-disjoint indices (see type
// docs), so sharing the view between threads cannot create an aliased
// write.
unsafe impl<T: Send> Sync for SharedWrites<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_land_in_the_backing_slice() {
        let mut backing = vec![0u32; 4];
        {
            let view = SharedWrites::new(&mut backing);
            unsafe {
                view.write(0, 7);
                view.write(3, 9);
            }
        }
        assert_eq!(backing, [7, 0, 0, 9]);
    }

    #[test]
    fn concurrent_disjoint_writes_are_visible_after_join() {
        let mut backing = vec![0usize; 8];
        {
            let view = SharedWrites::new(&mut backing);
            std::thread::scope(|s| {
                for half in 0..2 {
                    let view = &view;
                    s.spawn(move || {
                        for idx in (half * 4)..(half * 4 + 4) {
                            unsafe { view.write(idx, idx * 10) };
                        }
                    });
                }
            });
        }
        assert_eq!(backing, [0, 10, 20, 30, 40, 50, 60, 70]);
    }
}
