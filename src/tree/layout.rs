//! Flat-index arithmetic for the scan tree
//!
//! Heap layout: left(i) = 2i + 1, right(i) = 2i + 2, root at index 0.
//! A node is a leaf iff its index reaches the padded leaf row, i.e.
//! i >= padded_len - 1.

/// Derived sizes and pure index queries for one scan.
///
/// `TreeLayout` is plain arithmetic over an input length; it never
/// touches element data and has no failure modes. All node indices
/// handed to the queries are valid by construction of the sweeps that
/// call them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLayout {
    /// Real input length n
    len: usize,

    /// Leaf slots after padding: smallest power of two >= n
    padded_len: usize,

    /// Total node count: 2 * padded_len - 1
    tree_size: usize,
}

impl TreeLayout {
    /// Derive the layout for `len` input elements.
    ///
    /// `next_power_of_two` maps 0 to 1, so the empty input still owns
    /// a one-leaf, one-node tree.
    pub fn for_len(len: usize) -> Self {
        let padded_len = len.next_power_of_two();

        Self {
            len,
            padded_len,
            tree_size: 2 * padded_len - 1,
        }
    }

    /// Number of real input elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the layout covers no real elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Leaf slots after padding (a power of two, at least 1).
    #[inline]
    pub fn padded_len(&self) -> usize {
        self.padded_len
    }

    /// Total node count of the tree buffer.
    #[inline]
    pub fn tree_size(&self) -> usize {
        self.tree_size
    }

    /// Index of the left child of `node`.
    #[inline]
    pub fn left(&self, node: usize) -> usize {
        2 * node + 1
    }

    /// Index of the right child of `node`.
    #[inline]
    pub fn right(&self, node: usize) -> usize {
        2 * node + 2
    }

    /// Whether `node` sits on the padded leaf row.
    #[inline]
    pub fn is_leaf(&self, node: usize) -> bool {
        node >= self.padded_len - 1
    }

    /// Position of a leaf node in the input sequence (0-based, left to
    /// right). Positions at or beyond [`len`](Self::len) are padding
    /// and carry no data.
    #[inline]
    pub fn leaf_position(&self, node: usize) -> usize {
        node - (self.padded_len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_rounds_up_to_powers_of_two() {
        assert_eq!(TreeLayout::for_len(1).padded_len(), 1);
        assert_eq!(TreeLayout::for_len(5).padded_len(), 8);
        assert_eq!(TreeLayout::for_len(8).padded_len(), 8);
        assert_eq!(TreeLayout::for_len(9).padded_len(), 16);
    }

    #[test]
    fn empty_input_owns_a_single_node() {
        let layout = TreeLayout::for_len(0);
        assert!(layout.is_empty());
        assert_eq!(layout.padded_len(), 1);
        assert_eq!(layout.tree_size(), 1);
        assert!(layout.is_leaf(0));
        assert_eq!(layout.leaf_position(0), 0);
    }

    #[test]
    fn children_follow_heap_offsets() {
        let layout = TreeLayout::for_len(8);
        assert_eq!(layout.left(0), 1);
        assert_eq!(layout.right(0), 2);
        assert_eq!(layout.left(3), 7);
        assert_eq!(layout.right(3), 8);
    }

    #[test]
    fn leaf_row_starts_after_the_internal_nodes() {
        // Padded to 8 leaves: 7 internal nodes, then the leaf row.
        let layout = TreeLayout::for_len(5);
        assert_eq!(layout.tree_size(), 15);

        for node in 0..7 {
            assert!(!layout.is_leaf(node), "node {node} misread as leaf");
        }
        for node in 7..15 {
            assert!(layout.is_leaf(node), "node {node} misread as internal");
            assert_eq!(layout.leaf_position(node), node - 7);
        }
    }

    #[test]
    fn every_leaf_is_reachable_by_child_steps() {
        // Walking only-left and only-right from the root must land on
        // the first and last leaf respectively.
        let layout = TreeLayout::for_len(16);

        let mut node = 0;
        while !layout.is_leaf(node) {
            node = layout.left(node);
        }
        assert_eq!(layout.leaf_position(node), 0);

        let mut node = 0;
        while !layout.is_leaf(node) {
            node = layout.right(node);
        }
        assert_eq!(layout.leaf_position(node), layout.padded_len() - 1);
    }
}
