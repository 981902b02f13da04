//! Flat-index-to-element adapters.
//!
//! An indexer is the smallest access capability a traversal can consume: a
//! mapping from a flat storage index to an element reference. The family is
//! composable: a direct indexer wraps a container, a chained indexer
//! normalizes nested compositions to one concrete type, and a converter
//! indexer remaps the incoming index before delegating.

use crate::layout::{Layout, Order};
use crate::{Result, TraverseError};

/// Flat-index element access.
///
/// `at(i)` with `i` outside the underlying container is a precondition
/// violation; indexers perform no validation of their own beyond the
/// container's.
pub trait Indexer {
    /// Element type produced by the access.
    type Elem;

    /// Reference to the element at flat index `i`.
    fn at(&self, i: usize) -> &Self::Elem;
}

/// Mutable flat-index element access.
pub trait IndexerMut: Indexer {
    /// Mutable reference to the element at flat index `i`.
    fn at_mut(&mut self, i: usize) -> &mut Self::Elem;
}

/// Direct indexer over a borrowed slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceIndexer<'a, T> {
    data: &'a [T],
}

impl<'a, T> SliceIndexer<'a, T> {
    /// Wrap a slice.
    #[inline]
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    /// Length of the underlying slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the underlying slice is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Indexer for SliceIndexer<'_, T> {
    type Elem = T;

    #[inline]
    fn at(&self, i: usize) -> &T {
        &self.data[i]
    }
}

/// Direct mutable indexer over a borrowed slice.
#[derive(Debug)]
pub struct SliceIndexerMut<'a, T> {
    data: &'a mut [T],
}

impl<'a, T> SliceIndexerMut<'a, T> {
    /// Wrap a mutable slice.
    #[inline]
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }

    /// Length of the underlying slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the underlying slice is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Indexer for SliceIndexerMut<'_, T> {
    type Elem = T;

    #[inline]
    fn at(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexerMut for SliceIndexerMut<'_, T> {
    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

/// Indexer wrapping another indexer by ownership, forwarding unchanged.
///
/// Collapses nested adapter compositions to a single concrete type at a
/// construction boundary.
#[derive(Debug, Clone, Copy)]
pub struct ChainedIndexer<I> {
    inner: I,
}

impl<I> ChainedIndexer<I> {
    /// Take ownership of an inner indexer.
    #[inline]
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Unwrap the inner indexer.
    #[inline]
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: Indexer> Indexer for ChainedIndexer<I> {
    type Elem = I::Elem;

    #[inline]
    fn at(&self, i: usize) -> &I::Elem {
        self.inner.at(i)
    }
}

impl<I: IndexerMut> IndexerMut for ChainedIndexer<I> {
    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut I::Elem {
        self.inner.at_mut(i)
    }
}

/// Indexer applying an index-to-index mapping before delegating.
///
/// `at(i)` computes `inner.at(convert(i))`. The mapping may be a closure or
/// a reference to one; [`OrderRemap::convert`] is the canonical mapping for
/// translating between the row-major and column-major flat orderings of a
/// shape without moving data.
#[derive(Debug, Clone, Copy)]
pub struct ConvertIndexer<I, F> {
    inner: I,
    convert: F,
}

impl<I, F> ConvertIndexer<I, F> {
    /// Wrap an inner indexer with an index mapping.
    #[inline]
    pub fn new(inner: I, convert: F) -> Self {
        Self { inner, convert }
    }
}

impl<I, F> Indexer for ConvertIndexer<I, F>
where
    I: Indexer,
    F: Fn(usize) -> usize,
{
    type Elem = I::Elem;

    #[inline]
    fn at(&self, i: usize) -> &I::Elem {
        self.inner.at((self.convert)(i))
    }
}

impl<I, F> IndexerMut for ConvertIndexer<I, F>
where
    I: IndexerMut,
    F: Fn(usize) -> usize,
{
    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut I::Elem {
        self.inner.at_mut((self.convert)(i))
    }
}

/// Flat-index translation between two layouts of the same shape.
///
/// Decomposes an incoming flat index into per-axis coordinates using the
/// source layout's divisor table, then recomposes against the target
/// layout's strides. O(rank) per call.
#[derive(Debug, Clone, Copy)]
pub struct OrderRemap<'t> {
    from: &'t Layout,
    to: &'t Layout,
}

impl<'t> OrderRemap<'t> {
    /// Build a remap from `from`-layout flat indices to `to`-layout flat
    /// indices.
    ///
    /// # Errors
    /// Returns [`TraverseError::ShapeMismatch`] if the two layouts describe
    /// different shapes.
    pub fn new(from: &'t Layout, to: &'t Layout) -> Result<Self> {
        if from.shape() != to.shape() {
            return Err(TraverseError::ShapeMismatch(
                from.shape().to_vec(),
                to.shape().to_vec(),
            ));
        }
        Ok(Self { from, to })
    }

    /// Map a `from`-layout flat index to the same element's `to`-layout
    /// flat index.
    pub fn convert(&self, i: usize) -> usize {
        let rank = self.from.rank();
        let divisors = self.from.divisors();
        let to_strides = self.to.strides();
        let mut rem = i;
        let mut out = 0usize;
        // Most-significant axis first for the source order.
        match self.from.order() {
            Order::RowMajor => {
                for axis in 0..rank {
                    let (q, r) = divisors[axis].div_rem(rem);
                    out += q * to_strides[axis];
                    rem = r;
                }
            }
            Order::ColumnMajor => {
                for axis in (0..rank).rev() {
                    let (q, r) = divisors[axis].div_rem(rem);
                    out += q * to_strides[axis];
                    rem = r;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Layout, Order};

    #[test]
    fn test_slice_indexer() {
        let data = [10, 20, 30];
        let idx = SliceIndexer::new(&data);
        assert_eq!(*idx.at(0), 10);
        assert_eq!(*idx.at(2), 30);
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn test_slice_indexer_mut() {
        let mut data = [1, 2, 3];
        let mut idx = SliceIndexerMut::new(&mut data);
        *idx.at_mut(1) = 20;
        assert_eq!(*idx.at(1), 20);
        assert_eq!(data, [1, 20, 3]);
    }

    #[test]
    fn test_chained_indexer_forwards() {
        let data = [5, 6, 7];
        let idx = ChainedIndexer::new(ChainedIndexer::new(SliceIndexer::new(&data)));
        assert_eq!(*idx.at(2), 7);
    }

    #[test]
    fn test_convert_indexer_reverses() {
        let data = [1, 2, 3, 4];
        let idx = ConvertIndexer::new(SliceIndexer::new(&data), |i| 3 - i);
        assert_eq!(*idx.at(0), 4);
        assert_eq!(*idx.at(3), 1);
    }

    #[test]
    fn test_order_remap_round_trip() {
        let row = Layout::new(vec![2, 3], Order::RowMajor);
        let col = Layout::new(vec![2, 3], Order::ColumnMajor);
        let to_col = OrderRemap::new(&row, &col).unwrap();
        let to_row = OrderRemap::new(&col, &row).unwrap();
        // Row-major index 1 is coordinate (0, 1), column-major flat 2.
        assert_eq!(to_col.convert(1), 2);
        for i in 0..6 {
            assert_eq!(to_row.convert(to_col.convert(i)), i);
        }
    }

    #[test]
    fn test_order_remap_through_convert_indexer() {
        // A row-major walk over column-major storage of the same shape.
        let row = Layout::new(vec![2, 3], Order::RowMajor);
        let col = Layout::new(vec![2, 3], Order::ColumnMajor);
        let remap = OrderRemap::new(&row, &col).unwrap();
        // Column-major storage of [[0, 1, 2], [3, 4, 5]].
        let data = [0, 3, 1, 4, 2, 5];
        let idx = ConvertIndexer::new(SliceIndexer::new(&data), |i| remap.convert(i));
        for i in 0..6 {
            assert_eq!(*idx.at(i), i);
        }
    }

    #[test]
    fn test_order_remap_shape_mismatch() {
        let a = Layout::new(vec![2, 3], Order::RowMajor);
        let b = Layout::new(vec![3, 2], Order::ColumnMajor);
        assert!(matches!(
            OrderRemap::new(&a, &b),
            Err(TraverseError::ShapeMismatch(_, _))
        ));
    }
}
