//! The multi-axis cursor.
//!
//! A walker holds a flat position and the per-axis displacement tables of a
//! [`Layout`], and moves that position one axis at a time in O(1): a step
//! adds the axis's adapted stride, a reset adds or removes the axis's full
//! wrap-around delta. Walkers perform no axis-bounds checking; the
//! traverser driving them is responsible for staying inside `[0, rank)`.

use crate::indexer::{Indexer, IndexerMut};
use crate::layout::Layout;

/// Per-axis cursor movement plus dereference.
///
/// All movement is O(1). Implementations never validate axis arguments.
pub trait Walker {
    /// Element type reached through the cursor.
    type Elem;

    /// Number of axes this walker understands.
    fn dim(&self) -> usize;

    /// Move one position forward along `axis`.
    fn step(&mut self, axis: usize);

    /// Move one position backward along `axis`.
    fn step_back(&mut self, axis: usize);

    /// Move `n` positions forward along `axis`.
    fn walk(&mut self, axis: usize, n: usize);

    /// Move `n` positions backward along `axis`.
    fn walk_back(&mut self, axis: usize, n: usize);

    /// Jump from the first to the last position on `axis`.
    fn reset(&mut self, axis: usize);

    /// Jump from the last back to the first position on `axis`.
    fn reset_back(&mut self, axis: usize);

    /// Return the cursor to the baseline offset.
    fn rewind(&mut self);

    /// Make the current cursor the new baseline offset.
    fn update_offset(&mut self);

    /// Current flat position.
    fn cursor(&self) -> usize;

    /// Dereference the cursor through the indexer.
    fn get(&self) -> &Self::Elem;
}

/// Mutable dereference for walkers over mutable storage.
pub trait WalkerMut: Walker {
    /// Mutable dereference of the cursor.
    fn get_mut(&mut self) -> &mut Self::Elem;
}

/// Walker over a layout's adapted and reset stride tables.
///
/// Borrows the tables from the owning [`Layout`], which must outlive the
/// walker. Cheap to copy: two slice references, two integers, and the
/// indexer.
#[derive(Debug, Clone)]
pub struct StrideWalker<'t, I> {
    indexer: I,
    adapted: &'t [usize],
    reset: &'t [usize],
    offset: usize,
    cursor: usize,
}

impl<'t, I> StrideWalker<'t, I> {
    /// Walker positioned at flat index 0.
    pub fn new(indexer: I, layout: &'t Layout) -> Self {
        Self::with_offset(indexer, layout, 0)
    }

    /// Walker whose baseline is a non-zero flat offset.
    ///
    /// Used when a view or partition chunk starts partway into its parent
    /// storage; the cursor starts at `offset` and [`Walker::rewind`]
    /// returns there.
    pub fn with_offset(indexer: I, layout: &'t Layout, offset: usize) -> Self {
        Self {
            indexer,
            adapted: layout.adapted_strides(),
            reset: layout.reset_strides(),
            offset,
            cursor: offset,
        }
    }
}

impl<I: Indexer> Walker for StrideWalker<'_, I> {
    type Elem = I::Elem;

    #[inline]
    fn dim(&self) -> usize {
        self.adapted.len()
    }

    #[inline]
    fn step(&mut self, axis: usize) {
        self.cursor += self.adapted[axis];
    }

    #[inline]
    fn step_back(&mut self, axis: usize) {
        self.cursor -= self.adapted[axis];
    }

    #[inline]
    fn walk(&mut self, axis: usize, n: usize) {
        self.cursor += n * self.adapted[axis];
    }

    #[inline]
    fn walk_back(&mut self, axis: usize, n: usize) {
        self.cursor -= n * self.adapted[axis];
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        self.cursor += self.reset[axis];
    }

    #[inline]
    fn reset_back(&mut self, axis: usize) {
        self.cursor -= self.reset[axis];
    }

    #[inline]
    fn rewind(&mut self) {
        self.cursor = self.offset;
    }

    #[inline]
    fn update_offset(&mut self) {
        self.offset = self.cursor;
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    fn get(&self) -> &I::Elem {
        self.indexer.at(self.cursor)
    }
}

impl<I: IndexerMut> WalkerMut for StrideWalker<'_, I> {
    #[inline]
    fn get_mut(&mut self) -> &mut I::Elem {
        self.indexer.at_mut(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::{SliceIndexer, SliceIndexerMut};
    use crate::layout::Order;

    fn layout_2x3() -> Layout {
        Layout::new(vec![2, 3], Order::RowMajor)
    }

    #[test]
    fn test_step_and_walk() {
        let layout = layout_2x3();
        let data: Vec<i32> = (0..6).collect();
        let mut w = StrideWalker::new(SliceIndexer::new(&data), &layout);

        assert_eq!(*w.get(), 0);
        w.step(1);
        assert_eq!(w.cursor(), 1);
        w.step(0);
        assert_eq!(*w.get(), 4);
        w.step_back(1);
        w.walk(1, 2);
        assert_eq!(*w.get(), 5);
        w.walk_back(0, 1);
        assert_eq!(*w.get(), 2);
    }

    #[test]
    fn test_reset_is_full_axis_delta() {
        let layout = layout_2x3();
        let data: Vec<i32> = (0..6).collect();
        let mut w = StrideWalker::new(SliceIndexer::new(&data), &layout);

        w.reset(1);
        assert_eq!(w.cursor(), 2);
        w.reset_back(1);
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn test_unit_axis_never_moves() {
        let layout = Layout::new(vec![2, 1, 3], Order::RowMajor);
        let data: Vec<i32> = (0..6).collect();
        let mut w = StrideWalker::new(SliceIndexer::new(&data), &layout);

        w.step(1);
        w.walk(1, 10);
        w.reset(1);
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn test_offset_baseline_and_rewind() {
        let layout = layout_2x3();
        let data: Vec<i32> = (0..6).collect();
        let mut w = StrideWalker::with_offset(SliceIndexer::new(&data), &layout, 3);

        assert_eq!(*w.get(), 3);
        w.step(1);
        w.step(1);
        w.rewind();
        assert_eq!(w.cursor(), 3);

        w.walk(1, 2);
        w.update_offset();
        w.step_back(1);
        w.rewind();
        assert_eq!(w.cursor(), 5);
    }

    #[test]
    fn test_get_mut_writes_through() {
        let layout = layout_2x3();
        let mut data: Vec<i32> = vec![0; 6];
        let mut w = StrideWalker::new(SliceIndexerMut::new(&mut data), &layout);

        w.step(0);
        w.step(1);
        *w.get_mut() = 7;
        assert_eq!(data[4], 7);
    }
}
