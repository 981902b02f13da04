//! Traversal algorithms over a walker.
//!
//! A traverser owns a walker and the current coordinate vector, and drives
//! the walker through a layout's coordinate space: forward (`next`),
//! backward (`prev`), to either extreme in O(rank) (`to_first`/`to_last`),
//! or by flat-index random access (`move_to`). Traversal can be restricted
//! to an axis range or gated by a per-axis predicate; excluded axes keep
//! their coordinate fixed.
//!
//! The invariant maintained throughout: the walker's cursor equals the dot
//! product of the coordinates with the adapted strides, from the
//! traversal's starting offset.

use smallvec::smallvec;

use crate::indexer::{SliceIndexer, SliceIndexerMut};
use crate::layout::{Layout, Order};
use crate::walker::{StrideWalker, Walker, WalkerMut};
use crate::{Result, SVec, TraverseError};

/// A data source a traverser can be built from.
///
/// The capability on offer decides the adapter once, at construction: a
/// container with index access becomes a direct indexer under a stride
/// walker; an iterator over a slice contributes its remaining elements the
/// same way. The resulting walker type is concrete and monomorphic for the
/// traversal's lifetime. Sources that already are walkers skip this trait
/// via [`Traverser::from_walker`].
pub trait TraversalSource<'t> {
    /// Walker type this source adapts into.
    type Walker: Walker;

    /// Build the walker against `layout`.
    fn into_walker(self, layout: &'t Layout) -> Self::Walker;
}

impl<'t, 'a, T> TraversalSource<'t> for &'a [T] {
    type Walker = StrideWalker<'t, SliceIndexer<'a, T>>;

    fn into_walker(self, layout: &'t Layout) -> Self::Walker {
        StrideWalker::new(SliceIndexer::new(self), layout)
    }
}

impl<'t, 'a, T> TraversalSource<'t> for &'a mut [T] {
    type Walker = StrideWalker<'t, SliceIndexerMut<'a, T>>;

    fn into_walker(self, layout: &'t Layout) -> Self::Walker {
        StrideWalker::new(SliceIndexerMut::new(self), layout)
    }
}

impl<'t, 'a, T> TraversalSource<'t> for std::slice::Iter<'a, T> {
    type Walker = StrideWalker<'t, SliceIndexer<'a, T>>;

    fn into_walker(self, layout: &'t Layout) -> Self::Walker {
        StrideWalker::new(SliceIndexer::new(self.as_slice()), layout)
    }
}

impl<'t, 'a, T> TraversalSource<'t> for std::slice::IterMut<'a, T> {
    type Walker = StrideWalker<'t, SliceIndexerMut<'a, T>>;

    fn into_walker(self, layout: &'t Layout) -> Self::Walker {
        StrideWalker::new(SliceIndexerMut::new(self.into_slice()), layout)
    }
}

/// Cursor over a layout's coordinate space.
///
/// Has no terminal state: `next`/`prev` returning `false` signals a wrap
/// back to the start (or end), after which the traverser is immediately
/// reusable. The borrowed [`Layout`] must outlive the traverser.
#[derive(Debug, Clone)]
pub struct Traverser<'t, W> {
    layout: &'t Layout,
    walker: W,
    coords: SVec<usize>,
    axis_min: usize,
    axis_max: usize,
    active: SVec<bool>,
}

impl<'t, W: Walker> Traverser<'t, W> {
    /// Build a traverser over `layout` from a data source.
    pub fn new<S>(layout: &'t Layout, source: S) -> Self
    where
        S: TraversalSource<'t, Walker = W>,
    {
        Self::from_walker(layout, source.into_walker(layout))
    }

    /// Build a traverser over `layout` from an existing walker.
    ///
    /// The walker must have been built against `layout` (or a decorator
    /// stack presenting the same rank), positioned at its baseline.
    pub fn from_walker(layout: &'t Layout, walker: W) -> Self {
        let rank = layout.rank();
        Self {
            layout,
            walker,
            coords: smallvec![0; rank],
            axis_min: 0,
            axis_max: rank,
            active: smallvec![true; rank],
        }
    }

    /// Restrict traversal to the axis range `[range.start, range.end)`.
    ///
    /// Axes outside the range keep their coordinate fixed, as for a
    /// partial traversal over non-reduced axes.
    ///
    /// # Errors
    /// Returns [`TraverseError::InvalidAxisRange`] if the range exceeds
    /// the rank or is inverted.
    pub fn restrict(mut self, range: std::ops::Range<usize>) -> Result<Self> {
        let rank = self.layout.rank();
        if range.start > range.end || range.end > rank {
            return Err(TraverseError::InvalidAxisRange {
                start: range.start,
                end: range.end,
                rank,
            });
        }
        self.axis_min = range.start;
        self.axis_max = range.end;
        Ok(self)
    }

    /// Gate participating axes by a predicate, evaluated once per axis.
    ///
    /// Rejected axes are skipped by every traversal operation except
    /// [`Traverser::move_to`]; their coordinate stays fixed.
    pub fn filter_axes(mut self, pred: impl Fn(usize) -> bool) -> Self {
        for axis in 0..self.layout.rank() {
            self.active[axis] = pred(axis);
        }
        self
    }

    /// The layout traversed.
    #[inline]
    pub fn layout(&self) -> &'t Layout {
        self.layout
    }

    /// Current coordinate, one entry per axis.
    #[inline]
    pub fn index(&self) -> &[usize] {
        &self.coords
    }

    /// Current flat cursor position of the underlying walker.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.walker.cursor()
    }

    /// Dereference the current position.
    #[inline]
    pub fn get(&self) -> &W::Elem {
        self.walker.get()
    }

    /// Last valid coordinate on `axis` under the degenerate rule
    /// (size-0 axes traverse like size 1).
    #[inline]
    fn last(&self, axis: usize) -> usize {
        self.layout.shape()[axis].max(1) - 1
    }

    /// Advance one position along `axis`; `false` means the axis wrapped
    /// back to 0 and the carry moves to the next slower axis.
    #[inline]
    fn advance(&mut self, axis: usize) -> bool {
        if !self.active[axis] {
            return false;
        }
        if self.coords[axis] == self.last(axis) {
            self.coords[axis] = 0;
            self.walker.reset_back(axis);
            false
        } else {
            self.coords[axis] += 1;
            self.walker.step(axis);
            true
        }
    }

    /// Retreat one position along `axis`; `false` means the axis wrapped
    /// forward to its end and the borrow moves to the next slower axis.
    #[inline]
    fn retreat(&mut self, axis: usize) -> bool {
        if !self.active[axis] {
            return false;
        }
        if self.coords[axis] == 0 {
            self.coords[axis] = self.last(axis);
            self.walker.reset(axis);
            false
        } else {
            self.coords[axis] -= 1;
            self.walker.step_back(axis);
            true
        }
    }

    /// Move to the next position in the layout's order.
    ///
    /// Returns `false` when every participating axis was exhausted: the
    /// coordinates and cursor are then back at their starting values and
    /// further calls re-traverse.
    pub fn next(&mut self) -> bool {
        // Fastest-varying axis first.
        match self.layout.order() {
            Order::RowMajor => {
                for axis in (self.axis_min..self.axis_max).rev() {
                    if self.advance(axis) {
                        return true;
                    }
                }
            }
            Order::ColumnMajor => {
                for axis in self.axis_min..self.axis_max {
                    if self.advance(axis) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Move to the previous position in the layout's order.
    ///
    /// Returns `false` when every participating axis wrapped past 0; the
    /// traverser then sits at the last position of the space.
    pub fn prev(&mut self) -> bool {
        match self.layout.order() {
            Order::RowMajor => {
                for axis in (self.axis_min..self.axis_max).rev() {
                    if self.retreat(axis) {
                        return true;
                    }
                }
            }
            Order::ColumnMajor => {
                for axis in self.axis_min..self.axis_max {
                    if self.retreat(axis) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Jump every participating axis to coordinate 0, one walk per axis.
    pub fn to_first(&mut self) {
        for axis in self.axis_min..self.axis_max {
            if !self.active[axis] {
                continue;
            }
            let delta = self.coords[axis];
            if delta > 0 {
                self.walker.walk_back(axis, delta);
                self.coords[axis] = 0;
            }
        }
    }

    /// Jump every participating axis to its last coordinate, one walk per
    /// axis.
    pub fn to_last(&mut self) {
        for axis in self.axis_min..self.axis_max {
            if !self.active[axis] {
                continue;
            }
            let last = self.last(axis);
            let delta = last - self.coords[axis];
            if delta > 0 {
                self.walker.walk(axis, delta);
                self.coords[axis] = last;
            }
        }
    }

    /// Random access: position on the flat index `n` of the traversed
    /// space in O(rank).
    ///
    /// Decomposes `n` per axis, most-significant first, by div/mod against
    /// the canonical strides; size-1 axes always come out at coordinate 0
    /// because each one shares its stride with the next more significant
    /// axis. `n` must be in `[0, len - 1]`; bounds are the caller's
    /// responsibility. Addresses the full axis range regardless of any
    /// axis predicate.
    pub fn move_to(&mut self, n: usize) {
        self.to_first();
        let mut rem = n;
        match self.layout.order() {
            Order::RowMajor => {
                for axis in self.axis_min..self.axis_max {
                    rem = self.place(axis, rem);
                }
            }
            Order::ColumnMajor => {
                for axis in (self.axis_min..self.axis_max).rev() {
                    rem = self.place(axis, rem);
                }
            }
        }
    }

    #[inline]
    fn place(&mut self, axis: usize, rem: usize) -> usize {
        let (q, r) = self.layout.divisors()[axis].div_rem(rem);
        if q > 0 {
            self.walker.walk(axis, q);
        }
        self.coords[axis] = q;
        r
    }
}

impl<'t, W: WalkerMut> Traverser<'t, W> {
    /// Mutable dereference of the current position.
    #[inline]
    pub fn get_mut(&mut self) -> &mut W::Elem {
        self.walker.get_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_forward(layout: &Layout, data: &[i32]) -> Vec<i32> {
        let mut t = Traverser::new(layout, data);
        let mut out = vec![*t.get()];
        while t.next() {
            out.push(*t.get());
        }
        out
    }

    #[test]
    fn test_row_major_visits_last_axis_fastest() {
        let layout = Layout::new(vec![2, 3], Order::RowMajor);
        let data: Vec<i32> = (0..6).collect();
        assert_eq!(collect_forward(&layout, &data), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_column_major_visits_first_axis_fastest() {
        let layout = Layout::new(vec![2, 3], Order::ColumnMajor);
        let data: Vec<i32> = (0..6).collect();
        // Strides {1, 2}: flat order walks rows first.
        assert_eq!(collect_forward(&layout, &data), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_next_wraps_and_restores_state() {
        let layout = Layout::new(vec![2, 3], Order::RowMajor);
        let data: Vec<i32> = (0..6).collect();
        let mut t = Traverser::new(&layout, &data[..]);

        for _ in 0..5 {
            assert!(t.next());
        }
        assert_eq!(t.index(), &[1, 2]);
        assert!(!t.next());
        assert_eq!(t.index(), &[0, 0]);
        assert_eq!(t.cursor(), 0);
        // No terminal state: the traverser re-traverses.
        assert!(t.next());
        assert_eq!(*t.get(), 1);
    }

    #[test]
    fn test_wrap_scenario_shape_6() {
        let layout = Layout::new(vec![6], Order::RowMajor);
        let data: Vec<i32> = (0..6).collect();
        let mut t = Traverser::new(&layout, &data[..]);

        let results: Vec<bool> = (0..6).map(|_| t.next()).collect();
        assert_eq!(results, vec![true, true, true, true, true, false]);
        assert_eq!(t.cursor(), 0);
        // An immediate prev() wraps backward and lands on index 5.
        assert!(!t.prev());
        assert_eq!(t.cursor(), 5);
        assert_eq!(t.index(), &[5]);
    }

    #[test]
    fn test_prev_is_inverse_of_next() {
        let layout = Layout::new(vec![3, 4], Order::RowMajor);
        let data: Vec<i32> = (0..12).collect();
        let mut t = Traverser::new(&layout, &data[..]);

        t.move_to(7);
        let (coords, cursor) = (t.index().to_vec(), t.cursor());
        assert!(t.next());
        assert!(t.prev());
        assert_eq!(t.index(), &coords[..]);
        assert_eq!(t.cursor(), cursor);
        assert!(t.prev());
        assert!(t.next());
        assert_eq!(t.index(), &coords[..]);
        assert_eq!(t.cursor(), cursor);
    }

    #[test]
    fn test_to_last_and_to_first() {
        let layout = Layout::new(vec![2, 3, 4], Order::RowMajor);
        let data: Vec<i32> = (0..24).collect();
        let mut t = Traverser::new(&layout, &data[..]);

        t.to_last();
        assert_eq!(t.index(), &[1, 2, 3]);
        assert_eq!(*t.get(), 23);
        t.to_first();
        assert_eq!(t.index(), &[0, 0, 0]);
        assert_eq!(*t.get(), 0);
    }

    #[test]
    fn test_move_to_broadcast_shape() {
        // Shape {2,1,3}: strides {3,3,1}; flat target 5 decomposes to
        // coordinate {1,0,2}, the unit axis staying at 0.
        let layout = Layout::new(vec![2, 1, 3], Order::RowMajor);
        let data: Vec<i32> = (0..6).collect();
        let mut t = Traverser::new(&layout, &data[..]);

        t.move_to(5);
        assert_eq!(t.index(), &[1, 0, 2]);
        assert_eq!(*t.get(), 5);
    }

    #[test]
    fn test_move_to_matches_sequential() {
        let layout = Layout::new(vec![2, 1, 3, 2], Order::RowMajor);
        let data: Vec<i32> = (0..12).collect();
        let total = layout.len();

        for n in 0..total {
            let mut seq = Traverser::new(&layout, &data[..]);
            for _ in 0..n {
                assert!(seq.next());
            }
            let mut jump = Traverser::new(&layout, &data[..]);
            jump.move_to(n);
            assert_eq!(jump.index(), seq.index(), "n={n}");
            assert_eq!(jump.get(), seq.get(), "n={n}");
        }
    }

    #[test]
    fn test_move_to_column_major() {
        let layout = Layout::new(vec![2, 3], Order::ColumnMajor);
        let data: Vec<i32> = (0..6).collect();
        let total = layout.len();

        for n in 0..total {
            let mut seq = Traverser::new(&layout, &data[..]);
            for _ in 0..n {
                assert!(seq.next());
            }
            let mut jump = Traverser::new(&layout, &data[..]);
            jump.move_to(n);
            assert_eq!(jump.cursor(), seq.cursor(), "n={n}");
        }
    }

    #[test]
    fn test_round_trip_full_space() {
        for order in [Order::RowMajor, Order::ColumnMajor] {
            let layout = Layout::new(vec![2, 3, 2], order);
            let data: Vec<i32> = (0..12).collect();
            let mut t = Traverser::new(&layout, &data[..]);
            let total = layout.len();

            for i in 0..total {
                let wrapped = !t.next();
                assert_eq!(wrapped, i == total - 1);
            }
            assert_eq!(t.index(), &[0, 0, 0]);
            assert_eq!(t.cursor(), 0);
        }
    }

    #[test]
    fn test_restricted_axis_range() {
        let layout = Layout::new(vec![2, 3, 4], Order::RowMajor);
        let data: Vec<i32> = (0..24).collect();
        // Traverse only the two fastest axes; axis 0 stays put.
        let mut t = Traverser::new(&layout, &data[..]).restrict(1..3).unwrap();

        let mut count = 1;
        while t.next() {
            count += 1;
            assert_eq!(t.index()[0], 0);
        }
        assert_eq!(count, 12);
    }

    #[test]
    fn test_restrict_rejects_bad_range() {
        let layout = Layout::new(vec![2, 3], Order::RowMajor);
        let data: Vec<i32> = (0..6).collect();
        assert!(matches!(
            Traverser::new(&layout, &data[..]).restrict(1..4),
            Err(TraverseError::InvalidAxisRange { .. })
        ));
    }

    #[test]
    fn test_axis_predicate_fixes_excluded_axis() {
        let layout = Layout::new(vec![2, 3, 4], Order::RowMajor);
        let data: Vec<i32> = (0..24).collect();
        // Exclude axis 1: only 2*4 positions are visited, with axis 1's
        // coordinate unchanged throughout.
        let mut t = Traverser::new(&layout, &data[..]).filter_axes(|axis| axis != 1);
        t.move_to(4); // coordinate {0, 1, 0}

        let mut visited = 1;
        while t.next() {
            visited += 1;
            assert_eq!(t.index()[1], 1);
        }
        assert_eq!(visited, 8);
        // Wrapped back to the start, excluded coordinate still fixed.
        assert_eq!(t.index(), &[0, 1, 0]);
    }

    #[test]
    fn test_mutable_traversal() {
        let layout = Layout::new(vec![2, 3], Order::RowMajor);
        let mut data: Vec<i32> = vec![0; 6];
        let mut t = Traverser::new(&layout, &mut data[..]);

        let mut v = 10;
        loop {
            *t.get_mut() = v;
            v += 10;
            if !t.next() {
                break;
            }
        }
        assert_eq!(data, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_source_from_iterator() {
        let layout = Layout::new(vec![2, 2], Order::RowMajor);
        let data: Vec<i32> = (0..4).collect();
        let t = Traverser::new(&layout, data.iter());
        assert_eq!(*t.get(), 0);
    }

    #[test]
    fn test_rank_zero_traversal() {
        let layout = Layout::new(Vec::<usize>::new(), Order::RowMajor);
        let data = [42];
        let mut t = Traverser::new(&layout, &data[..]);
        assert_eq!(*t.get(), 42);
        assert!(!t.next());
        assert!(!t.prev());
    }
}
