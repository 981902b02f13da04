//! Walker decorators.
//!
//! Each decorator owns the walker it wraps plus one parameter, and
//! reinterprets incoming axis arguments before delegating: materializing a
//! start offset, remapping logical to physical axes, scaling step counts,
//! suppressing movement on broadcast axes, or aligning a lower-rank operand
//! to a broadcasted higher rank. Dereference, cursor, rewind, and
//! `update_offset` always pass through unchanged, so decorators stack in
//! any order.

use smallvec::SmallVec;

use crate::walker::{Walker, WalkerMut};
use crate::{Result, SVec, TraverseError};

/// Walker whose baseline is a multi-axis starting coordinate.
///
/// At construction the per-axis offset vector is applied via `walk` and the
/// baseline is updated, so a later [`Walker::rewind`] returns to the offset
/// position rather than to the wrapped walker's origin. After construction
/// every operation delegates unchanged.
#[derive(Debug, Clone)]
pub struct OffsetWalker<W> {
    inner: W,
}

impl<W: Walker> OffsetWalker<W> {
    /// Walk `inner` to the coordinate given by `offsets` and make that the
    /// baseline.
    ///
    /// # Errors
    /// Returns [`TraverseError::RankMismatch`] if `offsets` has a different
    /// length than the wrapped walker's `dim()`.
    pub fn new(mut inner: W, offsets: &[usize]) -> Result<Self> {
        if offsets.len() != inner.dim() {
            return Err(TraverseError::RankMismatch(offsets.len(), inner.dim()));
        }
        for (axis, &n) in offsets.iter().enumerate() {
            if n > 0 {
                inner.walk(axis, n);
            }
        }
        inner.update_offset();
        Ok(Self { inner })
    }
}

impl<W: Walker> Walker for OffsetWalker<W> {
    type Elem = W::Elem;

    #[inline]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[inline]
    fn step(&mut self, axis: usize) {
        self.inner.step(axis);
    }

    #[inline]
    fn step_back(&mut self, axis: usize) {
        self.inner.step_back(axis);
    }

    #[inline]
    fn walk(&mut self, axis: usize, n: usize) {
        self.inner.walk(axis, n);
    }

    #[inline]
    fn walk_back(&mut self, axis: usize, n: usize) {
        self.inner.walk_back(axis, n);
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        self.inner.reset(axis);
    }

    #[inline]
    fn reset_back(&mut self, axis: usize) {
        self.inner.reset_back(axis);
    }

    #[inline]
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    #[inline]
    fn update_offset(&mut self) {
        self.inner.update_offset();
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    #[inline]
    fn get(&self) -> &W::Elem {
        self.inner.get()
    }
}

impl<W: WalkerMut> WalkerMut for OffsetWalker<W> {
    #[inline]
    fn get_mut(&mut self) -> &mut W::Elem {
        self.inner.get_mut()
    }
}

/// Walker rewriting logical axes to physical axes through an axis map.
///
/// `map[logical] = physical`; the map's length is the decorated walker's
/// rank. Used for transposed, permuted, and axis-selected views where a
/// view axis corresponds to a different parent axis. The map need not be
/// surjective: parent axes absent from the map are simply never moved.
#[derive(Debug, Clone)]
pub struct AxisMapWalker<W> {
    inner: W,
    map: SVec<usize>,
}

impl<W: Walker> AxisMapWalker<W> {
    /// Wrap `inner` with an axis map.
    ///
    /// # Errors
    /// Returns [`TraverseError::AxisMapOutOfBounds`] if any map entry is
    /// not a valid axis of the wrapped walker.
    pub fn new(inner: W, map: &[usize]) -> Result<Self> {
        let rank = inner.dim();
        if let Some(&bad) = map.iter().find(|&&axis| axis >= rank) {
            return Err(TraverseError::AxisMapOutOfBounds { axis: bad, rank });
        }
        Ok(Self {
            inner,
            map: SmallVec::from_slice(map),
        })
    }
}

impl<W: Walker> Walker for AxisMapWalker<W> {
    type Elem = W::Elem;

    #[inline]
    fn dim(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn step(&mut self, axis: usize) {
        self.inner.step(self.map[axis]);
    }

    #[inline]
    fn step_back(&mut self, axis: usize) {
        self.inner.step_back(self.map[axis]);
    }

    #[inline]
    fn walk(&mut self, axis: usize, n: usize) {
        self.inner.walk(self.map[axis], n);
    }

    #[inline]
    fn walk_back(&mut self, axis: usize, n: usize) {
        self.inner.walk_back(self.map[axis], n);
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        self.inner.reset(self.map[axis]);
    }

    #[inline]
    fn reset_back(&mut self, axis: usize) {
        self.inner.reset_back(self.map[axis]);
    }

    #[inline]
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    #[inline]
    fn update_offset(&mut self) {
        self.inner.update_offset();
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    #[inline]
    fn get(&self) -> &W::Elem {
        self.inner.get()
    }
}

impl<W: WalkerMut> WalkerMut for AxisMapWalker<W> {
    #[inline]
    fn get_mut(&mut self) -> &mut W::Elem {
        self.inner.get_mut()
    }
}

/// Walker multiplying step counts by per-axis scale factors.
///
/// Single steps become scaled walks; walks multiply their count by the
/// axis's factor. The `reset` family delegates unchanged, so an axis with a
/// non-unit factor pairs with stride tables built for the scaled view
/// (`Layout::from_parts`) whenever full wrap-around traversal is required;
/// walk-driven movement (`to_first`/`to_last`/`move_to`) composes directly.
#[derive(Debug, Clone)]
pub struct ScaleWalker<W> {
    inner: W,
    scale: SVec<usize>,
}

impl<W: Walker> ScaleWalker<W> {
    /// Wrap `inner` with per-axis step scale factors.
    ///
    /// # Errors
    /// Returns [`TraverseError::RankMismatch`] if `scale` has a different
    /// length than the wrapped walker's `dim()`.
    pub fn new(inner: W, scale: &[usize]) -> Result<Self> {
        if scale.len() != inner.dim() {
            return Err(TraverseError::RankMismatch(scale.len(), inner.dim()));
        }
        Ok(Self {
            inner,
            scale: SmallVec::from_slice(scale),
        })
    }
}

impl<W: Walker> Walker for ScaleWalker<W> {
    type Elem = W::Elem;

    #[inline]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[inline]
    fn step(&mut self, axis: usize) {
        self.inner.walk(axis, self.scale[axis]);
    }

    #[inline]
    fn step_back(&mut self, axis: usize) {
        self.inner.walk_back(axis, self.scale[axis]);
    }

    #[inline]
    fn walk(&mut self, axis: usize, n: usize) {
        self.inner.walk(axis, n * self.scale[axis]);
    }

    #[inline]
    fn walk_back(&mut self, axis: usize, n: usize) {
        self.inner.walk_back(axis, n * self.scale[axis]);
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        self.inner.reset(axis);
    }

    #[inline]
    fn reset_back(&mut self, axis: usize) {
        self.inner.reset_back(axis);
    }

    #[inline]
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    #[inline]
    fn update_offset(&mut self) {
        self.inner.update_offset();
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    #[inline]
    fn get(&self) -> &W::Elem {
        self.inner.get()
    }
}

impl<W: WalkerMut> WalkerMut for ScaleWalker<W> {
    #[inline]
    fn get_mut(&mut self) -> &mut W::Elem {
        self.inner.get_mut()
    }
}

/// Walker ignoring every operation on axes of visible size at most 1.
///
/// A broadcast operand whose own extent on an axis is 1 (or 0) must not
/// move along that axis no matter what coordinate the traverser reports.
/// This suppresses movement for walkers built over canonical (unadapted)
/// tables, e.g. when reusing an existing walker as a broadcast operand.
#[derive(Debug, Clone)]
pub struct BroadcastWalker<W> {
    inner: W,
    sizes: SVec<usize>,
}

impl<W: Walker> BroadcastWalker<W> {
    /// Wrap `inner` with the operand's own per-axis visible sizes.
    ///
    /// # Errors
    /// Returns [`TraverseError::RankMismatch`] if `sizes` has a different
    /// length than the wrapped walker's `dim()`.
    pub fn new(inner: W, sizes: &[usize]) -> Result<Self> {
        if sizes.len() != inner.dim() {
            return Err(TraverseError::RankMismatch(sizes.len(), inner.dim()));
        }
        Ok(Self {
            inner,
            sizes: SmallVec::from_slice(sizes),
        })
    }

    #[inline]
    fn moves(&self, axis: usize) -> bool {
        self.sizes[axis] > 1
    }
}

impl<W: Walker> Walker for BroadcastWalker<W> {
    type Elem = W::Elem;

    #[inline]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[inline]
    fn step(&mut self, axis: usize) {
        if self.moves(axis) {
            self.inner.step(axis);
        }
    }

    #[inline]
    fn step_back(&mut self, axis: usize) {
        if self.moves(axis) {
            self.inner.step_back(axis);
        }
    }

    #[inline]
    fn walk(&mut self, axis: usize, n: usize) {
        if self.moves(axis) {
            self.inner.walk(axis, n);
        }
    }

    #[inline]
    fn walk_back(&mut self, axis: usize, n: usize) {
        if self.moves(axis) {
            self.inner.walk_back(axis, n);
        }
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        if self.moves(axis) {
            self.inner.reset(axis);
        }
    }

    #[inline]
    fn reset_back(&mut self, axis: usize) {
        if self.moves(axis) {
            self.inner.reset_back(axis);
        }
    }

    #[inline]
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    #[inline]
    fn update_offset(&mut self) {
        self.inner.update_offset();
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    #[inline]
    fn get(&self) -> &W::Elem {
        self.inner.get()
    }
}

impl<W: WalkerMut> WalkerMut for BroadcastWalker<W> {
    #[inline]
    fn get_mut(&mut self) -> &mut W::Elem {
        self.inner.get_mut()
    }
}

/// Walker aligning a lower-rank operand to a broadcasted higher rank.
///
/// Presents `max_rank` axes; the leading `max_rank - inner.dim()` axes do
/// not exist in the wrapped operand and are ignored, while the remaining
/// axes have the fixed offset subtracted before delegating. This pads the
/// operand on the most-significant side without materializing extra axes.
#[derive(Debug, Clone)]
pub struct RankPadWalker<W> {
    inner: W,
    max_rank: usize,
    pad: usize,
}

impl<W: Walker> RankPadWalker<W> {
    /// Present `inner` as a walker of rank `max_rank`.
    ///
    /// # Errors
    /// Returns [`TraverseError::RankMismatch`] if `max_rank` is smaller
    /// than the wrapped walker's `dim()`.
    pub fn new(inner: W, max_rank: usize) -> Result<Self> {
        let dim = inner.dim();
        if max_rank < dim {
            return Err(TraverseError::RankMismatch(max_rank, dim));
        }
        Ok(Self {
            inner,
            max_rank,
            pad: max_rank - dim,
        })
    }
}

impl<W: Walker> Walker for RankPadWalker<W> {
    type Elem = W::Elem;

    #[inline]
    fn dim(&self) -> usize {
        self.max_rank
    }

    #[inline]
    fn step(&mut self, axis: usize) {
        if axis >= self.pad {
            self.inner.step(axis - self.pad);
        }
    }

    #[inline]
    fn step_back(&mut self, axis: usize) {
        if axis >= self.pad {
            self.inner.step_back(axis - self.pad);
        }
    }

    #[inline]
    fn walk(&mut self, axis: usize, n: usize) {
        if axis >= self.pad {
            self.inner.walk(axis - self.pad, n);
        }
    }

    #[inline]
    fn walk_back(&mut self, axis: usize, n: usize) {
        if axis >= self.pad {
            self.inner.walk_back(axis - self.pad, n);
        }
    }

    #[inline]
    fn reset(&mut self, axis: usize) {
        if axis >= self.pad {
            self.inner.reset(axis - self.pad);
        }
    }

    #[inline]
    fn reset_back(&mut self, axis: usize) {
        if axis >= self.pad {
            self.inner.reset_back(axis - self.pad);
        }
    }

    #[inline]
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    #[inline]
    fn update_offset(&mut self) {
        self.inner.update_offset();
    }

    #[inline]
    fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    #[inline]
    fn get(&self) -> &W::Elem {
        self.inner.get()
    }
}

impl<W: WalkerMut> WalkerMut for RankPadWalker<W> {
    #[inline]
    fn get_mut(&mut self) -> &mut W::Elem {
        self.inner.get_mut()
    }
}
