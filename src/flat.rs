//! Flat-index random access over a walker.
//!
//! The inverse adapter to a traverser: where a traverser turns flat order
//! into per-axis movement, a [`WalkerIndexer`] accepts a flat index,
//! decomposes it against the layout's divisor table, and issues one walk
//! per axis. Used to bridge a walker-capable source into a flat-access
//! contract, e.g. between two views that disagree on traversal order.

use crate::layout::{Layout, Order};
use crate::walker::{Walker, WalkerMut};

/// Flat-index access over a walker, O(rank) per lookup.
///
/// The divisor table comes from the layout the walker was built against,
/// i.e. the walker's own unscaled canonical strides. `at` takes `&mut
/// self` because every lookup moves the walker; it honors the same
/// flat-access contract as an indexer's `at`.
#[derive(Debug, Clone)]
pub struct WalkerIndexer<'t, W> {
    walker: W,
    layout: &'t Layout,
}

impl<'t, W: Walker> WalkerIndexer<'t, W> {
    /// Wrap a walker and the layout it was built against.
    pub fn new(walker: W, layout: &'t Layout) -> Self {
        Self { walker, layout }
    }

    /// Position the walker on flat index `i`.
    fn seek(&mut self, i: usize) {
        self.walker.rewind();
        let divisors = self.layout.divisors();
        let mut rem = i;
        // Most-significant axis first.
        match self.layout.order() {
            Order::RowMajor => {
                for axis in 0..self.layout.rank() {
                    let (q, r) = divisors[axis].div_rem(rem);
                    if q > 0 {
                        self.walker.walk(axis, q);
                    }
                    rem = r;
                }
            }
            Order::ColumnMajor => {
                for axis in (0..self.layout.rank()).rev() {
                    let (q, r) = divisors[axis].div_rem(rem);
                    if q > 0 {
                        self.walker.walk(axis, q);
                    }
                    rem = r;
                }
            }
        }
    }

    /// Element at flat index `i`. `i` must be in `[0, layout.len())`.
    pub fn at(&mut self, i: usize) -> &W::Elem {
        self.seek(i);
        self.walker.get()
    }
}

impl<W: WalkerMut> WalkerIndexer<'_, W> {
    /// Mutable element at flat index `i`.
    pub fn at_mut(&mut self, i: usize) -> &mut W::Elem {
        self.seek(i);
        self.walker.get_mut()
    }
}
