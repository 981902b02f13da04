//! Strided traversal engine for multidimensional arrays.
//!
//! This crate is the index-arithmetic layer underneath an N-dimensional
//! array library: it converts a logical shape plus a memory [`Order`] into
//! flat-storage accesses, and lets callers walk that space forward,
//! backward, or by random jump without redoing multi-axis arithmetic on
//! every step. Single steps are O(1); random access and extreme jumps are
//! O(rank).
//!
//! # Core Types
//!
//! - [`Layout`]: shape + order descriptor owning the derived stride
//!   tables (canonical, broadcast-adapted, wrap-around) and the divisor
//!   table; computed once, borrowed by everything else
//! - [`Indexer`] family ([`SliceIndexer`], [`ChainedIndexer`],
//!   [`ConvertIndexer`], [`OrderRemap`]): flat-index-to-element adapters
//! - [`Walker`] / [`StrideWalker`]: the multi-axis cursor with per-axis
//!   step/walk/reset movement
//! - Walker decorators ([`OffsetWalker`], [`AxisMapWalker`],
//!   [`ScaleWalker`], [`BroadcastWalker`], [`RankPadWalker`]): stackable
//!   reinterpretations of axis operations for views and broadcasting
//! - [`Traverser`]: forward, bidirectional, and random-access traversal
//!   over a full or restricted axis range
//! - [`WalkerIndexer`]: flat random access over an existing walker
//! - [`partition`]: disjoint index-space splitting for per-worker
//!   traversal
//!
//! # Example
//!
//! ```rust
//! use strided_traverse::{Layout, Order, Traverser};
//!
//! let data: Vec<f64> = (0..6).map(f64::from).collect();
//! let layout = Layout::new(vec![2, 3], Order::RowMajor);
//!
//! // Walk the whole space in layout order.
//! let mut t = Traverser::new(&layout, &data[..]);
//! let mut sum = *t.get();
//! while t.next() {
//!     sum += *t.get();
//! }
//! assert_eq!(sum, 15.0);
//!
//! // Random-access positions in O(rank).
//! t.move_to(4);
//! assert_eq!(t.index(), &[1, 1]);
//! assert_eq!(*t.get(), 4.0);
//! ```
//!
//! # Broadcasting Example
//!
//! ```rust
//! use strided_traverse::{Layout, Order, Traverser};
//!
//! // A [1, 3] operand traversed against a broadcast [4, 3] shape: the
//! // unit axis has adapted stride 0, so the row repeats.
//! let row = vec![10, 20, 30];
//! let layout = Layout::from_parts(vec![4, 3], vec![0, 1], Order::RowMajor).unwrap();
//! let mut t = Traverser::new(&layout, &row[..]);
//! let mut seen = vec![*t.get()];
//! while t.next() {
//!     seen.push(*t.get());
//! }
//! assert_eq!(seen.len(), 12);
//! assert_eq!(&seen[..3], &seen[3..6]);
//! ```
//!
//! # Sharing and Lifetimes
//!
//! A [`Layout`] is immutable after construction and must outlive every
//! walker and traverser borrowing its tables. Traversal state (cursor,
//! coordinates) is single-threaded; parallel callers split the space with
//! [`partition`] and build one traverser per worker over the shared
//! read-only tables.

mod adapt;
mod divisor;
mod flat;
mod indexer;
mod layout;
pub mod partition;
mod traverse;
mod walker;

use smallvec::SmallVec;

/// Inline-capacity vector for per-axis state; spills past rank 8.
pub(crate) type SVec<T> = SmallVec<[T; 8]>;

// ============================================================================
// Layout calculation
// ============================================================================
pub use divisor::Divisor;
pub use layout::{adapted_strides, divisor_table, reset_strides, strides, Layout, Order};

// ============================================================================
// Indexers
// ============================================================================
pub use indexer::{
    ChainedIndexer, ConvertIndexer, Indexer, IndexerMut, OrderRemap, SliceIndexer, SliceIndexerMut,
};

// ============================================================================
// Walkers and decorators
// ============================================================================
pub use adapt::{AxisMapWalker, BroadcastWalker, OffsetWalker, RankPadWalker, ScaleWalker};
pub use walker::{StrideWalker, Walker, WalkerMut};

// ============================================================================
// Traversal
// ============================================================================
pub use flat::WalkerIndexer;
pub use traverse::{TraversalSource, Traverser};

// ============================================================================
// Error types
// ============================================================================

/// Errors raised at construction boundaries.
///
/// Traversal itself never fails: once a walker or traverser is built, its
/// operations are total under the documented preconditions, and the
/// `false` returned by `next`/`prev` is a wrap signal, not an error.
#[derive(Debug, thiserror::Error)]
pub enum TraverseError {
    /// Two per-axis sequences have different lengths.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Two layouts describe different shapes.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Stride table length doesn't match the shape.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    /// Axis index outside the layout's rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Axis range outside the layout's rank, or inverted.
    #[error("invalid axis range {start}..{end} for rank {rank}")]
    InvalidAxisRange {
        start: usize,
        end: usize,
        rank: usize,
    },

    /// Axis map entry that is not an axis of the wrapped walker.
    #[error("axis map entry {axis} out of bounds for rank {rank}")]
    AxisMapOutOfBounds { axis: usize, rank: usize },
}

/// Result type for construction-time operations.
pub type Result<T> = std::result::Result<T, TraverseError>;
