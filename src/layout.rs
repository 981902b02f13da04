//! Shape-to-flat-storage layout derivation.
//!
//! This module converts a shape plus a memory [`Order`] into the stride
//! tables that drive all traversal: canonical strides, adapted strides
//! (broadcast-aware), reset strides (wrap-around deltas), and a divisor
//! table for flat-index decomposition. The free functions are pure; the
//! [`Layout`] descriptor computes them once at shape-fixing time and is
//! borrowed by every walker and traverser built against that shape.

use crate::divisor::Divisor;
use crate::{Result, TraverseError};

/// Memory order of a flat layout.
///
/// Row-major layouts vary the last axis fastest; column-major layouts vary
/// the first axis fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Last axis is fastest-varying (C convention).
    #[default]
    RowMajor,
    /// First axis is fastest-varying (Fortran convention).
    ColumnMajor,
}

/// Compute canonical strides for a shape in the given order.
///
/// The fastest-varying axis gets stride 1; each more-significant axis's
/// stride equals the next axis's stride times `max(next_axis_size, 1)`.
/// A size-0 axis counts as size 1 in the product, so it never corrupts the
/// strides of more significant axes. Any shape is valid input.
pub fn strides(shape: &[usize], order: Order) -> Vec<usize> {
    let rank = shape.len();
    let mut out = vec![1usize; rank];
    match order {
        Order::RowMajor => {
            for i in (0..rank.saturating_sub(1)).rev() {
                out[i] = out[i + 1] * shape[i + 1].max(1);
            }
        }
        Order::ColumnMajor => {
            for i in 1..rank {
                out[i] = out[i - 1] * shape[i - 1].max(1);
            }
        }
    }
    out
}

/// Zero out the strides of unit axes.
///
/// An axis of size exactly 1 gets stride 0, so stepping it never moves the
/// cursor. This is the broadcast mechanism: a unit axis can stand in for an
/// axis of any size in another operand.
pub fn adapted_strides(shape: &[usize], strides: &[usize]) -> Vec<usize> {
    shape
        .iter()
        .zip(strides)
        .map(|(&size, &stride)| if size == 1 { 0 } else { stride })
        .collect()
}

/// Compute per-axis wrap-around deltas.
///
/// `reset[axis]` is the total displacement accumulated by walking an axis
/// from its first to its last index: `(max(size, 1) - 1) * stride`.
pub fn reset_strides(shape: &[usize], strides: &[usize]) -> Vec<usize> {
    shape
        .iter()
        .zip(strides)
        .map(|(&size, &stride)| (size.max(1) - 1) * stride)
        .collect()
}

/// Build a divisor table over canonical strides.
///
/// Canonical strides are always at least 1, so every entry is a valid
/// divisor.
pub fn divisor_table(strides: &[usize]) -> Vec<Divisor> {
    strides.iter().map(|&s| Divisor::new(s)).collect()
}

/// Immutable layout descriptor for one shape.
///
/// Owns the shape and every derived table. Computed once at construction
/// (or reshape) and shared by reference by all walkers and traversers built
/// against the shape; the descriptor must outlive them. The tables are
/// never mutated by traversal, so a `Layout` is freely shared across
/// threads.
#[derive(Debug, Clone)]
pub struct Layout {
    shape: Vec<usize>,
    order: Order,
    strides: Vec<usize>,
    adapted: Vec<usize>,
    reset: Vec<usize>,
    divisors: Vec<Divisor>,
}

impl Layout {
    /// Build a layout with canonical strides for `order`.
    pub fn new(shape: impl Into<Vec<usize>>, order: Order) -> Self {
        let shape = shape.into();
        let strides = strides(&shape, order);
        Self::from_tables(shape, strides, order)
    }

    /// Build a layout over caller-supplied effective strides.
    ///
    /// Used for views whose strides are not canonical for their visible
    /// shape: permuted axes, strided sub-ranges (stride times step), or a
    /// window into a larger parent.
    ///
    /// # Errors
    /// Returns [`TraverseError::StrideLengthMismatch`] if `strides` and
    /// `shape` have different lengths.
    pub fn from_parts(
        shape: impl Into<Vec<usize>>,
        strides: impl Into<Vec<usize>>,
        order: Order,
    ) -> Result<Self> {
        let shape = shape.into();
        let strides = strides.into();
        if shape.len() != strides.len() {
            return Err(TraverseError::StrideLengthMismatch);
        }
        Ok(Self::from_tables(shape, strides, order))
    }

    fn from_tables(shape: Vec<usize>, strides: Vec<usize>, order: Order) -> Self {
        let adapted = adapted_strides(&shape, &strides);
        let reset = reset_strides(&shape, &strides);
        // Decomposition always works in the shape's canonical coordinate
        // space, even when the effective strides are scaled or permuted.
        let divisors = divisor_table(&self::strides(&shape, order));
        Self {
            shape,
            order,
            strides,
            adapted,
            reset,
            divisors,
        }
    }

    /// The shape this layout was derived from.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The memory order.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of addressable positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// True if any axis has size 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Canonical (or caller-supplied) strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Strides with unit axes zeroed.
    #[inline]
    pub fn adapted_strides(&self) -> &[usize] {
        &self.adapted
    }

    /// Per-axis wrap-around deltas.
    #[inline]
    pub fn reset_strides(&self) -> &[usize] {
        &self.reset
    }

    /// Divisor table over the canonical strides of the shape.
    ///
    /// Flat-index decomposition addresses the visible coordinate space,
    /// so the table is canonical even when [`Layout::from_parts`] supplied
    /// scaled or permuted effective strides.
    #[inline]
    pub fn divisors(&self) -> &[Divisor] {
        &self.divisors
    }
}
