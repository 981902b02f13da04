//! Index-space partitioning for per-worker traversal.
//!
//! Traversal state is single-threaded by design; parallel consumers split
//! the index space into disjoint contiguous pieces and give each worker its
//! own traverser. This module provides the splitting, by flat range or by
//! one axis, and under the `parallel` feature a rayon driver that runs a
//! closure over one independent traverser per chunk. The chunk layouts
//! share nothing mutable; the parent's stride tables are recomputed per
//! chunk and read-only thereafter.

use std::ops::Range;

use crate::layout::Layout;
use crate::{Result, TraverseError};

#[cfg(feature = "parallel")]
use crate::indexer::SliceIndexer;
#[cfg(feature = "parallel")]
use crate::traverse::Traverser;
#[cfg(feature = "parallel")]
use crate::walker::StrideWalker;

/// Split `0..len` into at most `parts` disjoint contiguous ranges.
///
/// Ranges are near-even: the first `len % parts` ranges are one longer.
/// Empty ranges are never emitted, so fewer than `parts` ranges come back
/// when `len < parts`, and none for `len == 0`.
pub fn split_range(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1).min(len);
    let mut out = Vec::with_capacity(parts);
    if len == 0 {
        return out;
    }
    let chunk = len / parts;
    let extra = len % parts;
    let mut start = 0;
    for i in 0..parts {
        let size = chunk + usize::from(i < extra);
        out.push(start..start + size);
        start += size;
    }
    out
}

/// One worker's share of a layout split along an axis.
#[derive(Debug, Clone)]
pub struct AxisChunk {
    /// Layout of the chunk: the parent's strides with the split axis
    /// clamped to the chunk's extent.
    pub layout: Layout,
    /// Flat element offset of the chunk's first position in the parent.
    pub offset: usize,
    /// Coordinate range covered on the split axis.
    pub range: Range<usize>,
}

/// Split a layout into at most `parts` disjoint chunks along `axis`.
///
/// Each chunk keeps the parent's strides, so a walker built over a chunk's
/// layout at the chunk's offset addresses exactly the parent positions
/// whose `axis` coordinate falls in the chunk's range.
///
/// # Errors
/// Returns [`TraverseError::InvalidAxis`] if `axis` is not an axis of the
/// layout.
pub fn split_axis(layout: &Layout, axis: usize, parts: usize) -> Result<Vec<AxisChunk>> {
    let rank = layout.rank();
    if axis >= rank {
        return Err(TraverseError::InvalidAxis { axis, rank });
    }
    let stride = layout.strides()[axis];
    let mut chunks = Vec::new();
    for range in split_range(layout.shape()[axis], parts) {
        let mut shape = layout.shape().to_vec();
        shape[axis] = range.len();
        let chunk_layout = Layout::from_parts(shape, layout.strides().to_vec(), layout.order())?;
        chunks.push(AxisChunk {
            layout: chunk_layout,
            offset: range.start * stride,
            range,
        });
    }
    Ok(chunks)
}

/// Run `f` over one independent traverser per axis chunk on the rayon
/// pool.
///
/// Each worker gets its own walker and coordinate state over the shared
/// read-only `data`; only the immutable stride tables are shared. Workers
/// that want to stop early simply stop consuming their traverser.
#[cfg(feature = "parallel")]
pub fn par_for_each_axis_chunk<T, F>(
    layout: &Layout,
    data: &[T],
    axis: usize,
    parts: usize,
    f: F,
) -> Result<()>
where
    T: Sync,
    F: Fn(&AxisChunk, &mut Traverser<'_, StrideWalker<'_, SliceIndexer<'_, T>>>) + Sync,
{
    use rayon::prelude::*;

    let chunks = split_axis(layout, axis, parts)?;
    chunks.par_iter().for_each(|chunk| {
        let walker = StrideWalker::with_offset(SliceIndexer::new(data), &chunk.layout, chunk.offset);
        let mut traverser = Traverser::from_walker(&chunk.layout, walker);
        f(chunk, &mut traverser);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Order;

    #[test]
    fn test_split_range_even() {
        assert_eq!(split_range(12, 3), vec![0..4, 4..8, 8..12]);
    }

    #[test]
    fn test_split_range_uneven() {
        assert_eq!(split_range(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_split_range_more_parts_than_items() {
        assert_eq!(split_range(2, 5), vec![0..1, 1..2]);
        assert_eq!(split_range(0, 3), Vec::<Range<usize>>::new());
    }

    #[test]
    fn test_split_axis_rejects_bad_axis() {
        let layout = Layout::new(vec![4, 3], Order::RowMajor);
        assert!(matches!(
            split_axis(&layout, 2, 2),
            Err(TraverseError::InvalidAxis { axis: 2, rank: 2 })
        ));
    }

    #[test]
    fn test_split_axis_chunks_are_disjoint_and_cover() {
        let layout = Layout::new(vec![5, 3], Order::RowMajor);
        let chunks = split_axis(&layout, 0, 2).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].range, 0..3);
        assert_eq!(chunks[1].range, 3..5);
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[1].offset, 9);
        assert_eq!(chunks[0].layout.shape(), &[3, 3]);
        assert_eq!(chunks[1].layout.shape(), &[2, 3]);
        // Chunks keep the parent strides.
        assert_eq!(chunks[0].layout.strides(), layout.strides());
        let total: usize = chunks.iter().map(|c| c.layout.len()).sum();
        assert_eq!(total, layout.len());
    }

    #[test]
    fn test_split_axis_empty_layout() {
        let layout = Layout::new(vec![0, 3], Order::RowMajor);
        assert!(split_axis(&layout, 0, 4).unwrap().is_empty());
    }
}
