//! Core type aliases for ReaRSo tensors.

use smallvec::SmallVec;

/// Type alias for a tensor axis index.
///
/// Zero-indexed (0 is the first, slowest-varying axis).
pub type Axis = usize;

/// Type alias for tensor rank (number of dimensions).
pub type Rank = usize;

/// Shape type using SmallVec to avoid heap allocation for common cases.
///
/// Optimized for tensors with up to 6 dimensions; falls back to heap
/// allocation for higher-rank tensors.
///
/// # Examples
///
/// ```
/// use rearrso_core::Shape;
///
/// let shape: Shape = [2, 3, 4].iter().copied().collect();
/// assert_eq!(&shape[..], &[2, 3, 4]);
/// ```
pub type Shape = SmallVec<[usize; 6]>;
