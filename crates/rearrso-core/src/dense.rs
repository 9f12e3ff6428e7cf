//! Dense tensor implementation with views and strides
//!
//! This module provides the core `DenseND<T>` type for dense N-dimensional
//! tensor storage, along with the shape primitives the rearrangement
//! executor binds to.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`. Direct use of
//! `ndarray`, `rand`, or `num_traits` is forbidden.

use scirs2_core::ndarray_ext::{Array, ArrayView, ArrayViewMut, IxDyn};
use scirs2_core::numeric::Num;
use std::fmt;

/// Dense N-dimensional tensor backed by scirs2_core's ndarray
///
/// # Type Parameters
///
/// * `T` - The element type (typically `f32` or `f64`)
///
/// # Memory Layout
///
/// By default, tensors use C-contiguous (row-major) memory layout.
///
/// # Examples
///
/// ```
/// use rearrso_core::dense::DenseND;
///
/// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.rank(), 3);
/// ```
#[derive(Clone)]
pub struct DenseND<T> {
    /// Underlying ndarray storage (via scirs2_core)
    pub(crate) data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Create a tensor from an existing ndarray
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::Array;
    /// use rearrso_core::dense::DenseND;
    ///
    /// let arr = Array::<f64, _>::zeros(vec![2, 3]);
    /// let tensor = DenseND::from_array(arr);
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// ```
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from a vector with given shape
    ///
    /// # Arguments
    ///
    /// * `vec` - Flattened data in row-major order
    /// * `shape` - Target shape
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::dense::DenseND;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let tensor = DenseND::from_vec(data, &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "Shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            );
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)?;
        Ok(Self { data: array })
    }

    /// Create a tensor filled with a specific value
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// Create a tensor of zeros
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::dense::DenseND;
    ///
    /// let tensor = DenseND::<f32>::zeros(&[2, 3]);
    /// assert_eq!(tensor[&[1, 2]], 0.0);
    /// ```
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_elem(shape, T::zero())
    }

    /// Create a tensor of ones
    pub fn ones(shape: &[usize]) -> Self {
        Self::from_elem(shape, T::one())
    }

    /// Get the rank (number of dimensions) of this tensor
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// Get the shape of this tensor
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Get the total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor is empty (has zero elements)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the tensor is contiguous in memory.
    ///
    /// Contiguous tensors can be reshaped without copying.
    pub fn is_contiguous(&self) -> bool {
        self.data.is_standard_layout()
    }

    /// Get a copy of the shape as a vector.
    pub fn shape_vec(&self) -> Vec<usize> {
        self.shape().to_vec()
    }

    /// Get an immutable reference to the underlying ndarray
    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    /// Get a mutable reference to the underlying ndarray
    pub fn as_array_mut(&mut self) -> &mut Array<T, IxDyn> {
        &mut self.data
    }

    /// Get an immutable view of the tensor
    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Get a mutable view of the tensor
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, IxDyn> {
        self.data.view_mut()
    }

    /// Get an element at the specified index without panicking.
    ///
    /// Returns `None` if the index is out of bounds or has incorrect
    /// dimensionality.
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_elem(&[3, 4], 5.0);
    /// assert_eq!(tensor.get(&[2, 3]), Some(&5.0));
    /// assert_eq!(tensor.get(&[10, 10]), None);
    /// assert_eq!(tensor.get(&[0]), None);
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() {
            return None;
        }
        for (i, &idx) in index.iter().enumerate() {
            if idx >= self.shape()[i] {
                return None;
            }
        }
        Some(&self.data[IxDyn(index)])
    }

    /// Get a mutable reference to an element without panicking.
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        if index.len() != self.rank() {
            return None;
        }
        let shape = self.shape().to_vec();
        for (i, &idx) in index.iter().enumerate() {
            if idx >= shape[i] {
                return None;
            }
        }
        Some(&mut self.data[IxDyn(index)])
    }
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Reshape the tensor to a new shape
    ///
    /// This operation is zero-copy when the tensor is contiguous. Element
    /// iteration order (row-major) is preserved.
    ///
    /// # Arguments
    ///
    /// * `new_shape` - The target shape
    ///
    /// # Returns
    ///
    /// A reshaped tensor, or an error if the total size doesn't match
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::dense::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let reshaped = tensor.reshape(&[6, 4]).unwrap();
    /// assert_eq!(reshaped.shape(), &[6, 4]);
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> anyhow::Result<Self> {
        let new_size: usize = new_shape.iter().product();
        let old_size = self.len();

        if new_size != old_size {
            anyhow::bail!(
                "Cannot reshape tensor of size {} into shape {:?} (size {})",
                old_size,
                new_shape,
                new_size
            );
        }

        // Try zero-copy reshape first
        if let Ok(reshaped) = self.data.view().into_shape_with_order(IxDyn(new_shape)) {
            Ok(Self {
                data: reshaped.to_owned(),
            })
        } else {
            // Fall back to copy if not contiguous
            let flat: Vec<T> = self.data.iter().cloned().collect();
            Ok(Self {
                data: Array::from_shape_vec(IxDyn(new_shape), flat)?,
            })
        }
    }

    /// Split one axis into several whose product equals the original size
    ///
    /// Replaces the dimension at `axis` with the dimensions in `sizes`,
    /// preserving element iteration order: the first listed size is the
    /// slowest-varying of the new axes.
    ///
    /// # Arguments
    ///
    /// * `axis` - The axis to split (0-indexed)
    /// * `sizes` - The sizes replacing that axis
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::dense::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[12, 10]);
    /// let split = tensor.split_axis(0, &[3, 4]).unwrap();
    /// assert_eq!(split.shape(), &[3, 4, 10]);
    /// ```
    pub fn split_axis(&self, axis: usize, sizes: &[usize]) -> anyhow::Result<Self> {
        if axis >= self.rank() {
            anyhow::bail!(
                "Axis {} out of bounds for tensor with rank {}",
                axis,
                self.rank()
            );
        }

        let dim = self.shape()[axis];
        let product: usize = sizes.iter().product();
        if product != dim {
            anyhow::bail!(
                "Cannot split axis {} of size {} into sizes {:?} (product {})",
                axis,
                dim,
                sizes,
                product
            );
        }

        let mut new_shape = Vec::with_capacity(self.rank() + sizes.len() - 1);
        new_shape.extend_from_slice(&self.shape()[..axis]);
        new_shape.extend_from_slice(sizes);
        new_shape.extend_from_slice(&self.shape()[axis + 1..]);
        self.reshape(&new_shape)
    }

    /// Permute the axes of the tensor
    ///
    /// Pure metadata operation: strides are reordered, elements are not
    /// copied eagerly.
    ///
    /// # Arguments
    ///
    /// * `axes` - The new axis ordering (a 0-indexed permutation vector)
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::dense::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let permuted = tensor.permute(&[2, 0, 1]).unwrap();
    /// assert_eq!(permuted.shape(), &[4, 2, 3]);
    /// ```
    pub fn permute(&self, axes: &[usize]) -> anyhow::Result<Self> {
        if axes.len() != self.rank() {
            anyhow::bail!(
                "Permutation axes length ({}) must match tensor rank ({})",
                axes.len(),
                self.rank()
            );
        }

        // Validate that axes is a valid permutation
        let mut sorted = axes.to_vec();
        sorted.sort_unstable();
        for (i, &ax) in sorted.iter().enumerate() {
            if ax != i {
                anyhow::bail!("Invalid permutation: {:?}", axes);
            }
        }

        Ok(Self {
            data: self.data.clone().permuted_axes(IxDyn(axes)),
        })
    }

    /// Broadcast this tensor to a target shape
    ///
    /// Any dimension of size 1 may be expanded to the requested size by
    /// repetition. Fails if a non-1 dimension's target size differs from
    /// its current size.
    ///
    /// # Arguments
    ///
    /// * `target_shape` - The shape to broadcast to
    ///
    /// # Examples
    ///
    /// ```
    /// use rearrso_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::ones(&[3, 1]);
    /// let broadcast = tensor.broadcast_to(&[3, 4]).unwrap();
    /// assert_eq!(broadcast.shape(), &[3, 4]);
    /// ```
    pub fn broadcast_to(&self, target_shape: &[usize]) -> anyhow::Result<Self> {
        let self_shape = self.shape();

        if !shapes_broadcastable(self_shape, target_shape) {
            anyhow::bail!(
                "Shapes {:?} and {:?} are not broadcastable",
                self_shape,
                target_shape
            );
        }

        if self_shape == target_shape {
            return Ok(self.clone());
        }

        let view = self.data.broadcast(IxDyn(target_shape)).ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot broadcast shape {:?} to {:?}",
                self_shape,
                target_shape
            )
        })?;

        Ok(Self {
            data: view.to_owned(),
        })
    }
}

// Dimensions are compatible, right to left, if equal or one of them is 1;
// missing dimensions are treated as 1.
fn shapes_broadcastable(shape1: &[usize], shape2: &[usize]) -> bool {
    let len1 = shape1.len();
    let len2 = shape2.len();
    let max_len = len1.max(len2);

    for i in 0..max_len {
        let dim1 = if i < len1 { shape1[len1 - 1 - i] } else { 1 };
        let dim2 = if i < len2 { shape2[len2 - 1 - i] } else { 1 };

        if dim1 != dim2 && dim1 != 1 && dim2 != 1 {
            return false;
        }
    }
    true
}

impl<T> std::ops::Index<&[usize]> for DenseND<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &Self::Output {
        &self.data[IxDyn(index)]
    }
}

impl<T> std::ops::IndexMut<&[usize]> for DenseND<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut Self::Output {
        &mut self.data[IxDyn(index)]
    }
}

impl<T: fmt::Debug> fmt::Debug for DenseND<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseND")
            .field("shape", &self.data.shape())
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_zeros() {
        let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
        assert_eq!(tensor.shape(), &[2, 3, 4]);
        assert_eq!(tensor.rank(), 3);
        assert_eq!(tensor.len(), 24);
        assert_eq!(tensor[&[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_create_ones() {
        let tensor = DenseND::<f64>::ones(&[2, 3]);
        assert_eq!(tensor[&[0, 0]], 1.0);
        assert_eq!(tensor[&[1, 2]], 1.0);
    }

    #[test]
    fn test_from_vec() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tensor = DenseND::from_vec(data, &[2, 3]).unwrap();
        assert_eq!(tensor.shape(), &[2, 3]);
        assert_eq!(tensor[&[0, 0]], 1.0);
        assert_eq!(tensor[&[1, 2]], 6.0);
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let result = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reshape() {
        let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
        let reshaped = tensor.reshape(&[6, 4]).unwrap();
        assert_eq!(reshaped.shape(), &[6, 4]);
        assert_eq!(reshaped.len(), 24);
    }

    #[test]
    fn test_reshape_preserves_order() {
        let tensor = DenseND::from_vec((1..=6).map(|x| x as f64).collect(), &[2, 3]).unwrap();
        let reshaped = tensor.reshape(&[3, 2]).unwrap();
        assert_eq!(reshaped[&[0, 0]], 1.0);
        assert_eq!(reshaped[&[0, 1]], 2.0);
        assert_eq!(reshaped[&[2, 1]], 6.0);
    }

    #[test]
    fn test_reshape_invalid_size() {
        let tensor = DenseND::<f64>::zeros(&[2, 3]);
        assert!(tensor.reshape(&[7]).is_err());
    }

    #[test]
    fn test_split_axis() {
        let tensor = DenseND::<f64>::zeros(&[12, 10]);
        let split = tensor.split_axis(0, &[3, 4]).unwrap();
        assert_eq!(split.shape(), &[3, 4, 10]);
    }

    #[test]
    fn test_split_axis_order() {
        // Splitting [6] into [2, 3]: first target axis is slowest-varying
        let tensor = DenseND::from_vec((0..6).map(|x| x as f64).collect(), &[6]).unwrap();
        let split = tensor.split_axis(0, &[2, 3]).unwrap();
        assert_eq!(split[&[0, 2]], 2.0);
        assert_eq!(split[&[1, 0]], 3.0);
    }

    #[test]
    fn test_split_axis_invalid() {
        let tensor = DenseND::<f64>::zeros(&[12, 10]);
        assert!(tensor.split_axis(0, &[5, 3]).is_err());
        assert!(tensor.split_axis(2, &[1]).is_err());
    }

    #[test]
    fn test_permute() {
        let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
        let permuted = tensor.permute(&[2, 0, 1]).unwrap();
        assert_eq!(permuted.shape(), &[4, 2, 3]);
    }

    #[test]
    fn test_permute_transpose_values() {
        let tensor = DenseND::from_vec((1..=6).map(|x| x as f64).collect(), &[2, 3]).unwrap();
        let transposed = tensor.permute(&[1, 0]).unwrap();
        assert_eq!(transposed.shape(), &[3, 2]);
        assert_eq!(transposed[&[0, 1]], 4.0);
        assert_eq!(transposed[&[2, 0]], 3.0);
    }

    #[test]
    fn test_permute_invalid() {
        let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
        assert!(tensor.permute(&[0, 1]).is_err());
        assert!(tensor.permute(&[0, 0, 1]).is_err());
    }

    #[test]
    fn test_broadcast_to() {
        let tensor = DenseND::from_vec(vec![1.0, 2.0, 3.0], &[3, 1]).unwrap();
        let broadcast = tensor.broadcast_to(&[3, 4]).unwrap();
        assert_eq!(broadcast.shape(), &[3, 4]);
        for j in 0..4 {
            assert_eq!(broadcast[&[0, j]], 1.0);
            assert_eq!(broadcast[&[2, j]], 3.0);
        }
    }

    #[test]
    fn test_broadcast_to_incompatible() {
        let tensor = DenseND::<f64>::zeros(&[3, 2]);
        assert!(tensor.broadcast_to(&[3, 4]).is_err());
    }

    #[test]
    fn test_shapes_broadcastable() {
        assert!(shapes_broadcastable(&[3, 1], &[3, 4]));
        assert!(shapes_broadcastable(&[1], &[3, 4]));
        assert!(!shapes_broadcastable(&[3, 2], &[3, 4]));
    }
}
