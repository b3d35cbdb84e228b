use crate::prelude::*;

use ndarray::{ArrayView3, Axis};

#[derive(Deref, DerefMut, Into, Clone, PartialEq, Default, Debug)]
/// Array container for vector and tensor information on a structured block
///
/// The first axis holds the components (3 for a vector, 6 for a symmetric
/// tensor, 9 for a tensor) and the remaining three axes are X, Y and Z, so a
/// velocity field on a `(100, 200, 300)` block has shape `(3, 100, 200, 300)`.
pub struct Tensor3D<NUM = f64>(Array4<NUM>);

impl<NUM> Tensor3D<NUM> {
    /// Construct a `Tensor3D` from an array.
    pub fn new(arr: Array4<NUM>) -> Self {
        Self(arr)
    }

    /// get the array that this type wraps.
    pub fn inner(self) -> Array4<NUM> {
        self.0
    }

    /// a single component over the whole block
    ///
    /// ## Panics
    ///
    /// if `index` is not smaller than the number of components
    pub fn component(&self, index: usize) -> ArrayView3<'_, NUM> {
        self.0.index_axis(Axis(0), index)
    }
}

impl FromBuffer<StructuredGrid> for Tensor3D<f64> {
    fn from_buffer(
        buffer: Vec<f64>,
        grid: &StructuredGrid,
        components: usize,
        order: Order,
    ) -> Result<Self, ndarray::ShapeError> {
        Array4::from_buffer(buffer, grid, components, order).map(Self::new)
    }
}
