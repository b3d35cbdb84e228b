use crate::prelude::*;

#[derive(Deref, DerefMut, Into, Clone, PartialEq, Default, Debug)]
/// Array container for scalar information on a structured block, such as a
/// volume fraction or pressure field
///
/// The first axis holds X information, the second Y and the third Z. For a mesh
/// with `nx=100`, `ny=200` and `nz=300` cells the array shape is `(100, 200, 300)`.
/// No vector information can be stored in `Scalar3D`, see [`Tensor3D`](crate::Tensor3D).
pub struct Scalar3D<NUM = f64>(Array3<NUM>);

impl<NUM> Scalar3D<NUM> {
    /// Construct a `Scalar3D` from an array.
    pub fn new(arr: Array3<NUM>) -> Self {
        Self(arr)
    }

    /// get the array that this type wraps.
    /// usually this method is not required because `Scalar3D` implements [`DerefMut`](std::ops::DerefMut) and
    /// [`Deref`](std::ops::Deref)
    pub fn inner(self) -> Array3<NUM> {
        self.0
    }

    /// iterate the values in block order: x fastest, then y, then z
    pub fn iter_block(&self) -> impl Iterator<Item = &NUM> {
        self.0.t().into_iter()
    }
}

impl FromBuffer<StructuredGrid> for Scalar3D<f64> {
    fn from_buffer(
        buffer: Vec<f64>,
        grid: &StructuredGrid,
        components: usize,
        order: Order,
    ) -> Result<Self, ndarray::ShapeError> {
        Array3::from_buffer(buffer, grid, components, order).map(Self::new)
    }
}
