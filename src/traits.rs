//! # Traits
//!
//! [`FromBuffer`] turns a flat buffer of decoded values into a container shaped
//! by some description of the domain (the `SPAN`). The readers decode every
//! field into a plain `Vec<f64>` with tuples interleaved, so any container that
//! implements `FromBuffer<StructuredGrid>` can be produced directly from
//! [`read_structured_field`](crate::read_structured_field):
//!
//! ```ignore
//! let opts = foamfile::ReadOptions::default();
//! let alpha: foamfile::Scalar3D = foamfile::read_structured_field("./case", "0", "alpha", &opts)?;
//! let u: foamfile::Tensor3D = foamfile::read_structured_field("./case", "0", "U", &opts)?;
//! ```

use crate::prelude::*;
use ndarray::{ErrorKind, ShapeError};

/// Build a container from a flat buffer of `components`-tuples.
///
/// The buffer is in the order of `spans` (for a [`StructuredGrid`] that is
/// block order, `x` varying fastest), tuples interleaved.
pub trait FromBuffer<SPAN>: Sized {
    fn from_buffer(
        buffer: Vec<f64>,
        spans: &SPAN,
        components: usize,
        order: Order,
    ) -> Result<Self, ShapeError>;
}

impl<T> FromBuffer<T> for Vec<f64> {
    fn from_buffer(
        buffer: Vec<f64>,
        _spans: &T,
        _components: usize,
        _order: Order,
    ) -> Result<Self, ShapeError> {
        Ok(buffer)
    }
}

impl FromBuffer<StructuredGrid> for Array3<f64> {
    fn from_buffer(
        buffer: Vec<f64>,
        grid: &StructuredGrid,
        components: usize,
        order: Order,
    ) -> Result<Self, ShapeError> {
        if components != 1 {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape));
        }

        let shape = grid.shape();

        match order {
            Order::ColumnMajor => Self::from_shape_vec(shape.f(), buffer),
            Order::RowMajor => Self::from_shape_vec(shape, buffer),
        }
    }
}

impl FromBuffer<StructuredGrid> for Array4<f64> {
    fn from_buffer(
        buffer: Vec<f64>,
        grid: &StructuredGrid,
        components: usize,
        order: Order,
    ) -> Result<Self, ShapeError> {
        let (nx, ny, nz) = grid.shape();
        let shape = (components, nx, ny, nz);

        match order {
            // interleaved tuples are already column major with the component axis first
            Order::ColumnMajor => Self::from_shape_vec(shape.f(), buffer),
            Order::RowMajor => {
                // row major wants every component contiguous
                let cells = buffer.len() / components.max(1);
                let mut planar = Vec::with_capacity(buffer.len());
                for component in 0..components {
                    planar.extend((0..cells).map(|cell| buffer[cell * components + component]));
                }
                Self::from_shape_vec(shape, planar)
            }
        }
    }
}
