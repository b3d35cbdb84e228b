//! Re-ordering the cells of a cartesian block mesh into dense arrays.
//!
//! OpenFOAM stores cells in whatever order the mesher produced them. If the
//! mesh is a single cartesian block, sorting the cells by their centroid (first
//! by `z`, then `y`, then `x`) puts them in the order of a dense `nx * ny * nz`
//! array with `x` varying fastest.
//!
//! Whether the mesh is cartesian is decided by counting the distinct centroid
//! coordinates along each axis after rounding. A mesh with coordinate noise
//! above the rounding precision shows too many distinct values and is
//! rejected with [`NotCartesian`]. Lowering the precision fixes that.

use crate::prelude::*;

/// The cell centres do not form a cartesian block
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "cells do not form a cartesian block: {nx} x {ny} x {nz} = {product} distinct coordinates \
     but the mesh has {cells} cells. Lowering the rounding precision may help"
)]
pub struct NotCartesian {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub product: usize,
    pub cells: usize,
}

/// The dimensions of a cartesian block and the permutation that sorts cells into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredGrid {
    nx: usize,
    ny: usize,
    nz: usize,
    permutation: Vec<usize>,
}

/// round, and fold `-0.0` into `0.0` so it sorts equal to `0.0`
fn key(value: f64, precision: i32) -> f64 {
    utils::round_to(value, precision) + 0.0
}

fn distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

impl StructuredGrid {
    /// Sort cells by their rounded centroid coordinates and check that they form
    /// an `nx * ny * nz` block.
    ///
    /// `x`, `y` and `z` must have one entry per cell.
    pub fn from_centres(x: &[f64], y: &[f64], z: &[f64], precision: i32) -> Result<Self, NotCartesian> {
        let cells = x.len();
        debug_assert!(y.len() == cells && z.len() == cells);

        let rx: Vec<f64> = x.iter().map(|&v| key(v, precision)).collect();
        let ry: Vec<f64> = y.iter().map(|&v| key(v, precision)).collect();
        let rz: Vec<f64> = z.iter().map(|&v| key(v, precision)).collect();

        let (nx, ny, nz) = (distinct(&rx), distinct(&ry), distinct(&rz));
        let product = nx * ny * nz;

        if product != cells {
            return Err(NotCartesian {
                nx,
                ny,
                nz,
                product,
                cells,
            });
        }

        let mut permutation: Vec<usize> = (0..cells).collect();
        permutation.sort_by(|&a, &b| {
            rz[a]
                .total_cmp(&rz[b])
                .then_with(|| ry[a].total_cmp(&ry[b]))
                .then_with(|| rx[a].total_cmp(&rx[b]))
        });

        log::debug!("cells form a {nx} x {ny} x {nz} block");

        Ok(Self {
            nx,
            ny,
            nz,
            permutation,
        })
    }

    /// `(nx, ny, nz)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// number of cells
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// `permutation()[i]` is the original index of the `i`-th cell in block order
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Re-order a flat buffer of `components`-tuples, one tuple per cell, into
    /// block order.
    pub fn permute(&self, values: &[f64], components: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(values.len());
        for &cell in &self.permutation {
            out.extend_from_slice(&values[cell * components..(cell + 1) * components]);
        }
        out
    }

    /// Re-order a flat field buffer and reshape it into a dense array.
    pub fn reshape<T: FromBuffer<Self>>(
        &self,
        values: &[f64],
        components: usize,
        order: Order,
    ) -> Result<T, ndarray::ShapeError> {
        if values.len() != self.len() * components {
            return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape));
        }

        T::from_buffer(self.permute(values, components), self, components, order)
    }
}
