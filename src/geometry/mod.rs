//! # Cell geometry
//!
//! Cell centroids are the arithmetic mean of the points bounding the cell, not
//! a volume weighted centre. This is exact for parallelepipeds and a close
//! approximation for near regular cells.
//!
//! Cell volumes are the volume of the convex hull of the bounding points. For
//! convex cells (hexahedra, tetrahedra, prisms, most polyhedra produced by
//! mesh generators) this is exact. Concave cells are over-estimated: the hull
//! fills in the concavity. This is a known approximation and is not detected.

mod hull;

pub use hull::convex_hull_volume;

use crate::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An axis aligned box used to select cells by their centroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// `true` when `point` lies strictly inside the box on all three axes
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        (0..3).all(|axis| self.min[axis] < point[axis] && point[axis] < self.max[axis])
    }
}

/// component wise mean of the points at `indices`
pub fn centroid(points: &[[f64; 3]], indices: &[usize]) -> [f64; 3] {
    if indices.is_empty() {
        return [f64::NAN; 3];
    }

    let mut sum = [0.0; 3];
    for &index in indices {
        for axis in 0..3 {
            sum[axis] += points[index][axis];
        }
    }

    let n = indices.len() as f64;
    sum.map(|total| total / n)
}

/// convex hull volume of the points at `indices`
pub fn volume(points: &[[f64; 3]], indices: &[usize]) -> f64 {
    let coordinates: Vec<[f64; 3]> = indices.iter().map(|&index| points[index]).collect();
    convex_hull_volume(&coordinates)
}

/// Centroids and volumes of a selection of cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellGeometry {
    /// indices of the selected cells in the mesh
    pub cells: Vec<usize>,
    pub centroids: Vec<[f64; 3]>,
    pub volumes: Vec<f64>,
}

impl CellGeometry {
    /// Compute the geometry of every cell of `mesh` whose centroid lies inside
    /// `bounds` (all cells when `bounds` is `None`).
    ///
    /// Cells are filtered on their centroid first, so hulls are only built for
    /// the cells that are kept.
    pub fn compute(mesh: &PolyMesh, bounds: Option<&BoundingBox>) -> Self {
        let cell_points = mesh.cell_points();

        let (cells, centroids): (Vec<usize>, Vec<[f64; 3]>) = cell_points
            .iter()
            .enumerate()
            .map(|(cell, indices)| (cell, centroid(&mesh.points, indices)))
            .filter(|(_, centre)| bounds.map_or(true, |b| b.contains(centre)))
            .unzip();

        log::debug!(
            "computing hull volumes for {} of {} cells",
            cells.len(),
            cell_points.len()
        );

        #[cfg(feature = "parallel")]
        let volumes = cells
            .par_iter()
            .map(|&cell| volume(&mesh.points, &cell_points[cell]))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let volumes = cells
            .iter()
            .map(|&cell| volume(&mesh.points, &cell_points[cell]))
            .collect();

        Self {
            cells,
            centroids,
            volumes,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.volumes.iter().sum()
    }
}

/// Centroids and convex hull volumes of the cells of a case, restricted to
/// `opts.bounds` when it is set.
pub fn cell_volumes<P: AsRef<Path>>(case: P, opts: &ReadOptions) -> Result<CellGeometry, Error> {
    let case = Case::new(case.as_ref());
    let mesh = PolyMesh::read(case.mesh_dir(opts)?, opts.precision)?;

    Ok(CellGeometry::compute(&mesh, opts.bounds.as_ref()))
}
