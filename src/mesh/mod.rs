//! # Mesh Information
//!
//! An OpenFOAM `polyMesh` directory describes an unstructured mesh of
//! polyhedral cells through five files:
//!
//! * `points`: the coordinates of every mesh point
//! * `faces`: the point indices of every face, either as a `faceList`
//!   (`4(0 1 2 3)` per face) or as a `faceCompactList` (an offset table
//!   followed by the concatenated point indices)
//! * `owner`: for every face, the cell that owns it
//! * `neighbour`: for every internal face, the cell on the other side
//! * `boundary`: the named patches partitioning the trailing boundary faces
//!
//! Cells are not stored explicitly. A [`PolyMesh`] rebuilds the set of points
//! bounding each cell by collecting the points of every face it owns or
//! neighbours. Those point sets feed the [geometry](crate::geometry) module.
//!
//! All of the files may be gzip compressed and ASCII or binary.

mod boundary;
mod error;
mod labels;

pub use boundary::{Boundary, BoundaryPatch};
pub use error::MeshError;
pub use labels::CellLabels;

use crate::geometry;
use crate::prelude::*;

/// A polyhedral mesh, read from a `polyMesh` directory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyMesh {
    pub points: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
    pub owner: CellLabels,
    pub neighbour: CellLabels,
    pub boundary: Boundary,
}

impl PolyMesh {
    /// Read all five mesh files from `dir`. Point coordinates are rounded to
    /// `precision` decimals.
    pub fn read<P: AsRef<Path>>(dir: P, precision: i32) -> Result<Self, Error> {
        let dir = dir.as_ref();
        log::info!("reading mesh in {}", dir.display());

        let points = read_points(&dir.join("points"), precision)?;
        let faces = read_faces(&dir.join("faces"))?;
        let owner = labels::read_labels(&dir.join("owner"))?;
        let neighbour = labels::read_labels(&dir.join("neighbour"))?;
        let boundary = boundary::read_boundary(&dir.join("boundary"))?;

        let mesh = Self::new(points, faces, owner, neighbour, boundary)?;

        log::debug!(
            "mesh has {} points, {} faces, {} cells and {} patches",
            mesh.points.len(),
            mesh.faces.len(),
            mesh.cell_count(),
            mesh.boundary.len()
        );

        Ok(mesh)
    }

    /// assemble a mesh from its parts, checking that all indices are in range
    pub fn new(
        points: Vec<[f64; 3]>,
        faces: Vec<Vec<usize>>,
        owner: CellLabels,
        neighbour: CellLabels,
        boundary: Boundary,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            points,
            faces,
            owner,
            neighbour,
            boundary,
        };

        mesh.validate()?;
        Ok(mesh)
    }

    fn validate(&self) -> Result<(), MeshError> {
        let n_points = self.points.len();
        let n_faces = self.faces.len();

        for (face, points) in self.faces.iter().enumerate() {
            if let Some(&point) = points.iter().find(|&&point| point >= n_points) {
                return Err(error::PointIndex::new(face, point, n_points).into());
            }
        }

        for (file, labels) in [("owner", &self.owner), ("neighbour", &self.neighbour)] {
            if let Some(face) = labels.last_face().filter(|&face| face >= n_faces) {
                return Err(error::FaceIndex::new(file, face, n_faces).into());
            }
        }

        let n_cells = self.cell_count();
        if n_cells == 0 && n_faces > 0 {
            return Err(MeshError::NoCells);
        }

        if let Some((face, cell)) = self.neighbour.iter().find(|&(_, cell)| cell >= n_cells) {
            return Err(error::CellIndex::new(face, cell, n_cells).into());
        }

        for patch in self.boundary.patches() {
            let end = patch.faces().end;
            if end > n_faces {
                return Err(error::PatchRange::new(patch.name.clone(), end, n_faces).into());
            }
        }

        Ok(())
    }

    /// `max(owner) + 1`
    pub fn cell_count(&self) -> usize {
        self.owner.cell_count()
    }

    /// For every cell, the sorted and deduplicated indices of the points of
    /// all the faces it owns or neighbours.
    pub fn cell_points(&self) -> Vec<Vec<usize>> {
        let mut cells: Vec<Vec<usize>> = vec![Vec::new(); self.cell_count()];

        for (face, cell) in self.owner.iter().chain(self.neighbour.iter()) {
            cells[cell].extend_from_slice(&self.faces[face]);
        }

        for points in cells.iter_mut() {
            points.sort_unstable();
            points.dedup();
        }

        cells
    }

    /// cell centroids, indexed by cell
    pub fn cell_centres(&self) -> Vec<[f64; 3]> {
        self.cell_points()
            .iter()
            .map(|points| geometry::centroid(&self.points, points))
            .collect()
    }

    /// mean of the points of each face of a patch
    pub fn patch_face_centres(&self, patch: &str) -> Result<Vec<[f64; 3]>, MeshError> {
        let patch = self.boundary.patch(patch)?;

        Ok(self.faces[patch.faces()]
            .iter()
            .map(|points| geometry::centroid(&self.points, points))
            .collect())
    }

    /// the owning cell of every face of a patch, in face order
    pub fn patch_owners(&self, patch: &str) -> Result<Vec<usize>, MeshError> {
        let patch = self.boundary.patch(patch)?;

        patch
            .faces()
            .map(|face| {
                self.owner
                    .cell_of(face)
                    .ok_or_else(|| {
                        MeshError::from(error::FaceIndex::new("owner", face, self.owner.declared_len()))
                    })
            })
            .collect()
    }
}

fn read_points(path: &Path, precision: i32) -> Result<Vec<[f64; 3]>, Error> {
    let file = parse::FoamFile::open(path)?;
    let values = file.bare_scalars(3, precision)?;

    if values.len() % 3 != 0 {
        return Err(MeshError::from(error::Points::new(values.len())).into());
    }

    Ok(values
        .chunks_exact(3)
        .map(|xyz| [xyz[0], xyz[1], xyz[2]])
        .collect())
}

fn read_faces(path: &Path) -> Result<Vec<Vec<usize>>, Error> {
    let file = parse::FoamFile::open(path)?;
    parse::decode::decode_faces(file.content(), file.document()).map_err(|e| file.error(e))
}

/// Owning cell indices for the faces of a patch, read without loading the
/// points and faces of the mesh.
pub(crate) fn read_patch_owners(dir: &Path, patch: &str) -> Result<(BoundaryPatch, Vec<usize>), Error> {
    let boundary = boundary::read_boundary(&dir.join("boundary"))?;
    let patch = boundary.patch(patch)?.clone();
    let owner = labels::read_labels(&dir.join("owner"))?;

    let cells = patch
        .faces()
        .map(|face| {
            owner
                .cell_of(face)
                .ok_or_else(|| MeshError::from(error::FaceIndex::new("owner", face, owner.declared_len())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((patch, cells))
}

/// Cell centre coordinates of a mesh, one entry per cell
///
/// When read with `structured` set, the cells are already sorted into the order
/// of the [`StructuredGrid`] stored in `grid`, so the coordinate arrays can be
/// reshaped directly with [`CellCentres::reshape`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellCentres {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// mesh index of every entry, after box filtering and sorting
    pub cells: Vec<usize>,
    pub grid: Option<StructuredGrid>,
}

impl CellCentres {
    fn from_points(points: Vec<[f64; 3]>, cells: Vec<usize>) -> Self {
        let x = points.iter().map(|p| p[0]).collect();
        let y = points.iter().map(|p| p[1]).collect();
        let z = points.iter().map(|p| p[2]).collect();

        Self {
            x,
            y,
            z,
            cells,
            grid: None,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reshape the three coordinate arrays into dense structured arrays.
    ///
    /// Returns `None` if the centres were not read with `structured` set.
    pub fn reshape<T: FromBuffer<StructuredGrid>>(
        &self,
        order: Order,
    ) -> Option<Result<(T, T, T), ndarray::ShapeError>> {
        let grid = self.grid.as_ref()?;

        let reshape = || -> Result<(T, T, T), ndarray::ShapeError> {
            Ok((
                T::from_buffer(self.x.clone(), grid, 1, order)?,
                T::from_buffer(self.y.clone(), grid, 1, order)?,
                T::from_buffer(self.z.clone(), grid, 1, order)?,
            ))
        };

        Some(reshape())
    }
}

/// Read the cell centres of a case.
///
/// Centroids are computed from the `polyMesh` files and rounded to
/// `opts.precision`. Cells outside `opts.bounds` are dropped. With
/// `opts.structured` the remaining cells are sorted into a cartesian block,
/// failing with [`NotCartesian`](crate::NotCartesian) if they do not form one.
pub fn read_mesh<P: AsRef<Path>>(case: P, opts: &ReadOptions) -> Result<CellCentres, Error> {
    let case = Case::new(case.as_ref());
    let mesh = PolyMesh::read(case.mesh_dir(opts)?, opts.precision)?;

    let (cells, centres): (Vec<usize>, Vec<[f64; 3]>) = mesh
        .cell_centres()
        .into_iter()
        .map(|centre| centre.map(|value| utils::round_to(value, opts.precision)))
        .enumerate()
        .filter(|(_, centre)| opts.bounds.map_or(true, |b| b.contains(centre)))
        .unzip();

    let mut centres = CellCentres::from_points(centres, cells);

    if opts.structured {
        let grid = StructuredGrid::from_centres(&centres.x, &centres.y, &centres.z, opts.precision)?;

        centres.x = grid.permute(&centres.x, 1);
        centres.y = grid.permute(&centres.y, 1);
        centres.z = grid.permute(&centres.z, 1);
        centres.cells = grid.permutation().iter().map(|&i| centres.cells[i]).collect();
        centres.grid = Some(grid);
    }

    Ok(centres)
}

/// Face centres of a boundary patch, computed as the mean of each face's points.
pub fn read_patch_centres<P: AsRef<Path>>(
    case: P,
    patch: &str,
    opts: &ReadOptions,
) -> Result<Vec<[f64; 3]>, Error> {
    let case = Case::new(case.as_ref());
    let mesh = PolyMesh::read(case.mesh_dir(opts)?, opts.precision)?;

    let centres = mesh.patch_face_centres(patch)?;

    Ok(centres
        .into_iter()
        .map(|centre| centre.map(|value| utils::round_to(value, opts.precision)))
        .collect())
}
