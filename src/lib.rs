//! Reading OpenFOAM case files: field data, polyMesh connectivity, cell geometry
//! and structured re-ordering.
//!
//! Every read opens one file (or its `.gz` twin), parses the `FoamFile` header,
//! locates the numeric payload and decodes it into plain `f64` buffers. Mesh
//! files are combined into a [`PolyMesh`], from which cell centroids and
//! convex-hull volumes are derived. If the mesh is a cartesian block, a
//! [`StructuredGrid`] re-orders any cell field into dense `ndarray` arrays.
//!
//! ```ignore
//! let opts = foamfile::ReadOptions::default();
//! let alpha = foamfile::read_scalar("./cavity", "0", "alpha", &opts)?;
//! let centres = foamfile::read_mesh("./cavity", &opts)?;
//! ```

pub mod array;
pub mod case;
pub mod field;
pub mod geometry;
pub mod mesh;
pub mod options;
pub mod parse;
pub mod prelude;
pub mod structured;
mod traits;
mod utils;

pub use array::{Scalar3D, Tensor3D};
pub use case::{Case, LATEST_TIME};
pub use field::{
    field_kind, read_boundary_field, read_field, read_scalar, read_structured_field,
    read_symm_tensor, read_tensor, read_vector, Field, FieldKind,
};
pub use geometry::{cell_volumes, BoundingBox, CellGeometry};
pub use mesh::{
    read_mesh, read_patch_centres, Boundary, BoundaryPatch, CellCentres, CellLabels, MeshError, PolyMesh,
};
pub use options::{Order, ReadOptions, ReadOptionsBuilder};
pub use parse::{header_block, Dictionary, FoamFile, ParseError};
pub use structured::{NotCartesian, StructuredGrid};
pub use traits::FromBuffer;
pub use utils::round_to;

pub use ndarray;

use std::path::PathBuf;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("could not find `{}` or a gzip compressed `.gz` copy of it", path.display())]
    MissingFile { path: PathBuf },
    #[error("Error while parsing `{}`: {source}", path.display())]
    Read { path: PathBuf, source: ParseError },
    #[error("{0}")]
    Mesh(#[from] mesh::MeshError),
    #[error("{0}")]
    NotCartesian(#[from] NotCartesian),
    #[error("`{name}` does not contain a {expected} field, found {actual}")]
    FieldKindMismatch {
        name: String,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("field `{name}` has {values} elements but the mesh has {cells} cells")]
    CellCountMismatch {
        name: String,
        values: usize,
        cells: usize,
    },
    #[error("no time directories found in `{}`", path.display())]
    NoTimeDirectory { path: PathBuf },
    #[error("could not reshape data into a structured array: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl Error {
    /// attach the path of the file being read to a parse error
    pub(crate) fn read<P: Into<PathBuf>>(path: P, source: ParseError) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }
}
