//! Common traits and types that are useful for working with `foamfile`
#![allow(unused_imports)]

pub use crate::field::{Field, FieldKind};
pub use crate::mesh::{Boundary, BoundaryPatch, PolyMesh};
pub use crate::options::{Order, ReadOptions, ReadOptionsBuilder};
pub use crate::structured::StructuredGrid;
pub use crate::traits::FromBuffer;
pub use crate::Case;

pub(crate) use crate::parse::{Encoding, Format};
pub(crate) use crate::{Error, ParseError};

pub(crate) use crate::{mesh, parse, utils};

pub(crate) use derive_more::{Constructor, Deref, DerefMut, Display, From, Into};

pub(crate) use ndarray::{Array3, Array4, ShapeBuilder};

pub(crate) use std::ops::Range;
pub(crate) use std::path::{Path, PathBuf};
