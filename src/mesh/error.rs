use crate::prelude::*;

/// Mesh files that parsed fine but do not describe a consistent mesh
#[derive(Debug, thiserror::Error, From)]
pub enum MeshError {
    #[error("{0}")]
    MissingBoundaryPatch(MissingBoundaryPatch),
    #[error("{0}")]
    PointIndex(PointIndex),
    #[error("{0}")]
    FaceIndex(FaceIndex),
    #[error("{0}")]
    CellIndex(CellIndex),
    #[error("{0}")]
    PatchRange(PatchRange),
    #[error("{0}")]
    Points(Points),
    #[error("the owner list has no cells")]
    NoCells,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "no boundary patch named `{name}`, available patches are {available:?}")]
pub struct MissingBoundaryPatch {
    pub name: String,
    pub available: Vec<String>,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "face {face} references point {point} but the mesh has {points} points")]
pub struct PointIndex {
    pub face: usize,
    pub point: usize,
    pub points: usize,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "`{file}` has an entry for face {face} but the mesh has {faces} faces")]
pub struct FaceIndex {
    pub file: &'static str,
    pub face: usize,
    pub faces: usize,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "face {face} has neighbour cell {cell} but the owner list only defines {cells} cells")]
pub struct CellIndex {
    pub face: usize,
    pub cell: usize,
    pub cells: usize,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "patch `{patch}` ends at face {end} but the mesh has {faces} faces")]
pub struct PatchRange {
    pub patch: String,
    pub end: usize,
    pub faces: usize,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "`points` holds {values} values which is not a whole number of 3D points")]
pub struct Points {
    pub values: usize,
}
