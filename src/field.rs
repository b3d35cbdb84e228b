//! # Field data
//!
//! A field file (`0/U`, `100/alpha.water`, ...) holds one value per cell in
//! its `internalField` entry and, per boundary patch, optional face values in
//! `boundaryField`. Values are one of four tensor ranks, distinguished by
//! [`FieldKind`].
//!
//! The kind of a field is resolved from, in order: the `List<T>` tag of a
//! non-uniform payload, the `class` entry of the header, the length of a
//! uniform tuple, and finally the caller's `datatype` hint, which is what
//! header-less files rely on.

use crate::mesh;
use crate::parse::{decode, error as parse_error, FieldBlock, FoamFile, Payload};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
/// Tensor rank of a field, with the number of components per value
pub enum FieldKind {
    #[display(fmt = "scalar")]
    Scalar,
    #[display(fmt = "vector")]
    Vector,
    #[display(fmt = "symmTensor")]
    SymmTensor,
    #[display(fmt = "tensor")]
    Tensor,
}

impl FieldKind {
    /// number of components of one value
    pub fn arity(&self) -> usize {
        match self {
            FieldKind::Scalar => 1,
            FieldKind::Vector => 3,
            FieldKind::SymmTensor => 6,
            FieldKind::Tensor => 9,
        }
    }

    /// the kind with `arity` components
    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            1 => Some(FieldKind::Scalar),
            3 => Some(FieldKind::Vector),
            6 => Some(FieldKind::SymmTensor),
            9 => Some(FieldKind::Tensor),
            _ => None,
        }
    }

    /// Kind of a `List<T>` type tag
    pub fn from_tag(tag: &str) -> Result<Self, parse_error::UnknownFieldType> {
        let inner = tag
            .strip_prefix("List<")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(tag);

        match inner {
            "scalar" => Ok(FieldKind::Scalar),
            "vector" => Ok(FieldKind::Vector),
            "symmTensor" => Ok(FieldKind::SymmTensor),
            "tensor" => Ok(FieldKind::Tensor),
            _ => Err(parse_error::UnknownFieldType::new(tag.to_string())),
        }
    }

    /// Kind of a header `class` such as `volVectorField` or `surfaceScalarField`.
    ///
    /// `None` for classes that do not name one of the four kinds.
    pub fn from_class(class: &str) -> Option<Self> {
        let class = class.to_ascii_lowercase();

        // checked longest first: `symmtensor` and `sphericaltensor` end in `tensor`
        if class.contains("symmtensor") {
            Some(FieldKind::SymmTensor)
        } else if class.contains("sphericaltensor") {
            None
        } else if class.contains("tensor") {
            Some(FieldKind::Tensor)
        } else if class.contains("vector") {
            Some(FieldKind::Vector)
        } else if class.contains("scalar") {
            Some(FieldKind::Scalar)
        } else {
            None
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = parse_error::UnknownFieldType;

    /// parse a kind name, case insensitive: `scalar`, `vector`, `symmtensor`, `tensor`
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "scalar" => Ok(FieldKind::Scalar),
            "vector" => Ok(FieldKind::Vector),
            "symmtensor" => Ok(FieldKind::SymmTensor),
            "tensor" => Ok(FieldKind::Tensor),
            _ => Err(parse_error::UnknownFieldType::new(name.to_string())),
        }
    }
}

/// Decoded field values
///
/// `values` holds `element_count` tuples of `kind.arity()` components each,
/// interleaved. A uniform field holds exactly one tuple, whatever the number of
/// cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub kind: FieldKind,
    pub values: Vec<f64>,
    pub uniform: bool,
    pub element_count: usize,
    pub is_ascii: bool,
    pub is_single_precision: bool,
    /// exponents of the `dimensions` entry, when present
    pub dimensions: Option<Vec<f64>>,
}

impl Field {
    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    /// iterate over the tuples of the field
    pub fn tuples(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.arity())
    }

    /// the values of one component, one entry per element
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.tuples().map(|tuple| tuple[index]).collect()
    }

    /// the `index`-th tuple, the only tuple for uniform fields
    pub fn tuple(&self, index: usize) -> Option<&[f64]> {
        let index = if self.uniform { 0 } else { index };
        let arity = self.arity();
        self.values.get(index * arity..(index + 1) * arity)
    }

    /// the values with a uniform field repeated `cells` times
    pub fn broadcast(&self, cells: usize) -> Vec<f64> {
        if self.uniform {
            self.values.repeat(cells)
        } else {
            self.values.clone()
        }
    }

    /// Decode the payload of `block` in an already opened file.
    ///
    /// Returns `Ok(None)` when a patch has no `value` entry.
    pub(crate) fn from_file(
        file: &FoamFile,
        block: FieldBlock<'_>,
        opts: &ReadOptions,
    ) -> Result<Option<Self>, Error> {
        let payload = file.payload(block)?;
        let encoding = file.encoding();
        let class = file.class();

        let (kind, values, uniform) = match &payload {
            Payload::Missing => return Ok(None),
            Payload::CodeStream => {
                let entry = match block {
                    FieldBlock::Internal => "internalField".to_string(),
                    FieldBlock::Patch(patch) => format!("boundaryField/{patch}"),
                };
                let e = parse_error::UnsupportedEncoding::new(entry, "#codeStream".into());
                return Err(file.error(e.into()));
            }
            Payload::Uniform(uniform) => {
                let values = decode::decode_uniform(file.content(), uniform, opts.precision)
                    .map_err(|e| file.error(e))?;
                let kind = resolve_kind(None, class, Some(values.len()), opts.datatype)
                    .map_err(|e| file.error(e))?;

                parse_error::TruncatedPayload::check(kind.arity(), values.len(), "values")
                    .map_err(|e| file.error(e.into()))?;

                (kind, values, true)
            }
            Payload::NonUniform { tag, list } => {
                let kind = resolve_kind(tag.as_deref(), class, None, opts.datatype)
                    .map_err(|e| file.error(e))?;
                let values =
                    decode::decode_scalars(file.content(), list, kind.arity(), encoding, opts.precision)
                        .map_err(|e| file.error(e))?;

                (kind, values, false)
            }
        };

        let element_count = if uniform { 1 } else { values.len() / kind.arity() };

        log::debug!(
            "decoded {element_count} {kind} values from {}",
            file.path().display()
        );

        Ok(Some(Self {
            kind,
            values,
            uniform,
            element_count,
            is_ascii: encoding.is_ascii(),
            is_single_precision: encoding.is_binary() && encoding.is_single_precision(),
            dimensions: file.document().dimensions(),
        }))
    }

    /// read the internal field of an opened file
    pub(crate) fn internal(file: &FoamFile, opts: &ReadOptions) -> Result<Self, Error> {
        Self::from_file(file, FieldBlock::Internal, opts)?.ok_or_else(|| {
            file.error(parse_error::MissingPayload::new("internalField".into()).into())
        })
    }
}

/// Resolve the kind of a field from the available hints, strongest first.
fn resolve_kind(
    tag: Option<&str>,
    class: Option<&str>,
    uniform_len: Option<usize>,
    hint: Option<FieldKind>,
) -> Result<FieldKind, ParseError> {
    if let Some(tag) = tag {
        return Ok(FieldKind::from_tag(tag)?);
    }

    if let Some(kind) = class.and_then(FieldKind::from_class) {
        return Ok(kind);
    }

    if let Some(kind) = uniform_len.and_then(FieldKind::from_arity) {
        return Ok(kind);
    }

    if let Some(kind) = hint {
        return Ok(kind);
    }

    match class {
        Some(class) => Err(parse_error::UnknownFieldType::new(class.to_string()).into()),
        None => Err(parse_error::MissingHeaderKey::new("FoamFile".into(), "class".into()).into()),
    }
}

/// Read the internal field `name` at time `time` of a case.
///
/// `time` is a time directory name or `latestTime`.
pub fn read_field<P: AsRef<Path>>(
    case: P,
    time: &str,
    name: &str,
    opts: &ReadOptions,
) -> Result<Field, Error> {
    let case = Case::new(case.as_ref());
    let file = FoamFile::open(case.field_path(time, name)?)?;
    Field::internal(&file, opts)
}

fn read_expecting(
    case: &Path,
    time: &str,
    name: &str,
    opts: &ReadOptions,
    expected: FieldKind,
) -> Result<Field, Error> {
    let field = read_field(case, time, name, opts)?;

    if field.kind != expected {
        return Err(Error::FieldKindMismatch {
            name: name.to_string(),
            expected,
            actual: field.kind,
        });
    }

    Ok(field)
}

/// read a field that must hold scalars
pub fn read_scalar<P: AsRef<Path>>(case: P, time: &str, name: &str, opts: &ReadOptions) -> Result<Field, Error> {
    read_expecting(case.as_ref(), time, name, opts, FieldKind::Scalar)
}

/// read a field that must hold vectors
pub fn read_vector<P: AsRef<Path>>(case: P, time: &str, name: &str, opts: &ReadOptions) -> Result<Field, Error> {
    read_expecting(case.as_ref(), time, name, opts, FieldKind::Vector)
}

/// read a field that must hold symmetric tensors
pub fn read_symm_tensor<P: AsRef<Path>>(
    case: P,
    time: &str,
    name: &str,
    opts: &ReadOptions,
) -> Result<Field, Error> {
    read_expecting(case.as_ref(), time, name, opts, FieldKind::SymmTensor)
}

/// read a field that must hold tensors
pub fn read_tensor<P: AsRef<Path>>(case: P, time: &str, name: &str, opts: &ReadOptions) -> Result<Field, Error> {
    read_expecting(case.as_ref(), time, name, opts, FieldKind::Tensor)
}

/// The kind of a field, without decoding its values.
pub fn field_kind<P: AsRef<Path>>(case: P, time: &str, name: &str) -> Result<FieldKind, Error> {
    let case = Case::new(case.as_ref());
    let file = FoamFile::open(case.field_path(time, name)?)?;

    let payload = file.payload(FieldBlock::Internal)?;
    let uniform_len = match &payload {
        Payload::Uniform(uniform) => Some(
            decode::decode_uniform(file.content(), uniform, 15)
                .map_err(|e| file.error(e))?
                .len(),
        ),
        _ => None,
    };

    resolve_kind(payload.tag(), file.class(), uniform_len, None).map_err(|e| file.error(e))
}

/// Read the values of field `name` on boundary patch `patch`.
///
/// A uniform patch value stays uniform. When the patch has no `value` entry
/// (`zeroGradient` and similar conditions), the internal values of the cells
/// owning the patch faces are returned instead, one per face.
pub fn read_boundary_field<P: AsRef<Path>>(
    case: P,
    time: &str,
    name: &str,
    patch: &str,
    opts: &ReadOptions,
) -> Result<Field, Error> {
    let case = Case::new(case.as_ref());
    let file = FoamFile::open(case.field_path(time, name)?)?;

    if let Some(field) = Field::from_file(&file, FieldBlock::Patch(patch), opts)? {
        return Ok(field);
    }

    log::warn!(
        "no value for patch `{patch}` in {}, using the values of the owner cells",
        file.path().display()
    );

    let internal = Field::internal(&file, opts)?;
    let (_, owners) = mesh::read_patch_owners(&case.mesh_dir(opts)?, patch)?;

    owner_values(name, &internal, &owners)
}

/// the internal values of the `owners` cells, one tuple per face
fn owner_values(name: &str, internal: &Field, owners: &[usize]) -> Result<Field, Error> {
    if internal.uniform {
        return Ok(internal.clone());
    }

    let mut values = Vec::with_capacity(owners.len() * internal.arity());

    for &cell in owners {
        let tuple = internal.tuple(cell).ok_or_else(|| Error::CellCountMismatch {
            name: name.to_string(),
            values: internal.element_count,
            cells: cell + 1,
        })?;
        values.extend_from_slice(tuple);
    }

    Ok(Field {
        values,
        element_count: owners.len(),
        ..internal.clone()
    })
}

/// Read a field and reshape it onto the structured block formed by the mesh.
///
/// The mesh must be cartesian at `opts.precision` (see
/// [`StructuredGrid`](crate::StructuredGrid)). Uniform fields are broadcast to
/// every cell first. `opts.bounds` restricts both mesh and field to the cells
/// inside the box.
pub fn read_structured_field<T, P>(case: P, time: &str, name: &str, opts: &ReadOptions) -> Result<T, Error>
where
    T: FromBuffer<StructuredGrid>,
    P: AsRef<Path>,
{
    let case = case.as_ref();
    let field = read_field(case, time, name, opts)?;
    let centres = mesh::read_mesh(case, opts)?;

    let arity = field.arity();
    let mut selected = Vec::with_capacity(centres.len() * arity);
    for &cell in &centres.cells {
        let tuple = field.tuple(cell).ok_or_else(|| Error::CellCountMismatch {
            name: name.to_string(),
            values: field.element_count,
            cells: centres.cells.iter().max().map_or(0, |max| max + 1),
        })?;
        selected.extend_from_slice(tuple);
    }

    let grid = StructuredGrid::from_centres(&centres.x, &centres.y, &centres.z, opts.precision)?;

    Ok(grid.reshape(&selected, arity, opts.order)?)
}
