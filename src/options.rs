//! Caller settings shared by all the readers.

use crate::field::FieldKind;
use crate::geometry::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Memory layout used when reshaping flat data into dense arrays
pub enum Order {
    /// first axis varies fastest (Fortran order)
    #[default]
    ColumnMajor,
    /// last axis varies fastest (C order)
    RowMajor,
}

/// Settings for reading fields and meshes.
///
/// Every setting has a default, so only the ones that matter need to be given:
///
/// ```
/// let opts = foamfile::ReadOptionsBuilder::default()
///     .precision(10)
///     .structured(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(opts.precision, 10);
/// assert_eq!(opts.order, foamfile::Order::ColumnMajor);
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder)]
#[builder(default)]
pub struct ReadOptions {
    /// number of decimals every decoded value is rounded to
    pub precision: i32,
    /// layout of reshaped structured arrays
    pub order: Order,
    /// reorder cells into a cartesian block when reading the mesh
    pub structured: bool,
    /// field type to assume for files without a `FoamFile` header
    #[builder(setter(strip_option))]
    pub datatype: Option<FieldKind>,
    /// only keep cells whose centroid lies strictly inside this box
    #[builder(setter(strip_option))]
    pub bounds: Option<BoundingBox>,
    /// time directory to look for a moving `polyMesh` in before `constant/polyMesh`
    #[builder(setter(into, strip_option))]
    pub mesh_time: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            precision: 15,
            order: Order::ColumnMajor,
            structured: false,
            datatype: None,
            bounds: None,
            mesh_time: None,
        }
    }
}
