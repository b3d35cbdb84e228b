mod common;

use common::{BlockCase, PatchValue};
use foamfile::prelude::*;
use foamfile::{ndarray, BoundingBox, Error, ParseError, Scalar3D, Tensor3D};

const SHAPE: (usize, usize, usize) = (3, 2, 2);

/// value of every cell, in cell label order: the block index of the cell
fn block_values(case: &BlockCase) -> Vec<f64> {
    let mut values = vec![0.0; case.cells()];
    for k in 0..case.nz {
        for j in 0..case.ny {
            for i in 0..case.nx {
                values[case.cell(i, j, k)] = case.block_index(i, j, k) as f64;
            }
        }
    }
    values
}

/// `(b, 10 b, 100 b)` for block index `b`
fn block_vectors(case: &BlockCase) -> Vec<f64> {
    block_values(case)
        .into_iter()
        .flat_map(|b| [b, 10.0 * b, 100.0 * b])
        .collect()
}

fn write_fields(case: &BlockCase) {
    let alpha = block_values(case);
    let top: Vec<f64> = (0..case.patches[3].1).map(|face| 0.5 * face as f64).collect();
    case.write_field(
        "0",
        "alpha",
        "volScalarField",
        "scalar",
        1,
        &alpha,
        &[
            PatchValue::Missing,
            PatchValue::Uniform("1"),
            PatchValue::Missing,
            PatchValue::NonUniform(top),
            PatchValue::Missing,
            PatchValue::Missing,
        ],
    );

    case.write_field(
        "0",
        "U",
        "volVectorField",
        "vector",
        3,
        &block_vectors(case),
        &[
            PatchValue::Uniform("(1 0 0)"),
            PatchValue::Missing,
            PatchValue::Uniform("(0 0 0)"),
            PatchValue::Uniform("(0 0 0)"),
            PatchValue::Missing,
            PatchValue::Missing,
        ],
    );

    let sigma: Vec<f64> = (0..case.cells() * 6).map(|v| v as f64 * 0.25).collect();
    case.write_field(
        "0",
        "sigma",
        "volSymmTensorField",
        "symmTensor",
        6,
        &sigma,
        &[
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
        ],
    );

    let taus: Vec<f64> = (0..case.cells() * 9).map(|v| -(v as f64) / 8.0).collect();
    case.write_field(
        "0",
        "Taus",
        "volTensorField",
        "tensor",
        9,
        &taus,
        &[
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
            PatchValue::Missing,
        ],
    );
}

#[test]
fn ascii_and_binary_agree() {
    let ascii = BlockCase::write("agree", SHAPE, false);
    let binary = BlockCase::write("agree", SHAPE, true);
    write_fields(&ascii);
    write_fields(&binary);

    let opts = ReadOptions::default();

    for (name, kind) in [
        ("alpha", FieldKind::Scalar),
        ("U", FieldKind::Vector),
        ("sigma", FieldKind::SymmTensor),
        ("Taus", FieldKind::Tensor),
    ] {
        let a = foamfile::read_field(&ascii.root, "0", name, &opts).unwrap();
        let b = foamfile::read_field(&binary.root, "0", name, &opts).unwrap();

        assert_eq!(a.kind, kind);
        assert_eq!(b.kind, kind);
        assert_eq!(a.values, b.values, "{name}");
        assert_eq!(a.values.len(), kind.arity() * ascii.cells());
        assert_eq!(a.element_count, ascii.cells());
        assert!(a.is_ascii);
        assert!(!b.is_ascii);
        assert!(!b.is_single_precision);
    }

    let a = foamfile::read_mesh(&ascii.root, &opts).unwrap();
    let b = foamfile::read_mesh(&binary.root, &opts).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), ascii.cells());
}

#[test]
fn single_precision_and_long_labels() {
    let ascii = BlockCase::write("single", SHAPE, false);
    let single = BlockCase::write_single("single", SHAPE);
    write_fields(&ascii);
    write_fields(&single);

    let opts = ReadOptionsBuilder::default().precision(6).build().unwrap();

    for name in ["alpha", "U", "sigma", "Taus"] {
        let a = foamfile::read_field(&ascii.root, "0", name, &opts).unwrap();
        let b = foamfile::read_field(&single.root, "0", name, &opts).unwrap();

        assert_eq!(a.kind, b.kind);
        assert_eq!(a.values, b.values, "{name}");
        assert!(b.is_single_precision);
        assert!(!a.is_single_precision);
    }

    // points, faces, owner and neighbour are all binary with 8 byte labels
    let a = foamfile::read_mesh(&ascii.root, &opts).unwrap();
    let b = foamfile::read_mesh(&single.root, &opts).unwrap();
    assert_eq!(a, b);

    let geometry = foamfile::cell_volumes(&single.root, &opts).unwrap();
    assert_eq!(geometry.len(), single.cells());
    assert!(geometry.volumes.iter().all(|v| (v - 1.0).abs() < 1e-6));
    assert_eq!(geometry.centroids[single.cell(2, 1, 0)], [2.5, 1.5, 0.5]);

    let top = foamfile::read_boundary_field(&single.root, "0", "alpha", "top", &opts).unwrap();
    assert_eq!(top.values.len(), single.patches[3].1);
    assert_eq!(top.values[1], 0.5);
}

#[test]
fn typed_readers_check_the_kind() {
    let case = BlockCase::write("typed", SHAPE, false);
    write_fields(&case);
    let opts = ReadOptions::default();

    assert!(foamfile::read_scalar(&case.root, "0", "alpha", &opts).is_ok());
    assert!(foamfile::read_symm_tensor(&case.root, "0", "sigma", &opts).is_ok());
    assert!(foamfile::read_tensor(&case.root, "0", "Taus", &opts).is_ok());

    let err = foamfile::read_vector(&case.root, "0", "alpha", &opts).unwrap_err();
    assert!(matches!(
        err,
        Error::FieldKindMismatch {
            expected: FieldKind::Vector,
            actual: FieldKind::Scalar,
            ..
        }
    ));

    assert_eq!(foamfile::field_kind(&case.root, "0", "U").unwrap(), FieldKind::Vector);
    assert_eq!(
        foamfile::field_kind(&case.root, "latestTime", "sigma").unwrap(),
        FieldKind::SymmTensor
    );
}

#[test]
fn gzip_is_transparent() {
    let case = BlockCase::write("gzip", SHAPE, true);
    write_fields(&case);
    let opts = ReadOptions::default();

    let plain = foamfile::read_field(&case.root, "0", "U", &opts).unwrap();
    let plain_mesh = foamfile::read_mesh(&case.root, &opts).unwrap();

    BlockCase::compress(&case.root.join("0").join("U"));
    let points = case.root.join("constant").join("polyMesh").join("points");
    BlockCase::compress(&points);

    let compressed = foamfile::read_field(&case.root, "0", "U", &opts).unwrap();
    assert_eq!(plain, compressed);
    assert_eq!(plain_mesh, foamfile::read_mesh(&case.root, &opts).unwrap());

    let file = foamfile::FoamFile::open(&points).unwrap();
    assert!(file.is_compressed());
    assert!(file.path().to_string_lossy().ends_with(".gz"));
}

#[test]
fn boundary_values() {
    for binary in [false, true] {
        let case = BlockCase::write("boundary", SHAPE, binary);
        write_fields(&case);
        let opts = ReadOptions::default();

        let right = foamfile::read_boundary_field(&case.root, "0", "alpha", "right", &opts).unwrap();
        assert!(right.uniform);
        assert_eq!(right.values, vec![1.0]);

        let top = foamfile::read_boundary_field(&case.root, "0", "alpha", "top", &opts).unwrap();
        assert!(!top.uniform);
        assert_eq!(top.element_count, case.patches[3].1);
        assert_eq!(top.values[1], 0.5);

        let inlet = foamfile::read_boundary_field(&case.root, "0", "U", "left", &opts).unwrap();
        assert_eq!(inlet.values, vec![1.0, 0.0, 0.0]);
    }
}

#[test]
fn missing_patch_value_falls_back_to_owner_cells() {
    let case = BlockCase::write("fallback", SHAPE, false);
    write_fields(&case);
    let opts = ReadOptions::default();

    let alpha = foamfile::read_field(&case.root, "0", "alpha", &opts).unwrap();
    let left = foamfile::read_boundary_field(&case.root, "0", "alpha", "left", &opts).unwrap();

    let owners = &case.patch_owners[0];
    let expected: Vec<f64> = owners.iter().map(|&cell| alpha.values[cell]).collect();
    assert_eq!(left.values, expected);
    assert_eq!(left.element_count, owners.len());
    assert!(!left.uniform);

    // cells at i = 0 have block indices that are multiples of nx
    assert!(left.values.iter().all(|v| *v as usize % case.nx == 0));

    let u = foamfile::read_boundary_field(&case.root, "0", "U", "right", &opts).unwrap();
    assert_eq!(u.values.len(), 3 * case.patch_owners[1].len());
    assert_eq!(u.values[0] * 10.0, u.values[1]);

    let err = foamfile::read_boundary_field(&case.root, "0", "alpha", "outlet", &opts).unwrap_err();
    assert!(matches!(err, Error::Mesh(_)));
}

#[test]
fn structured_scalar_field() {
    for binary in [false, true] {
        let case = BlockCase::write("structured", SHAPE, binary);
        write_fields(&case);
        let opts = ReadOptions::default();

        let alpha: ndarray::Array3<f64> = foamfile::read_structured_field(&case.root, "0", "alpha", &opts).unwrap();
        assert_eq!(alpha.dim(), SHAPE);

        for ((i, j, k), value) in alpha.indexed_iter() {
            assert_eq!(*value, case.block_index(i, j, k) as f64);
        }

        let wrapped: Scalar3D = foamfile::read_structured_field(&case.root, "0", "alpha", &opts).unwrap();
        assert_eq!(*wrapped, alpha);

        let row_major = ReadOptionsBuilder::default().order(Order::RowMajor).build().unwrap();
        let flat: ndarray::Array3<f64> =
            foamfile::read_structured_field(&case.root, "0", "alpha", &row_major).unwrap();
        // C order reshape of the block ordered buffer
        let values: Vec<f64> = flat.iter().copied().collect();
        assert_eq!(values, (0..case.cells()).map(|v| v as f64).collect::<Vec<_>>());
    }
}

#[test]
fn structured_vector_field() {
    let case = BlockCase::write("structured-vector", SHAPE, true);
    write_fields(&case);
    let opts = ReadOptions::default();

    let u: Tensor3D = foamfile::read_structured_field(&case.root, "0", "U", &opts).unwrap();
    assert_eq!(u.dim(), (3, SHAPE.0, SHAPE.1, SHAPE.2));

    for i in 0..case.nx {
        for j in 0..case.ny {
            for k in 0..case.nz {
                let b = case.block_index(i, j, k) as f64;
                assert_eq!(u[[0, i, j, k]], b);
                assert_eq!(u[[1, i, j, k]], 10.0 * b);
                assert_eq!(u[[2, i, j, k]], 100.0 * b);
            }
        }
    }

    assert_eq!(u.component(2)[[2, 1, 1]], 100.0 * case.block_index(2, 1, 1) as f64);
}

#[test]
fn structured_mesh_centres() {
    let case = BlockCase::write("centres", SHAPE, false);
    let opts = ReadOptionsBuilder::default().structured(true).build().unwrap();

    let centres = foamfile::read_mesh(&case.root, &opts).unwrap();
    let grid = centres.grid.as_ref().unwrap();
    assert_eq!(grid.shape(), SHAPE);

    let (x, y, z): (ndarray::Array3<f64>, _, _) = centres.reshape(Order::ColumnMajor).unwrap().unwrap();
    for ((i, j, k), value) in x.indexed_iter() {
        assert_eq!(*value, i as f64 + 0.5);
        assert_eq!(y[[i, j, k]], j as f64 + 0.5);
        assert_eq!(z[[i, j, k]], k as f64 + 0.5);
    }

    // block order undoes the reversed cell numbering
    assert_eq!(centres.cells.first(), Some(&(case.cells() - 1)));
    assert_eq!(centres.cells.last(), Some(&0));

    let unstructured = foamfile::read_mesh(&case.root, &ReadOptions::default()).unwrap();
    assert!(unstructured.reshape::<ndarray::Array3<f64>>(Order::ColumnMajor).is_none());
}

#[test]
fn bounding_box_selection() {
    let case = BlockCase::write("bounds", SHAPE, false);
    write_fields(&case);

    let opts = ReadOptionsBuilder::default()
        .bounds(BoundingBox::new([0.0, 0.0, 0.0], [1.0, 10.0, 10.0]))
        .build()
        .unwrap();

    let centres = foamfile::read_mesh(&case.root, &opts).unwrap();
    assert_eq!(centres.len(), case.ny * case.nz);
    assert!(centres.x.iter().all(|&x| x == 0.5));

    let geometry = foamfile::cell_volumes(&case.root, &opts).unwrap();
    assert_eq!(geometry.len(), case.ny * case.nz);
    assert_eq!(geometry.cells, centres.cells);

    let alpha: ndarray::Array3<f64> = foamfile::read_structured_field(&case.root, "0", "alpha", &opts).unwrap();
    assert_eq!(alpha.dim(), (1, case.ny, case.nz));
    assert_eq!(alpha[[0, 1, 1]], case.block_index(0, 1, 1) as f64);
}

#[test]
fn cell_volumes_of_unit_cubes() {
    let case = BlockCase::write("volumes", SHAPE, true);

    let geometry = foamfile::cell_volumes(&case.root, &ReadOptions::default()).unwrap();
    assert_eq!(geometry.len(), case.cells());
    assert!(geometry.volumes.iter().all(|v| (v - 1.0).abs() < 1e-12));
    assert!((geometry.total_volume() - case.cells() as f64).abs() < 1e-9);

    let cell = case.cell(2, 1, 0);
    assert_eq!(geometry.centroids[cell], [2.5, 1.5, 0.5]);
}

#[test]
fn time_step_batch() {
    let case = BlockCase::write("batch", SHAPE, false);
    write_fields(&case);
    BlockCase::compress(&case.root.join("0").join("sigma"));
    std::fs::write(case.root.join("0").join("broken"), "FoamFile { format ascii; class volScalarField;").unwrap();
    std::fs::create_dir_all(case.root.join("0").join("uniform")).unwrap();

    let fields = Case::new(&case.root).read_time_step("0", &ReadOptions::default()).unwrap();

    let names: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Taus", "U", "alpha", "broken", "sigma"]);

    assert_eq!(fields["U"].as_ref().unwrap().kind, FieldKind::Vector);
    assert_eq!(fields["sigma"].as_ref().unwrap().element_count, case.cells());
    assert!(matches!(
        fields["broken"],
        Err(Error::Read {
            source: ParseError::Syntax(_),
            ..
        })
    ));
}

#[test]
fn missing_files() {
    let case = BlockCase::write("missing", SHAPE, false);
    write_fields(&case);
    let opts = ReadOptions::default();

    let err = foamfile::read_field(&case.root, "0", "p", &opts).unwrap_err();
    assert!(matches!(err, Error::MissingFile { .. }));

    let err = foamfile::read_field(&case.root, "5", "alpha", &opts).unwrap_err();
    assert!(matches!(err, Error::MissingFile { .. }));
}
