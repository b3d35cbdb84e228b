//! Writes small block meshes and fields to a scratch directory, in ascii or
//! binary format.
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const PATCHES: [&str; 6] = ["left", "right", "bottom", "top", "back", "front"];

/// value written for one patch of a field
pub enum PatchValue {
    /// `zeroGradient`, no `value` entry
    Missing,
    /// `fixedValue` with `value uniform <text>`
    Uniform(&'static str),
    /// `fixedValue` with one tuple per face
    NonUniform(Vec<f64>),
}

/// An `nx * ny * nz` block of unit cubes.
///
/// Cells are numbered in reverse block order (`x` fastest), so that reading
/// the mesh as a structured block has a non trivial permutation to undo.
pub struct BlockCase {
    pub root: PathBuf,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub binary: bool,
    /// binary payloads as `f32` scalars and `i64` labels (`arch "LSB;label=64;scalar=32"`)
    pub single: bool,
    /// the faces of every patch in `PATCHES` order, as (first face, face count)
    pub patches: Vec<(usize, usize)>,
    /// owner cell of every boundary face, in face order, per patch
    pub patch_owners: Vec<Vec<usize>>,
}

impl BlockCase {
    pub fn write(name: &str, shape: (usize, usize, usize), binary: bool) -> Self {
        Self::create(name, shape, binary, false)
    }

    /// a binary case written with single precision scalars and 64 bit labels
    pub fn write_single(name: &str, shape: (usize, usize, usize)) -> Self {
        Self::create(name, shape, true, true)
    }

    fn create(name: &str, (nx, ny, nz): (usize, usize, usize), binary: bool, single: bool) -> Self {
        let format = match (binary, single) {
            (true, true) => "single",
            (true, false) => "binary",
            _ => "ascii",
        };
        let root = std::env::temp_dir().join(format!("foamfile-{name}-{format}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("constant").join("polyMesh")).unwrap();

        let mut case = Self {
            root,
            nx,
            ny,
            nz,
            binary,
            single,
            patches: Vec::new(),
            patch_owners: Vec::new(),
        };
        case.write_mesh();
        case
    }

    pub fn cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// position of a cell in block order
    pub fn block_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.nx * (j + self.ny * k)
    }

    /// label of the cell at block position `(i, j, k)`
    pub fn cell(&self, i: usize, j: usize, k: usize) -> usize {
        self.cells() - 1 - self.block_index(i, j, k)
    }

    fn point(&self, i: usize, j: usize, k: usize) -> usize {
        i + (self.nx + 1) * (j + (self.ny + 1) * k)
    }

    fn write_mesh(&mut self) {
        let (nx, ny, nz) = (self.nx, self.ny, self.nz);

        let mut points = Vec::new();
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    points.extend([i as f64, j as f64, k as f64]);
                }
            }
        }

        let mut faces: Vec<[usize; 4]> = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour = Vec::new();

        let mut internal = |face: [usize; 4], a: usize, b: usize| {
            faces.push(face);
            owner.push(a.min(b));
            neighbour.push(a.max(b));
        };

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    if i > 0 {
                        let face = [
                            self.point(i, j, k),
                            self.point(i, j + 1, k),
                            self.point(i, j + 1, k + 1),
                            self.point(i, j, k + 1),
                        ];
                        internal(face, self.cell(i - 1, j, k), self.cell(i, j, k));
                    }
                    if j > 0 {
                        let face = [
                            self.point(i, j, k),
                            self.point(i, j, k + 1),
                            self.point(i + 1, j, k + 1),
                            self.point(i + 1, j, k),
                        ];
                        internal(face, self.cell(i, j - 1, k), self.cell(i, j, k));
                    }
                    if k > 0 {
                        let face = [
                            self.point(i, j, k),
                            self.point(i + 1, j, k),
                            self.point(i + 1, j + 1, k),
                            self.point(i, j + 1, k),
                        ];
                        internal(face, self.cell(i, j, k - 1), self.cell(i, j, k));
                    }
                }
            }
        }

        // boundary faces, one patch per side of the block
        let sides = [
            self.x_side(0, 0),
            self.x_side(nx, nx - 1),
            self.y_side(0, 0),
            self.y_side(ny, ny - 1),
            self.z_side(0, 0),
            self.z_side(nz, nz - 1),
        ];

        for side_faces in sides {
            self.patches.push((faces.len(), side_faces.len()));
            self.patch_owners.push(side_faces.iter().map(|(_, cell)| *cell).collect());
            for (face, cell) in side_faces {
                faces.push(face);
                owner.push(cell);
            }
        }

        let n_internal = neighbour.len();
        let note = format!(
            "nPoints:{} nCells:{} nFaces:{} nInternalFaces:{n_internal}",
            points.len() / 3,
            self.cells(),
            faces.len()
        );

        let dir = self.root.join("constant").join("polyMesh");
        self.write_file(&dir.join("points"), "vectorField", "points", &self.scalar_list(&points, 3), "");
        self.write_file(&dir.join("owner"), "labelList", "owner", &self.label_list(&owner), &note);
        self.write_file(&dir.join("neighbour"), "labelList", "neighbour", &self.label_list(&neighbour), &note);

        if self.binary {
            let offsets: Vec<usize> = (0..=faces.len()).map(|face| 4 * face).collect();
            let flat: Vec<usize> = faces.iter().flatten().copied().collect();
            let mut body = self.label_list(&offsets);
            body.extend_from_slice(b"\n\n");
            body.extend(self.label_list(&flat));
            self.write_file(&dir.join("faces"), "faceCompactList", "faces", &body, "");
        } else {
            let mut body = format!("{}\n(\n", faces.len());
            for face in &faces {
                body += &format!("4({} {} {} {})\n", face[0], face[1], face[2], face[3]);
            }
            body += ")\n";
            self.write_file(&dir.join("faces"), "faceList", "faces", body.as_bytes(), "");
        }

        let mut boundary = format!("{}\n(\n", PATCHES.len());
        for (name, (start, count)) in PATCHES.iter().zip(&self.patches) {
            let patch_type = if *name == "left" || *name == "right" { "patch" } else { "wall" };
            boundary += &format!(
                "    {name}\n    {{\n        type            {patch_type};\n        \
                 nFaces          {count};\n        startFace       {start};\n    }}\n"
            );
        }
        boundary += ")\n";
        self.write_file(&dir.join("boundary"), "polyBoundaryMesh", "boundary", boundary.as_bytes(), "");
    }

    fn x_side(&self, i: usize, cell_i: usize) -> Vec<([usize; 4], usize)> {
        let mut faces = Vec::new();
        for k in 0..self.nz {
            for j in 0..self.ny {
                let face = [
                    self.point(i, j, k),
                    self.point(i, j, k + 1),
                    self.point(i, j + 1, k + 1),
                    self.point(i, j + 1, k),
                ];
                faces.push((face, self.cell(cell_i, j, k)));
            }
        }
        faces
    }

    fn y_side(&self, j: usize, cell_j: usize) -> Vec<([usize; 4], usize)> {
        let mut faces = Vec::new();
        for k in 0..self.nz {
            for i in 0..self.nx {
                let face = [
                    self.point(i, j, k),
                    self.point(i + 1, j, k),
                    self.point(i + 1, j, k + 1),
                    self.point(i, j, k + 1),
                ];
                faces.push((face, self.cell(i, cell_j, k)));
            }
        }
        faces
    }

    fn z_side(&self, k: usize, cell_k: usize) -> Vec<([usize; 4], usize)> {
        let mut faces = Vec::new();
        for j in 0..self.ny {
            for i in 0..self.nx {
                let face = [
                    self.point(i, j, k),
                    self.point(i, j + 1, k),
                    self.point(i + 1, j + 1, k),
                    self.point(i + 1, j, k),
                ];
                faces.push((face, self.cell(i, j, cell_k)));
            }
        }
        faces
    }

    fn header(&self, class: &str, object: &str, note: &str) -> String {
        let format = if self.binary { "binary" } else { "ascii" };
        let arch = if self.single {
            "LSB;label=64;scalar=32"
        } else {
            "LSB;label=32;scalar=64"
        };
        let note = if note.is_empty() {
            String::new()
        } else {
            format!("    note        \"{note}\";\n")
        };
        format!(
            "FoamFile\n{{\n    version     2.0;\n    format      {format};\n    \
             arch        \"{arch}\";\n    class       {class};\n{note}    \
             object      {object};\n}}\n\n"
        )
    }

    fn write_file(&self, path: &Path, class: &str, object: &str, body: &[u8], note: &str) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(self.header(class, object, note).as_bytes()).unwrap();
        file.write_all(body).unwrap();
    }

    /// `N(...)` of scalar tuples, without a leading `List<T>` tag
    pub fn scalar_list(&self, values: &[f64], arity: usize) -> Vec<u8> {
        let count = values.len() / arity;

        if self.binary {
            let mut out = format!("{count}(").into_bytes();
            for &value in values {
                if self.single {
                    out.extend_from_slice(&(value as f32).to_ne_bytes());
                } else {
                    out.extend_from_slice(&value.to_ne_bytes());
                }
            }
            out.push(b')');
            out
        } else {
            let mut out = format!("{count}\n(\n");
            for tuple in values.chunks(arity) {
                let text: Vec<String> = tuple.iter().map(|v| format!("{v:?}")).collect();
                if arity == 1 {
                    out += &format!("{}\n", text[0]);
                } else {
                    out += &format!("({})\n", text.join(" "));
                }
            }
            out += ")";
            out.into_bytes()
        }
    }

    fn label_list(&self, values: &[usize]) -> Vec<u8> {
        if self.binary {
            let mut out = format!("{}(", values.len()).into_bytes();
            for &value in values {
                if self.single {
                    out.extend_from_slice(&(value as i64).to_ne_bytes());
                } else {
                    out.extend_from_slice(&(value as i32).to_ne_bytes());
                }
            }
            out.push(b')');
            out
        } else {
            let mut out = format!("{}\n(\n", values.len());
            for value in values {
                out += &format!("{value}\n");
            }
            out += ")";
            out.into_bytes()
        }
    }

    /// Write a cell field, one `arity`-tuple per cell label in `values`.
    pub fn write_field(
        &self,
        time: &str,
        name: &str,
        class: &str,
        tag: &str,
        arity: usize,
        values: &[f64],
        patches: &[PatchValue],
    ) -> PathBuf {
        let dir = self.root.join(time);
        fs::create_dir_all(&dir).unwrap();

        let mut body = b"dimensions      [0 1 -1 0 0 0 0];\n\ninternalField   nonuniform ".to_vec();
        body.extend(format!("List<{tag}> ").into_bytes());
        body.extend(self.scalar_list(values, arity));
        body.extend_from_slice(b";\n\nboundaryField\n{\n");

        for (patch, value) in PATCHES.iter().zip(patches) {
            body.extend(format!("    {patch}\n    {{\n").into_bytes());
            match value {
                PatchValue::Missing => body.extend_from_slice(b"        type            zeroGradient;\n"),
                PatchValue::Uniform(text) => body.extend(
                    format!("        type            fixedValue;\n        value           uniform {text};\n")
                        .into_bytes(),
                ),
                PatchValue::NonUniform(values) => {
                    body.extend_from_slice(b"        type            fixedValue;\n        value           nonuniform ");
                    body.extend(format!("List<{tag}> ").into_bytes());
                    body.extend(self.scalar_list(values, arity));
                    body.extend_from_slice(b";\n");
                }
            }
            body.extend_from_slice(b"    }\n");
        }
        body.extend_from_slice(b"}\n");

        let path = dir.join(name);
        self.write_file(&path, class, name, &body, "");
        path
    }

    /// replace `path` by a gzip compressed `path.gz`
    pub fn compress(path: &Path) -> PathBuf {
        let content = fs::read(path).unwrap();
        let target = PathBuf::from(format!("{}.gz", path.display()));

        let file = fs::File::create(&target).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(&content).unwrap();
        encoder.finish().unwrap();

        fs::remove_file(path).unwrap();
        target
    }
}

impl Drop for BlockCase {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
