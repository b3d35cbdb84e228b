//! # Case layout
//!
//! An OpenFOAM case is a directory holding one sub-directory per written time
//! step (`0`, `0.5`, `100`, ...) and a `constant` directory with the mesh:
//!
//! ```text
//! case/
//! ├── 0/
//! │   ├── U
//! │   └── p.gz
//! ├── 100/
//! │   ├── U
//! │   ├── p
//! │   └── polyMesh/      (only for moving meshes)
//! └── constant/
//!     └── polyMesh/
//!         ├── points
//!         ├── faces
//!         ├── owner
//!         ├── neighbour
//!         └── boundary
//! ```

use crate::prelude::*;
use std::collections::BTreeMap;

/// name accepted by [`Case::resolve_time`] for the last written time step
pub const LATEST_TIME: &str = "latestTime";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    root: PathBuf,
}

impl Case {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the time directories, sorted by their numeric value.
    pub fn time_dirs(&self) -> Result<Vec<String>, Error> {
        let mut times: Vec<(f64, String)> = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            match name.parse::<f64>() {
                Ok(value) if value.is_finite() => times.push((value, name)),
                _ => (),
            }
        }

        times.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(times.into_iter().map(|(_, name)| name).collect())
    }

    /// the time directory with the largest value
    pub fn latest_time(&self) -> Result<String, Error> {
        self.time_dirs()?
            .pop()
            .ok_or_else(|| Error::NoTimeDirectory {
                path: self.root.clone(),
            })
    }

    /// `latestTime` resolves to [`Case::latest_time`], anything else is kept as is
    pub fn resolve_time(&self, time: &str) -> Result<String, Error> {
        if time == LATEST_TIME {
            self.latest_time()
        } else {
            Ok(time.to_string())
        }
    }

    /// `<case>/<time>/<name>`, with `latestTime` resolved
    pub fn field_path(&self, time: &str, name: &str) -> Result<PathBuf, Error> {
        Ok(self.root.join(self.resolve_time(time)?).join(name))
    }

    /// The `polyMesh` directory to read.
    ///
    /// When `opts.mesh_time` is set and `<case>/<mesh_time>/polyMesh` exists,
    /// that directory is used. Otherwise `<case>/constant/polyMesh`.
    pub fn mesh_dir(&self, opts: &ReadOptions) -> Result<PathBuf, Error> {
        if let Some(time) = &opts.mesh_time {
            let dir = self.root.join(self.resolve_time(time)?).join("polyMesh");
            if dir.is_dir() {
                return Ok(dir);
            }
            log::debug!("no mesh in {}, using constant/polyMesh", dir.display());
        }

        Ok(self.root.join("constant").join("polyMesh"))
    }

    /// path of one of the `polyMesh` files
    pub fn mesh_file(&self, name: &str, opts: &ReadOptions) -> Result<PathBuf, Error> {
        Ok(self.mesh_dir(opts)?.join(name))
    }

    /// Read the internal field of every file in a time directory.
    ///
    /// Keys are the file names with any `.gz` suffix removed. Each file is read
    /// on its own: a file that fails to parse gets an `Err` entry and the other
    /// files are still read. Only failing to list the directory is an error.
    pub fn read_time_step(
        &self,
        time: &str,
        opts: &ReadOptions,
    ) -> Result<BTreeMap<String, Result<Field, Error>>, Error> {
        let dir = self.root.join(self.resolve_time(time)?);
        let mut fields = BTreeMap::new();

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let name = file_name.strip_suffix(".gz").unwrap_or(&file_name).to_string();

            let field = parse::FoamFile::open(entry.path()).and_then(|file| Field::internal(&file, opts));

            if let Err(e) = &field {
                log::warn!("skipping `{name}` in {}: {e}", dir.display());
            }

            fields.insert(name, field);
        }

        Ok(fields)
    }
}
