use super::error::{self, MeshError};
use crate::parse::{Dictionary, Item};
use crate::prelude::*;

/// A named, contiguous range of boundary faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryPatch {
    pub name: String,
    /// `type` entry (`patch`, `wall`, `empty`, `cyclic`, ...)
    pub patch_type: String,
    pub start_face: usize,
    pub face_count: usize,
    pub in_groups: Vec<String>,
}

impl BoundaryPatch {
    /// indices of the faces in this patch
    pub fn faces(&self) -> Range<usize> {
        self.start_face..self.start_face.saturating_add(self.face_count)
    }

    fn from_dict(name: &str, dict: &Dictionary, content: &[u8]) -> Result<Self, ParseError> {
        let block = format!("boundary/{name}");

        let count = |key: &str| -> Result<usize, ParseError> {
            let word = dict.require(&block, key)?;
            word.parse()
                .map_err(|_| parse::error::InvalidNumber::new(word.into(), "face count").into())
        };

        let start_face = count("startFace")?;
        let face_count = count("nFaces")?;

        let patch_type = dict.word("type").unwrap_or("patch").to_string();

        let in_groups = dict
            .get("inGroups")
            .and_then(|entry| entry.items())
            .map(|items| groups(items, content))
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            patch_type,
            start_face,
            face_count,
            in_groups,
        })
    }
}

/// group names of an `inGroups List<word> 1(wall)` entry
fn groups(items: &[Item], content: &[u8]) -> Vec<String> {
    items
        .iter()
        .find_map(|item| match item {
            Item::List(list) => Some(String::from_utf8_lossy(&content[list.body.clone()])),
            _ => None,
        })
        .map(|body| body.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// The patches of a `boundary` file, in file order
pub struct Boundary {
    patches: Vec<BoundaryPatch>,
}

impl Boundary {
    pub fn new(patches: Vec<BoundaryPatch>) -> Self {
        Self { patches }
    }

    /// look up a patch by name
    pub fn patch(&self, name: &str) -> Result<&BoundaryPatch, MeshError> {
        self.patches
            .iter()
            .find(|patch| patch.name == name)
            .ok_or_else(|| {
                let available = self.names().map(str::to_string).collect();
                error::MissingBoundaryPatch::new(name.to_string(), available).into()
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patches.iter().map(|patch| patch.name.as_str())
    }

    pub fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// patches that list `group` in their `inGroups` entry
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a BoundaryPatch> + 'a {
        self.patches
            .iter()
            .filter(move |patch| patch.in_groups.iter().any(|g| g == group))
    }
}

/// read a `polyBoundaryMesh` file
pub(crate) fn read_boundary(path: &Path) -> Result<Boundary, Error> {
    let file = parse::FoamFile::open(path)?;
    let entries = file.bare_dictionary()?;

    let mut patches = Vec::with_capacity(entries.len());

    for (name, entry) in entries.iter() {
        let Some(dict) = entry.as_dict() else {
            log::debug!("skipping non dictionary entry `{name}` in {}", file.path().display());
            continue;
        };

        let patch = BoundaryPatch::from_dict(name, dict, file.content()).map_err(|e| file.error(e))?;
        patches.push(patch);
    }

    Ok(Boundary::new(patches))
}
