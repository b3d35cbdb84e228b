use crate::prelude::*;

/// Cell indices read from an `owner` or `neighbour` file.
///
/// Some writers put negative sentinel labels into these lists. They are removed
/// once, right after decoding, and every retained entry remembers the index of
/// the face it was written for, so face lookups stay valid after filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellLabels {
    cells: Vec<usize>,
    faces: Vec<usize>,
    /// length of the list before filtering
    declared: usize,
}

impl CellLabels {
    /// filter the negative sentinels out of a decoded label list
    pub fn from_labels(labels: Vec<i64>) -> Self {
        let declared = labels.len();
        let mut cells = Vec::with_capacity(declared);
        let mut faces = Vec::with_capacity(declared);

        for (face, label) in labels.into_iter().enumerate() {
            if let Ok(cell) = usize::try_from(label) {
                cells.push(cell);
                faces.push(face);
            }
        }

        if cells.len() != declared {
            log::debug!(
                "dropped {} negative labels out of {declared}",
                declared - cells.len()
            );
        }

        Self {
            cells,
            faces,
            declared,
        }
    }

    /// number of retained entries
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// number of entries in the file, sentinels included
    pub fn declared_len(&self) -> usize {
        self.declared
    }

    /// retained cell indices, in file order
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// `(face, cell)` pairs of the retained entries
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.faces.iter().copied().zip(self.cells.iter().copied())
    }

    /// the cell written for `face`, if the face has a (non-sentinel) entry
    pub fn cell_of(&self, face: usize) -> Option<usize> {
        // faces are strictly increasing
        self.faces
            .binary_search(&face)
            .ok()
            .map(|position| self.cells[position])
    }

    /// `max(cell) + 1`, or zero for an empty list
    pub fn cell_count(&self) -> usize {
        self.cells.iter().max().map_or(0, |max| max + 1)
    }

    /// the highest face index referenced
    pub(crate) fn last_face(&self) -> Option<usize> {
        self.faces.last().copied()
    }
}

/// read an `owner` or `neighbour` file
pub(crate) fn read_labels(path: &Path) -> Result<CellLabels, Error> {
    let file = parse::FoamFile::open(path)?;
    let labels = file.bare_labels()?;
    Ok(CellLabels::from_labels(labels))
}
