use super::dictionary::Dictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How the bulk lists of a file are stored
pub enum Format {
    /// whitespace separated text
    #[default]
    Ascii,
    /// packed native-endian numbers between the list parentheses
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Storage information taken from the `format` and `arch` entries of a `FoamFile` header.
///
/// Files without a header are ascii with 32 bit labels and 64 bit scalars.
pub struct Encoding {
    pub format: Format,
    /// size of a floating point scalar in bytes
    pub scalar_bytes: usize,
    /// size of an integer label in bytes
    pub label_bytes: usize,
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            format: Format::Ascii,
            scalar_bytes: 8,
            label_bytes: 4,
        }
    }
}

impl Encoding {
    /// read the encoding out of a parsed `FoamFile` header
    pub fn from_header(header: &Dictionary) -> Self {
        let format = match header.word("format") {
            Some("binary") => Format::Binary,
            _ => Format::Ascii,
        };

        let arch = header.word("arch").unwrap_or_default();

        // the arch string looks like `LSB;label=32;scalar=64`
        let scalar_bytes = if arch.contains("scalar=32") { 4 } else { 8 };
        let label_bytes = if arch.contains("label=64") { 8 } else { 4 };

        Self {
            format,
            scalar_bytes,
            label_bytes,
        }
    }

    pub fn is_ascii(&self) -> bool {
        self.format == Format::Ascii
    }

    pub fn is_binary(&self) -> bool {
        self.format == Format::Binary
    }

    pub fn is_single_precision(&self) -> bool {
        self.scalar_bytes == 4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The element type of a list, as far as its binary width is concerned.
pub enum Element {
    /// a tuple of `n` floating point scalars
    Scalars(usize),
    /// a single integer label
    Label,
}

impl Element {
    /// width in bytes of one element in binary storage
    pub fn width(&self, encoding: &Encoding) -> usize {
        match self {
            Element::Scalars(n) => n * encoding.scalar_bytes,
            Element::Label => encoding.label_bytes,
        }
    }

    /// Element type for a `List<T>` type tag.
    ///
    /// Only contiguous types are stored as raw bytes; anything else (words,
    /// nested lists) is written as tokens even in binary files.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let inner = tag.strip_prefix("List<")?.strip_suffix('>')?;

        let element = match inner {
            "scalar" | "sphericalTensor" => Element::Scalars(1),
            "vector2D" => Element::Scalars(2),
            "vector" => Element::Scalars(3),
            "symmTensor" => Element::Scalars(6),
            "tensor" => Element::Scalars(9),
            "label" => Element::Label,
            _ => return None,
        };

        Some(element)
    }

    /// Element type of the bare top level lists of a file with the given header `class`
    pub fn from_class(class: &str) -> Option<Self> {
        let element = match class {
            "scalarField" => Element::Scalars(1),
            "vectorField" | "pointField" => Element::Scalars(3),
            "symmTensorField" => Element::Scalars(6),
            "tensorField" => Element::Scalars(9),
            "labelList" | "faceCompactList" => Element::Label,
            _ => return None,
        };

        Some(element)
    }
}
