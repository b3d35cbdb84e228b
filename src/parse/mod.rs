//! reading and parsing OpenFOAM files
//!
//! A file is read fully into memory (decompressing `.gz` files on the way),
//! then parsed in three steps:
//!
//! 1. the [`Lexer`](lexer::Lexer) and dictionary parser build a [`Document`] of
//!    top level entries. List bodies are only located, never tokenized. Once the
//!    `FoamFile` header has been read, binary lists are skipped by their exact
//!    byte length.
//! 2. [`payload::locate`] finds the entry holding the data of interest and
//!    classifies it as uniform, non-uniform, `#codeStream` or missing.
//! 3. the [`decode`] functions turn a located list body into numbers.
//!
//! most of the time you will not need to interact with this module directly,
//! the readers in [`field`](crate::field) and [`mesh`](crate::mesh) drive it.

pub mod decode;
mod dictionary;
mod encoding;
pub mod error;
mod lexer;
pub mod payload;
mod token_summary;

pub use dictionary::{header_block, Dictionary, Document, Entry, Item, ListSpan};
pub use encoding::{Element, Encoding, Format};
pub use error::ParseError;
pub use payload::{FieldBlock, Payload, Uniform};
pub use token_summary::TokenSummary;

pub(crate) use dictionary::Parser;
pub(crate) use lexer::Lexer;

use crate::prelude::*;

use flate2::read::GzDecoder;
use std::io::Read;

/// A single OpenFOAM file, read into memory and parsed
#[derive(Debug, Clone)]
pub struct FoamFile {
    path: PathBuf,
    content: Vec<u8>,
    document: Document,
    compressed: bool,
}

impl FoamFile {
    /// Read and parse the file at `path`.
    ///
    /// If `path` does not exist but `path.gz` does, the compressed file is read
    /// instead. Files ending in `.gz` are always decompressed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = resolve_path(path.as_ref())?;
        let compressed = path.extension().map_or(false, |ext| ext == "gz");

        log::info!("reading file {}", path.display());

        let content = read_content(&path, compressed)?;

        Self::from_content(path, content, compressed)
    }

    /// parse a file that is already in memory
    pub fn from_bytes<P: Into<PathBuf>>(path: P, content: Vec<u8>) -> Result<Self, Error> {
        Self::from_content(path.into(), content, false)
    }

    fn from_content(path: PathBuf, content: Vec<u8>, compressed: bool) -> Result<Self, Error> {
        let document = match Document::parse(&content) {
            Ok(document) => document,
            Err(e) => return Err(Error::read(path, e)),
        };

        Ok(Self {
            path,
            content,
            document,
            compressed,
        })
    }

    /// the path that was actually read, including a `.gz` suffix if it was added
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// decompressed contents of the file
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// the `FoamFile` header, or an empty dictionary for header-less files
    pub fn header(&self) -> Dictionary {
        self.document.block("FoamFile")
    }

    /// the `class` entry of the header
    pub fn class(&self) -> Option<&str> {
        self.document.header()?.word("class")
    }

    pub fn encoding(&self) -> &Encoding {
        &self.document.encoding
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// find and classify the payload of a field block
    pub fn payload(&self, block: FieldBlock<'_>) -> Result<Payload, Error> {
        payload::locate(&self.document, block).map_err(|e| self.error(e))
    }

    /// attach this file's path to a parse error
    pub(crate) fn error(&self, source: ParseError) -> Error {
        Error::read(self.path.clone(), source)
    }

    /// decode the bare top level list of scalar tuples of a `*Field` class file
    pub(crate) fn bare_scalars(&self, arity: usize, precision: i32) -> Result<Vec<f64>, Error> {
        let list = self
            .document
            .lists
            .first()
            .ok_or_else(|| self.error(error::MissingPayload::new("list".into()).into()))?;

        decode::decode_scalars(&self.content, list, arity, self.encoding(), precision)
            .map_err(|e| self.error(e))
    }

    /// decode the bare top level label list of a `labelList` class file
    pub(crate) fn bare_labels(&self) -> Result<Vec<i64>, Error> {
        let list = self
            .document
            .lists
            .first()
            .ok_or_else(|| self.error(error::MissingPayload::new("list".into()).into()))?;

        decode::decode_labels(&self.content, list, self.encoding()).map_err(|e| self.error(e))
    }

    /// parse the body of the bare top level list as a sequence of dictionaries
    pub(crate) fn bare_dictionary(&self) -> Result<Dictionary, Error> {
        let Some(list) = self.document.lists.first() else {
            return Ok(Dictionary::default());
        };

        let lexer = Lexer::with_range(&self.content, list.body.clone());
        Parser::new(lexer, self.document.encoding)
            .dictionary()
            .map_err(|e| self.error(e))
    }
}

/// `path` itself if it exists, otherwise `path.gz`
fn resolve_path(path: &Path) -> Result<PathBuf, Error> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let mut gz = path.as_os_str().to_owned();
    gz.push(".gz");
    let gz = PathBuf::from(gz);

    if gz.is_file() {
        log::debug!("{} not found, using {}", path.display(), gz.display());
        Ok(gz)
    } else {
        Err(Error::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

fn read_content(path: &Path, compressed: bool) -> Result<Vec<u8>, Error> {
    let file = std::fs::File::open(path)?;
    let mut content = Vec::new();

    if compressed {
        // the decoder (and the file it owns) is dropped on every return path
        GzDecoder::new(file).read_to_end(&mut content)?;
    } else {
        std::io::BufReader::new(file).read_to_end(&mut content)?;
    }

    Ok(content)
}
