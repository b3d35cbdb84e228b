use crate::prelude::*;

use super::token_summary::TokenSummary;

/// Everything that can go wrong while turning the bytes of a single file into
/// decoded data. None of these are recoverable for the file being read, but
/// they never affect other files.
#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(Syntax),
    #[error("{0}")]
    MissingHeaderKey(MissingHeaderKey),
    #[error("{0}")]
    UnsupportedEncoding(UnsupportedEncoding),
    #[error("{0}")]
    TruncatedPayload(TruncatedPayload),
    #[error("{0}")]
    UnknownFieldType(UnknownFieldType),
    #[error("{0}")]
    InvalidNumber(InvalidNumber),
    #[error("{0}")]
    MalformedList(MalformedList),
    #[error("{0}")]
    MissingPayload(MissingPayload),
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "unexpected token at byte {offset}. Expected {expected}, got {found}")]
pub struct Syntax {
    offset: usize,
    expected: String,
    found: TokenSummary,
}

impl Syntax {
    pub(crate) fn expected<T: Into<String>>(offset: usize, expected: T, found: TokenSummary) -> Self {
        Self::new(offset, expected.into(), found)
    }

    /// byte offset in the (decompressed) file where the error was detected
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "missing key `{key}` in `{block}` dictionary")]
pub struct MissingHeaderKey {
    pub block: String,
    pub key: String,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "`{entry}` is defined through `{directive}` which cannot be decoded")]
pub struct UnsupportedEncoding {
    pub entry: String,
    pub directive: String,
}

#[derive(Display, Debug, Clone, PartialEq)]
/// The payload does not hold the amount of data its count declares.
pub enum TruncatedPayload {
    #[display(fmt = "payload declares {declared} {unit} but only {available} are available")]
    Short {
        declared: usize,
        available: usize,
        unit: &'static str,
    },
    #[display(fmt = "payload declares {declared} {unit} but holds {available}")]
    Mismatch {
        declared: usize,
        available: usize,
        unit: &'static str,
    },
    #[display(fmt = "binary payload of {declared} bytes is not closed by `)` at byte {offset}")]
    Unterminated { declared: usize, offset: usize },
}

impl TruncatedPayload {
    /// compare a declared amount of data with what was actually found
    pub(crate) fn check(declared: usize, available: usize, unit: &'static str) -> Result<(), Self> {
        if available < declared {
            Err(Self::Short {
                declared,
                available,
                unit,
            })
        } else if available > declared {
            Err(Self::Mismatch {
                declared,
                available,
                unit,
            })
        } else {
            Ok(())
        }
    }
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "`{tag}` does not describe a scalar, vector, symmTensor or tensor field")]
pub struct UnknownFieldType {
    pub tag: String,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "`{token}` could not be parsed as a {expected}")]
pub struct InvalidNumber {
    pub token: String,
    pub expected: &'static str,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "malformed {list}: {reason}")]
pub struct MalformedList {
    pub list: &'static str,
    pub reason: String,
}

#[derive(From, Display, Debug, Constructor, Clone, PartialEq)]
#[display(fmt = "no `{entry}` entry and no bare list found in file")]
pub struct MissingPayload {
    pub entry: String,
}
