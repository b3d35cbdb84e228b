//! Locating the numeric payload of a field block and classifying it.
//!
//! The dictionary parser only records where list bodies are. This module looks
//! at the items of an `internalField` entry (or a patch `value` entry) and
//! decides what kind of data they describe, without decoding anything.

use super::dictionary::{Document, Item, ListSpan};
use super::error::{self, ParseError};

/// Maximum number of `$name` references followed before giving up
const MAX_REFERENCE_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The entry of a field file holding the data of interest
pub enum FieldBlock<'a> {
    /// `internalField`, one value per cell
    Internal,
    /// the `value` entry of the named patch in `boundaryField`
    Patch(&'a str),
}

impl<'a> FieldBlock<'a> {
    fn entry_name(&self) -> String {
        match self {
            FieldBlock::Internal => "internalField".into(),
            FieldBlock::Patch(patch) => format!("boundaryField/{patch}/value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The single value of a `uniform` entry
pub enum Uniform {
    /// `uniform 0`
    Word(String),
    /// `uniform (1 0 0)`
    Tuple(ListSpan),
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of locating a payload
pub enum Payload {
    Uniform(Uniform),
    NonUniform {
        /// `List<T>` tag in front of the list, if any
        tag: Option<String>,
        list: ListSpan,
    },
    /// data generated by a `#codeStream` directive
    CodeStream,
    /// the patch exists but has no `value` entry, or the patch is absent
    Missing,
}

impl Payload {
    pub fn is_uniform(&self) -> bool {
        matches!(self, Payload::Uniform(_))
    }

    /// the `List<T>` tag of a non-uniform payload
    pub fn tag(&self) -> Option<&str> {
        match self {
            Payload::NonUniform { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }
}

/// find and classify the payload of `block` in a parsed file
pub fn locate(document: &Document, block: FieldBlock<'_>) -> Result<Payload, ParseError> {
    let entry_name = block.entry_name();

    let items = match block {
        FieldBlock::Internal => match document.entries.get("internalField") {
            Some(entry) => entry.items(),
            None => {
                // `*Field` class files and legacy files are a single bare list
                return match document.lists.first() {
                    Some(list) => Ok(Payload::NonUniform {
                        tag: None,
                        list: list.clone(),
                    }),
                    None => Err(error::MissingPayload::new(entry_name).into()),
                };
            }
        },
        FieldBlock::Patch(patch) => {
            let value = document
                .entries
                .dict("boundaryField")
                .and_then(|boundary| boundary.dict(patch))
                .and_then(|patch| patch.get("value"));

            match value {
                Some(entry) => entry.items(),
                None => return Ok(Payload::Missing),
            }
        }
    };

    let items = items.ok_or_else(|| {
        error::MalformedList::new("field payload", format!("`{entry_name}` is a dictionary"))
    })?;

    classify(document, &entry_name, items, 0)
}

fn classify(
    document: &Document,
    entry_name: &str,
    items: &[Item],
    depth: usize,
) -> Result<Payload, ParseError> {
    let malformed =
        |reason: String| -> ParseError { error::MalformedList::new("field payload", reason).into() };

    match items {
        [Item::Word(kw), value, ..] if kw == "uniform" => match value {
            Item::Word(word) => Ok(Payload::Uniform(Uniform::Word(word.clone()))),
            Item::List(list) => Ok(Payload::Uniform(Uniform::Tuple(list.clone()))),
            _ => Err(malformed(format!("`{entry_name}` has no value after `uniform`"))),
        },
        [Item::Word(kw), Item::Word(tag), Item::List(list), ..] if kw == "nonuniform" => {
            Ok(Payload::NonUniform {
                tag: Some(tag.clone()),
                list: list.clone(),
            })
        }
        [Item::Word(kw), Item::List(list), ..] if kw == "nonuniform" => Ok(Payload::NonUniform {
            tag: None,
            list: list.clone(),
        }),
        [Item::Word(directive), ..] if directive == "#codeStream" => Ok(Payload::CodeStream),
        [Item::Word(reference)] if reference.starts_with('$') => {
            if depth >= MAX_REFERENCE_DEPTH {
                return Err(malformed(format!("`{entry_name}` references nest too deeply")));
            }

            let target = reference.trim_start_matches('$');
            log::debug!("`{entry_name}` refers to `{target}`");

            let items = document
                .entries
                .get(target)
                .and_then(|entry| entry.items())
                .ok_or_else(|| error::MissingPayload::new(target.to_string()))?;

            classify(document, target, items, depth + 1)
        }
        [Item::List(list)] => Ok(Payload::NonUniform {
            tag: None,
            list: list.clone(),
        }),
        [] => Err(error::MissingPayload::new(entry_name.to_string()).into()),
        [first, ..] => Err(malformed(format!(
            "`{entry_name}` starts with unexpected {first:?}"
        ))),
    }
}
