//! recursive descent parser for the OpenFOAM dictionary language
//!
//! ```text
//! document := statement*
//! statement := key '{' dictionary '}'
//!            | key item* ';'
//!            | [count] '(' list body ')'        (bare lists of mesh files)
//!            | '#'directive argument
//! item     := word | string | '[' word* ']' | list | '{' dictionary '}'
//! list     := [count] '(' body ')' | count '{' value '}'
//! ```
//!
//! List bodies are never tokenized here. Their byte range is recorded in a
//! [`ListSpan`] and decoded later, once the caller knows what the list holds.

use super::encoding::{Element, Encoding, Format};
use super::error::{self, ParseError};
use super::lexer::{Lexer, Token};
use super::token_summary::TokenSummary;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Default)]
/// Ordered key / entry mapping of a `{ ... }` block
pub struct Dictionary {
    entries: Vec<(String, Entry)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `key { ... }`
    Dict(Dictionary),
    /// `key item item ... ;`
    Value(Vec<Item>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Word(String),
    Str(String),
    /// `[0 1 -1 0 0 0 0]`
    Bracket(Vec<String>),
    List(ListSpan),
    /// inline dictionary, as used by `#codeStream { ... }`
    Dict(Dictionary),
    /// `#{ ... #}`
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Location of a list body inside the file content
pub struct ListSpan {
    /// explicit element count written before the list, if any
    pub count: Option<usize>,
    /// byte range strictly between the opening and closing bracket
    pub body: Range<usize>,
    /// `Binary` only when the body was consumed as raw bytes
    pub format: Format,
    /// `N{value}` lists repeat their single body `N` times
    pub repeated: bool,
}

impl ListSpan {
    pub fn is_binary(&self) -> bool {
        self.format == Format::Binary
    }
}

impl Entry {
    /// the items of a value entry
    pub fn items(&self) -> Option<&[Item]> {
        match self {
            Entry::Value(items) => Some(items),
            Entry::Dict(_) => None,
        }
    }

    /// the first item of a value entry as text, if it is a word or a string
    pub fn as_word(&self) -> Option<&str> {
        match self.items()?.first()? {
            Item::Word(word) | Item::Str(word) => Some(word),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Entry::Dict(dict) => Some(dict),
            Entry::Value(_) => None,
        }
    }
}

impl Dictionary {
    pub fn get(&self, key: &str) -> Option<&Entry> {
        // later entries override earlier ones
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, entry)| entry)
    }

    /// the value of `key` as a single word or string
    pub fn word(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_word()
    }

    /// the sub-dictionary stored at `key`
    pub fn dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key)?.as_dict()
    }

    /// like [`Dictionary::word`], but a missing key is an error naming this `block`
    pub fn require(&self, block: &str, key: &str) -> Result<&str, error::MissingHeaderKey> {
        self.word(key)
            .ok_or_else(|| error::MissingHeaderKey::new(block.into(), key.into()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, entry: Entry) {
        self.entries.push((key, entry));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Everything found at the top level of a file
pub struct Document {
    /// keyed top level entries, including `FoamFile` when present
    pub entries: Dictionary,
    /// top level lists without a key (points, faces, owner, ...)
    pub lists: Vec<ListSpan>,
    /// storage settings that were in effect for the body of the file
    pub encoding: Encoding,
}

impl Document {
    /// parse an entire file
    pub fn parse(content: &[u8]) -> Result<Self, ParseError> {
        Parser::new(Lexer::new(content), Encoding::default()).document()
    }

    /// the `FoamFile` header, if the file has one
    pub fn header(&self) -> Option<&Dictionary> {
        self.entries.dict("FoamFile")
    }

    /// a named top level dictionary, or an empty one when the block is absent
    pub fn block(&self, name: &str) -> Dictionary {
        self.entries.dict(name).cloned().unwrap_or_default()
    }

    /// the exponents of the `dimensions [...]` entry
    pub fn dimensions(&self) -> Option<Vec<f64>> {
        match self.entries.get("dimensions")?.items()?.first()? {
            Item::Bracket(words) => words.iter().map(|w| w.parse().ok()).collect(),
            _ => None,
        }
    }
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    encoding: Encoding,
    bare_element: Option<Element>,
}

fn is_count(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

impl<'a> Parser<'a> {
    pub(crate) fn new(lexer: Lexer<'a>, encoding: Encoding) -> Self {
        Self {
            lexer,
            encoding,
            bare_element: None,
        }
    }

    pub(crate) fn document(mut self) -> Result<Document, ParseError> {
        let mut lists = Vec::new();
        let entries = self.entries(true, &mut lists)?;

        Ok(Document {
            entries,
            lists,
            encoding: self.encoding,
        })
    }

    /// parse a sequence of entries, usually the body of a list of dictionaries
    pub(crate) fn dictionary(mut self) -> Result<Dictionary, ParseError> {
        let mut lists = Vec::new();
        self.entries(true, &mut lists)
    }

    fn syntax(&self, expected: &str, found: &Token<'_>) -> ParseError {
        error::Syntax::expected(self.lexer.token_start(), expected, TokenSummary::new(found)).into()
    }

    /// switch storage settings once the header is known
    fn configure(&mut self, header: &Dictionary) {
        self.encoding = Encoding::from_header(header);
        self.bare_element = header.word("class").and_then(Element::from_class);

        log::debug!(
            "header read: {:?}, bare list element {:?}",
            self.encoding,
            self.bare_element
        );
    }

    fn entries(
        &mut self,
        top_level: bool,
        lists: &mut Vec<ListSpan>,
    ) -> Result<Dictionary, ParseError> {
        let mut dict = Dictionary::default();

        loop {
            let token = self.lexer.next_token()?;

            let key = match token {
                Token::Eof if top_level => break,
                Token::Punct(b'}') if !top_level => break,
                Token::Punct(b';') => continue,
                Token::Punct(b'(') if top_level => {
                    let list = self.list(None, self.bare_element)?;
                    lists.push(list);
                    continue;
                }
                Token::Word(word) if top_level && is_count(word) => {
                    let count = self.count(word)?;
                    let list = self.counted_list(count, self.bare_element)?;
                    lists.push(list);
                    continue;
                }
                Token::Word(word) if word.starts_with('#') => {
                    // `#include "file"`, `#inputMode merge`, ...
                    let argument = self.lexer.next_token()?;
                    log::debug!("skipping directive {word} {argument:?}");
                    continue;
                }
                Token::Word(word) | Token::Str(word) => word.to_string(),
                other => {
                    let expected = if top_level { "a keyword" } else { "a keyword or `}`" };
                    return Err(self.syntax(expected, &other));
                }
            };

            let entry = if self.lexer.peek_token()? == Token::Punct(b'{') {
                self.lexer.next_token()?;
                let mut nested = Vec::new();
                Entry::Dict(self.entries(false, &mut nested)?)
            } else {
                Entry::Value(self.items()?)
            };

            if top_level && key == "FoamFile" {
                if let Entry::Dict(header) = &entry {
                    self.configure(header);
                }
            }

            dict.insert(key, entry);
        }

        Ok(dict)
    }

    /// items of a value entry, up to and including the terminating `;`
    fn items(&mut self) -> Result<Vec<Item>, ParseError> {
        let mut items: Vec<Item> = Vec::new();

        loop {
            let token = self.lexer.next_token()?;

            let item = match token {
                Token::Punct(b';') => break,
                Token::Punct(b'(') => {
                    let element = tag_element(&items);
                    Item::List(self.list(None, element)?)
                }
                Token::Punct(b'[') => Item::Bracket(self.bracket()?),
                Token::Punct(b'{') => {
                    let mut nested = Vec::new();
                    Item::Dict(self.entries(false, &mut nested)?)
                }
                Token::Word(word) if is_count(word) && self.starts_list()? => {
                    let count = self.count(word)?;
                    let element = tag_element(&items);
                    Item::List(self.counted_list(count, element)?)
                }
                Token::Word(word) => Item::Word(word.to_string()),
                Token::Str(string) => Item::Str(string.to_string()),
                Token::Verbatim(text) => Item::Verbatim(text.to_string()),
                other => return Err(self.syntax("a value or `;`", &other)),
            };

            items.push(item);
        }

        Ok(items)
    }

    fn starts_list(&self) -> Result<bool, ParseError> {
        let next = self.lexer.peek_token()?;
        Ok(matches!(next, Token::Punct(b'(') | Token::Punct(b'{')))
    }

    fn count(&self, word: &str) -> Result<usize, ParseError> {
        word.parse()
            .map_err(|_| error::InvalidNumber::new(word.into(), "list size").into())
    }

    /// a list whose count was just read: expects `(` or `{` next
    fn counted_list(
        &mut self,
        count: usize,
        element: Option<Element>,
    ) -> Result<ListSpan, ParseError> {
        match self.lexer.next_token()? {
            Token::Punct(b'(') => self.list(Some(count), element),
            Token::Punct(b'{') => {
                let body = self.lexer.skip_balanced(b'{', b'}')?;
                Ok(ListSpan {
                    count: Some(count),
                    body,
                    format: Format::Ascii,
                    repeated: true,
                })
            }
            other => Err(self.syntax("`(` after a list size", &other)),
        }
    }

    /// the body of a list whose `(` was just consumed
    fn list(
        &mut self,
        count: Option<usize>,
        element: Option<Element>,
    ) -> Result<ListSpan, ParseError> {
        if let (Format::Binary, Some(count), Some(element)) = (self.encoding.format, count, element) {
            let len = count
                .checked_mul(element.width(&self.encoding))
                .ok_or_else(|| error::TruncatedPayload::Short {
                    declared: usize::MAX,
                    available: self.lexer.remaining(),
                    unit: "bytes",
                })?;
            let body = self.lexer.skip_raw(len)?;

            return Ok(ListSpan {
                count: Some(count),
                body,
                format: Format::Binary,
                repeated: false,
            });
        }

        let body = self.lexer.skip_balanced(b'(', b')')?;

        Ok(ListSpan {
            count,
            body,
            format: Format::Ascii,
            repeated: false,
        })
    }

    fn bracket(&mut self) -> Result<Vec<String>, ParseError> {
        let mut words = Vec::new();

        loop {
            match self.lexer.next_token()? {
                Token::Punct(b']') => break,
                Token::Word(word) => words.push(word.to_string()),
                other => return Err(self.syntax("a word or `]`", &other)),
            }
        }

        Ok(words)
    }
}

/// binary element type announced by a `List<T>` tag directly before a list
fn tag_element(items: &[Item]) -> Option<Element> {
    match items.last()? {
        Item::Word(tag) => Element::from_tag(tag),
        _ => None,
    }
}

/// Parse the named top level block of a file.
///
/// A block that never appears gives an empty dictionary, not an error. Callers
/// needing specific keys should use [`Dictionary::require`].
pub fn header_block(content: &[u8], name: &str) -> Result<Dictionary, ParseError> {
    let document = Document::parse(content)?;
    Ok(document.block(name))
}
