//! byte level tokenizer for the OpenFOAM dictionary language
//!
//! The lexer never looks inside list bodies on its own. When the parser knows a
//! list holds raw binary data it asks for an exact byte range with
//! [`Lexer::skip_raw`], otherwise it jumps over the balanced body with
//! [`Lexer::skip_balanced`]. That keeps binary payloads from ever being
//! interpreted as text.

use super::error::{self, ParseError};
use super::token_summary::TokenSummary;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// one of `{ } ( ) [ ] ;`
    Punct(u8),
    /// keywords, numbers, type tags, directives and `$` references
    Word(&'a str),
    /// contents of a double quoted string, without the quotes
    Str(&'a str),
    /// contents of a `#{ ... #}` block
    Verbatim(&'a str),
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    token_start: usize,
}

fn is_punct(byte: u8) -> bool {
    matches!(byte, b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';')
}

fn ends_word(byte: u8) -> bool {
    byte.is_ascii_whitespace() || is_punct(byte) || byte == b'"'
}

impl<'a> Lexer<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            token_start: 0,
        }
    }

    /// lex a sub-range of a larger buffer, reporting offsets relative to the whole buffer
    pub fn with_range(bytes: &'a [u8], range: Range<usize>) -> Self {
        Self {
            bytes: &bytes[..range.end],
            pos: range.start,
            token_start: range.start,
        }
    }

    /// current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// number of bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// byte offset of the start of the last token returned
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            let rest = &self.bytes[self.pos..];

            if rest.starts_with(b"//") {
                match rest.iter().position(|b| *b == b'\n') {
                    Some(newline) => self.pos += newline + 1,
                    None => self.pos = self.bytes.len(),
                }
            } else if rest.starts_with(b"/*") {
                match find(&rest[2..], b"*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.bytes.len(),
                }
            } else {
                break;
            }
        }
    }

    /// produce the next token, skipping whitespace and comments
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(&byte) = self.bytes.get(self.pos) else {
            return Ok(Token::Eof);
        };

        if is_punct(byte) {
            self.pos += 1;
            return Ok(Token::Punct(byte));
        }

        if byte == b'"' {
            return self.string();
        }

        if self.bytes[self.pos..].starts_with(b"#{") {
            return self.verbatim();
        }

        let start = self.pos;
        while self.pos < self.bytes.len() && !ends_word(self.bytes[self.pos]) {
            self.pos += 1;
        }

        let word = self.utf8(start..self.pos)?;
        Ok(Token::Word(word))
    }

    /// look at the next token without consuming it
    pub fn peek_token(&self) -> Result<Token<'a>, ParseError> {
        let mut copy = *self;
        copy.next_token()
    }

    fn string(&mut self) -> Result<Token<'a>, ParseError> {
        // opening quote
        self.pos += 1;
        let start = self.pos;

        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    let string = self.utf8(start..self.pos)?;
                    self.pos += 1;
                    return Ok(Token::Str(string));
                }
                _ => self.pos += 1,
            }
        }

        Err(error::Syntax::expected(self.token_start, "closing `\"`", TokenSummary::eof()).into())
    }

    fn verbatim(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.pos + 2;

        match find(&self.bytes[start..], b"#}") {
            Some(len) => {
                let text = self.utf8(start..start + len)?;
                self.pos = start + len + 2;
                Ok(Token::Verbatim(text))
            }
            None => Err(
                error::Syntax::expected(self.token_start, "closing `#}`", TokenSummary::eof()).into(),
            ),
        }
    }

    fn utf8(&self, range: Range<usize>) -> Result<&'a str, ParseError> {
        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[range.clone()];

        std::str::from_utf8(slice).map_err(|_| {
            error::Syntax::expected(range.start, "utf8 text", TokenSummary::bytes(slice)).into()
        })
    }

    /// Consume exactly `len` raw bytes starting at the current position (directly
    /// after an opening `(`), then the closing `)`.
    ///
    /// Returns the byte range of the payload.
    pub fn skip_raw(&mut self, len: usize) -> Result<Range<usize>, ParseError> {
        let start = self.pos;
        let available = self.bytes.len() - start;

        if available < len {
            return Err(error::TruncatedPayload::Short {
                declared: len,
                available,
                unit: "bytes",
            }
            .into());
        }

        let end = start + len;

        if self.bytes.get(end) != Some(&b')') {
            return Err(error::TruncatedPayload::Unterminated {
                declared: len,
                offset: end,
            }
            .into());
        }

        self.pos = end + 1;
        Ok(start..end)
    }

    /// Skip over the body of a bracketed group whose opening byte was already
    /// consumed. Nested groups, comments and strings are stepped over.
    ///
    /// Returns the byte range between the brackets.
    pub fn skip_balanced(&mut self, open: u8, close: u8) -> Result<Range<usize>, ParseError> {
        let start = self.pos;
        let mut depth = 1usize;

        while self.pos < self.bytes.len() {
            let rest = &self.bytes[self.pos..];
            let byte = rest[0];

            if rest.starts_with(b"//") || rest.starts_with(b"/*") {
                self.skip_trivia();
                continue;
            }

            if byte == b'"' {
                self.token_start = self.pos;
                self.string()?;
                continue;
            }

            if byte == open {
                depth += 1;
            } else if byte == close {
                depth -= 1;
                if depth == 0 {
                    let end = self.pos;
                    self.pos += 1;
                    return Ok(start..end);
                }
            }

            self.pos += 1;
        }

        let expected = format!("closing `{}`", close as char);
        Err(error::Syntax::expected(start, expected, TokenSummary::eof()).into())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
