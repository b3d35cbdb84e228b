use super::lexer::Token;

use std::fmt;

/// Owned description of a token, used to report what the parser actually found
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSummary {
    text: Option<String>,
    t_type: &'static str,
}

impl fmt::Display for TokenSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{} `{text}`", self.t_type),
            None => write!(f, "{}", self.t_type),
        }
    }
}

impl TokenSummary {
    pub(crate) fn new(token: &Token<'_>) -> Self {
        match token {
            Token::Punct(p) => Self {
                text: Some((*p as char).to_string()),
                t_type: "punctuation",
            },
            Token::Word(word) => Self {
                text: Some(shorten(word)),
                t_type: "word",
            },
            Token::Str(string) => Self {
                text: Some(shorten(string)),
                t_type: "string",
            },
            Token::Verbatim(_) => Self {
                text: None,
                t_type: "verbatim block",
            },
            Token::Eof => Self::eof(),
        }
    }

    pub(crate) fn eof() -> Self {
        Self {
            text: None,
            t_type: "end of file",
        }
    }

    pub(crate) fn bytes(bytes: &[u8]) -> Self {
        Self {
            text: Some(shorten(&String::from_utf8_lossy(bytes))),
            t_type: "bytes",
        }
    }
}

fn shorten(text: &str) -> String {
    const MAX: usize = 40;

    if text.chars().count() > MAX {
        let mut short: String = text.chars().take(MAX).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}
