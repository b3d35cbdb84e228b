//! turning located list bodies into numbers
//!
//! ASCII bodies are split on whitespace and parentheses, so tuples may or may
//! not span lines. Binary bodies are packed native-endian values whose width
//! comes from the header `arch` entry. Every decoded sequence has its length
//! checked against the declared count; nothing is padded or truncated.

use super::dictionary::{Document, ListSpan};
use super::encoding::Encoding;
use super::error::{self, ParseError, TruncatedPayload};
use super::lexer::{Lexer, Token};
use super::payload::Uniform;
use super::token_summary::TokenSummary;
use crate::utils::{self, round_to};

fn is_separator(byte: &u8) -> bool {
    byte.is_ascii_whitespace() || *byte == b'(' || *byte == b')'
}

/// whitespace / parenthesis separated tokens of an ascii list body
fn ascii_tokens(body: &[u8]) -> impl Iterator<Item = &[u8]> {
    body.split(is_separator).filter(|token| !token.is_empty())
}

fn parse_token<T: std::str::FromStr>(token: &[u8], expected: &'static str) -> Result<T, ParseError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| error::InvalidNumber::new(String::from_utf8_lossy(token).into(), expected).into())
}

fn parse_ascii<T: std::str::FromStr>(body: &[u8], expected: &'static str) -> Result<Vec<T>, ParseError> {
    ascii_tokens(body)
        .map(|token| parse_token(token, expected))
        .collect()
}

/// expand the single body of an `N{value}` list to all `N` elements
fn repeat<T: Clone>(values: Vec<T>, count: usize) -> Result<Vec<T>, ParseError> {
    let too_large = || -> ParseError {
        error::MalformedList::new("repeated list", format!("{count} repetitions do not fit in memory")).into()
    };

    let total = values.len().checked_mul(count).ok_or_else(too_large)?;

    let mut out = Vec::new();
    out.try_reserve_exact(total).map_err(|_| too_large())?;

    for _ in 0..count {
        out.extend_from_slice(&values);
    }
    Ok(out)
}

fn check_length(list: &ListSpan, arity: usize, available: usize) -> Result<(), ParseError> {
    match list.count {
        Some(count) => {
            let declared = count.checked_mul(arity).ok_or(TruncatedPayload::Short {
                declared: usize::MAX,
                available,
                unit: "values",
            })?;
            TruncatedPayload::check(declared, available, "values")?
        }
        // uncounted lists only need whole tuples
        None if available % arity != 0 => {
            let declared = (available / arity + 1) * arity;
            TruncatedPayload::check(declared, available, "values")?
        }
        None => (),
    }

    Ok(())
}

/// Decode a list of floating point tuples with `arity` components each into a
/// flat buffer of `count * arity` values, rounded to `precision` decimals.
pub fn decode_scalars(
    content: &[u8],
    list: &ListSpan,
    arity: usize,
    encoding: &Encoding,
    precision: i32,
) -> Result<Vec<f64>, ParseError> {
    let body = &content[list.body.clone()];

    let mut values: Vec<f64> = if list.is_binary() {
        let width = encoding.scalar_bytes;
        if body.len() % width != 0 {
            return Err(TruncatedPayload::Mismatch {
                declared: list.count.unwrap_or_default().saturating_mul(arity * width),
                available: body.len(),
                unit: "bytes",
            }
            .into());
        }

        if encoding.is_single_precision() {
            utils::decode_native::<f32, f64>(body)
        } else {
            utils::decode_native::<f64, f64>(body)
        }
    } else {
        let values = parse_ascii::<f64>(body, "floating point value")?;

        match list.count {
            Some(count) if list.repeated => repeat(values, count)?,
            _ => values,
        }
    };

    check_length(list, arity, values.len())?;

    values.iter_mut().for_each(|value| *value = round_to(*value, precision));

    Ok(values)
}

/// Decode the single value (or tuple) of a `uniform` entry
pub fn decode_uniform(content: &[u8], uniform: &Uniform, precision: i32) -> Result<Vec<f64>, ParseError> {
    let values: Vec<f64> = match uniform {
        Uniform::Word(word) => vec![parse_token(word.as_bytes(), "floating point value")?],
        Uniform::Tuple(list) => parse_ascii(&content[list.body.clone()], "floating point value")?,
    };

    Ok(values.into_iter().map(|value| round_to(value, precision)).collect())
}

/// Decode a list of integer labels. Binary labels are 32 or 64 bit per the header `arch`.
pub fn decode_labels(content: &[u8], list: &ListSpan, encoding: &Encoding) -> Result<Vec<i64>, ParseError> {
    let body = &content[list.body.clone()];

    let values: Vec<i64> = if list.is_binary() {
        if encoding.label_bytes == 8 {
            utils::decode_native::<i64, i64>(body)
        } else {
            utils::decode_native::<i32, i64>(body)
        }
    } else {
        let values = parse_ascii(body, "label")?;

        match list.count {
            Some(count) if list.repeated => repeat(values, count)?,
            _ => values,
        }
    };

    check_length(list, 1, values.len())?;

    Ok(values)
}

/// convert decoded labels to indices, rejecting negative values
fn indices(labels: Vec<i64>, list: &'static str) -> Result<Vec<usize>, ParseError> {
    labels
        .into_iter()
        .map(|label| {
            usize::try_from(label).map_err(|_| -> ParseError {
                error::MalformedList::new(list, format!("negative index {label}")).into()
            })
        })
        .collect()
}

/// Decode the faces of a `faces` mesh file.
///
/// `faceCompactList` files hold two bare lists: an offset table of length
/// `faces + 1` followed by the concatenated point indices. `faceList` files hold
/// one `n(i j k ...)` entry per face.
pub fn decode_faces(content: &[u8], document: &Document) -> Result<Vec<Vec<usize>>, ParseError> {
    let class = document
        .header()
        .and_then(|header| header.word("class"))
        .unwrap_or_default();

    match (class, document.lists.as_slice()) {
        ("faceCompactList", [offsets, points, ..]) | ("", [offsets, points]) => {
            let offsets = indices(decode_labels(content, offsets, &document.encoding)?, "face offsets")?;
            let points = indices(decode_labels(content, points, &document.encoding)?, "face points")?;
            compact_faces(&offsets, points)
        }
        (_, [list, ..]) => decode_face_list(content, list),
        (_, []) => Err(error::MissingPayload::new("faces".into()).into()),
    }
}

fn compact_faces(offsets: &[usize], points: Vec<usize>) -> Result<Vec<Vec<usize>>, ParseError> {
    let malformed = |reason: String| -> ParseError { error::MalformedList::new("faceCompactList", reason).into() };

    match offsets.last() {
        Some(&last) if last == points.len() => (),
        Some(&last) => {
            return Err(malformed(format!(
                "last offset {last} does not match {} point indices",
                points.len()
            )))
        }
        None => return Err(malformed("empty offset table".into())),
    }

    offsets
        .windows(2)
        .map(|pair| {
            if pair[0] > pair[1] {
                Err(malformed(format!("offsets {} and {} decrease", pair[0], pair[1])))
            } else if pair[1] > points.len() {
                Err(malformed(format!(
                    "offset {} is past the end of {} point indices",
                    pair[1],
                    points.len()
                )))
            } else {
                Ok(points[pair[0]..pair[1]].to_vec())
            }
        })
        .collect()
}

fn decode_face_list(content: &[u8], list: &ListSpan) -> Result<Vec<Vec<usize>>, ParseError> {
    let mut lexer = Lexer::with_range(content, list.body.clone());
    // the smallest face entry `3(a b c)` takes more than three bytes
    let capacity = list.count.unwrap_or_default().min(list.body.len() / 3);
    let mut faces = Vec::with_capacity(capacity);

    loop {
        let size = match lexer.next_token()? {
            Token::Eof => break,
            Token::Word(word) => parse_token::<usize>(word.as_bytes(), "face size")?,
            other => {
                let found = TokenSummary::new(&other);
                return Err(error::Syntax::expected(lexer.token_start(), "a face size", found).into());
            }
        };

        let open = lexer.next_token()?;
        if open != Token::Punct(b'(') {
            let found = TokenSummary::new(&open);
            return Err(error::Syntax::expected(lexer.token_start(), "`(` after face size", found).into());
        }

        let body = lexer.skip_balanced(b'(', b')')?;
        let points: Vec<usize> = parse_ascii(&content[body], "point index")?;

        TruncatedPayload::check(size, points.len(), "face points")?;
        faces.push(points);
    }

    if let Some(count) = list.count {
        TruncatedPayload::check(count, faces.len(), "faces")?;
    }

    Ok(faces)
}
