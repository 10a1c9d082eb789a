//! Line tokenizer: comment stripping, mnemonic and parameter extraction.
//!
//! A line is cut at the first `;`, split on whitespace, and the first word
//! becomes the mnemonic. Every further word is `<letter><number>`; a bare
//! letter is legal and carries no value.

use std::ops::Range;
use thiserror::Error;

/// Byte range of a token within the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GCodeSpan {
    pub range: Range<usize>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed number in parameter '{token}' (at {span:?})")]
    MalformedNumber { token: String, span: GCodeSpan },
}

/// One `<letter><number>` parameter atom.
///
/// `value` is `None` when the letter appeared without a number, which is
/// distinct from an explicit zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    pub letter: char,
    pub value: Option<f32>,
}

/// A tokenized line: mnemonic plus its parameters in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct GCodeCommand {
    pub mnemonic: String,
    pub parameters: Vec<Parameter>,
}

impl GCodeCommand {
    /// First parameter with the given letter.
    pub fn parameter(&self, letter: char) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.letter == letter)
    }

    /// Value of the given letter, if present and numeric.
    pub fn value(&self, letter: char) -> Option<f32> {
        self.parameter(letter).and_then(|p| p.value)
    }
}

/// Drop everything from the first comment marker onward.
pub fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Byte-level [`strip_comment`] for raw input lines. Comment text need not
/// be valid UTF-8.
pub fn strip_comment_bytes(raw: &[u8]) -> &[u8] {
    match raw.iter().position(|&b| b == b';') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// Tokenize one line. Returns `Ok(None)` for a blank or comment-only line.
pub fn parse_line(line: &str) -> Result<Option<GCodeCommand>, ParseError> {
    let code = strip_comment(line);
    if code.trim().is_empty() {
        return Ok(None);
    }

    let mut words = words_with_offsets(code).into_iter();
    let Some((_, mnemonic)) = words.next() else {
        return Ok(None);
    };

    let mut parameters = Vec::new();
    for (offset, word) in words {
        parameters.push(parse_parameter(word, offset)?);
    }

    Ok(Some(GCodeCommand {
        mnemonic: mnemonic.to_string(),
        parameters,
    }))
}

fn parse_parameter(word: &str, offset: usize) -> Result<Parameter, ParseError> {
    let mut chars = word.chars();
    // words are never empty
    let letter = chars.next().unwrap_or_default();
    let rest = chars.as_str();
    if rest.is_empty() {
        return Ok(Parameter { letter, value: None });
    }
    let malformed = || ParseError::MalformedNumber {
        token: word.to_string(),
        span: GCodeSpan {
            range: offset..offset + word.len(),
        },
    };
    // `f32::from_str` also accepts nan/inf spellings
    let value = rest.parse::<f32>().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }
    Ok(Parameter {
        letter,
        value: Some(value),
    })
}

fn words_with_offsets(code: &str) -> Vec<(usize, &str)> {
    let bytes = code.as_bytes();
    let len = bytes.len();
    let mut words = Vec::new();
    let mut pos = 0;
    while pos < len {
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= len {
            break;
        }
        let start = pos;
        while pos < len && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        words.push((start, &code[start..pos]));
    }
    words
}
