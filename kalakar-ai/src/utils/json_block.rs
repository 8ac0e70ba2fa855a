//! Structured-output extraction from free-form generative text
//!
//! Generative services frequently wrap the requested JSON in prose or code
//! fences. `extract_block` locates the first balanced `{...}` (or `[...]`)
//! block, tracking nesting depth and ignoring brackets inside string
//! literals, and `parse_block` deserializes it into a typed value.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Kind of JSON block to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Object,
    Array,
}

impl BlockKind {
    fn delimiters(self) -> (char, char) {
        match self {
            BlockKind::Object => ('{', '}'),
            BlockKind::Array => ('[', ']'),
        }
    }
}

/// Extraction or parse failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JsonBlockError {
    /// No opening delimiter in the text
    #[error("no JSON {0} found in response")]
    NotFound(&'static str),

    /// Opening delimiter never closed
    #[error("unbalanced JSON {0} in response")]
    Unbalanced(&'static str),

    /// Block found but not valid for the target type
    #[error("invalid JSON: {0}")]
    Invalid(String),
}

fn kind_name(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Object => "object",
        BlockKind::Array => "array",
    }
}

/// Return the first balanced block of the requested kind
///
/// # Examples
///
/// ```
/// use kalakar_ai::utils::json_block::{extract_block, BlockKind};
///
/// let text = "Sure! Here it is:\n```json\n{\"a\": {\"b\": \"}\"}}\n```";
/// assert_eq!(extract_block(text, BlockKind::Object).unwrap(), "{\"a\": {\"b\": \"}\"}}");
/// ```
pub fn extract_block(text: &str, kind: BlockKind) -> Result<&str, JsonBlockError> {
    let (open, close) = kind.delimiters();
    let start = text.find(open).ok_or(JsonBlockError::NotFound(kind_name(kind)))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(JsonBlockError::Unbalanced(kind_name(kind)))
}

/// Extract the first balanced block and deserialize it
pub fn parse_block<T: DeserializeOwned>(text: &str, kind: BlockKind) -> Result<T, JsonBlockError> {
    let block = extract_block(text, kind)?;
    serde_json::from_str(block).map_err(|e| JsonBlockError::Invalid(e.to_string()))
}
