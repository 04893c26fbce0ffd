//! Parsing of the language model's answer into place identifiers.
//!
//! The model is told to answer with a bare JSON array of strings. In
//! practice it sometimes wraps the array in a markdown fence or in prose,
//! so parsing is tolerant but the result is always typed.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// First fenced block, e.g. "```json\n[...]\n```". Language tag optional.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

const EXCERPT_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("model answer was empty")]
    Empty,

    #[error("no JSON array of identifiers in model answer: {excerpt:?}")]
    NoArray { excerpt: String },
}

/// Inner text of the first fenced block, or the whole text when unfenced.
pub fn strip_code_fences(text: &str) -> &str {
    match FENCED_BLOCK.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// Parse the model's answer into identifiers.
///
/// Strict parse of the (unfenced) answer first; failing that, the first
/// well-formed array-of-strings literal anywhere in the text.
pub fn parse_id_array(text: &str) -> Result<Vec<String>, ParseFailure> {
    if text.trim().is_empty() {
        return Err(ParseFailure::Empty);
    }

    let body = strip_code_fences(text);
    if let Ok(ids) = serde_json::from_str::<Vec<String>>(body) {
        return Ok(ids);
    }

    first_array_literal(body)
        .or_else(|| first_array_literal(text))
        .ok_or_else(|| ParseFailure::NoArray {
            excerpt: text.trim().chars().take(EXCERPT_CHARS).collect(),
        })
}

fn first_array_literal(text: &str) -> Option<Vec<String>> {
    text.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Vec<String>>()
            .next()
            .and_then(Result::ok)
    })
}
