// marketscope-core/src/core/sanitize.rs
// ============================================================================
// Module: Marketscope Discount Sanitizer
// Description: Recursive sanitization of nested free-form tier data.
// Purpose: Guarantee no unsanitized scalar reaches storage.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The sanitizer walks nested JSON structures and passes every scalar leaf
//! through text sanitization before reassembling the same nested shape. It
//! is the single mandatory choke point between untrusted input and persisted
//! tier or rule data; no other write path bypasses it.
//!
//! Key order and array order are preserved (the crate enables serde_json's
//! `preserve_order`). Recursion is bound by input depth. Sanitization is
//! idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when sanitizing an untrusted document.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Input is not valid structured data; the write is rejected whole.
    #[error("input is not a valid structured document: {0}")]
    InvalidDocument(String),
}

// ============================================================================
// SECTION: Value Sanitization
// ============================================================================

/// Recursively sanitizes a JSON value.
///
/// Objects and arrays are rebuilt in place with their key and element order
/// preserved. String leaves pass through [`sanitize_text`]. Numbers,
/// booleans, and null are structural and pass through unchanged.
#[must_use]
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, nested) in fields {
                out.insert(key.clone(), sanitize_value(nested));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::String(text) => Value::String(sanitize_text(text)),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Parses an untrusted JSON document and sanitizes it.
///
/// # Errors
///
/// Returns [`SanitizeError::InvalidDocument`] when the input fails to parse;
/// no partial result is produced.
pub fn sanitize_document(raw: &str) -> Result<Value, SanitizeError> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|err| SanitizeError::InvalidDocument(err.to_string()))?;
    Ok(sanitize_value(&parsed))
}

// ============================================================================
// SECTION: Text Sanitization
// ============================================================================

/// Sanitizes one scalar text value.
///
/// Removes angle-bracket markup, strips control characters, collapses
/// whitespace runs to single spaces, and trims the result.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    let stripped = strip_markup(text);
    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for ch in stripped.chars() {
        if ch.is_control() {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// Removes angle-bracket delimited markup from a text value.
///
/// An unterminated opening bracket discards the remainder of the value, so
/// a truncated tag can never survive into storage.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth: u32 = 0;
    for ch in text.chars() {
        match ch {
            '<' => depth = depth.saturating_add(1),
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}
