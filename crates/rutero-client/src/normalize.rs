use std::fmt;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical lookup form of a free-text label.
///
/// Only [`normalize_label`] builds one, so every value is uppercase, free of
/// combining marks and punctuation, and single-spaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const POST_REWRITES: [(&str, &str); 2] = [("BOGOTA D C", "BOGOTA"), ("BOGOTA DC", "BOGOTA")];

pub fn normalize_label(raw: Option<&str>) -> Option<NormalizedKey> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    let uppercased = value.to_uppercase();
    let mut output = String::with_capacity(uppercased.len());
    let mut previous_space = true;
    for character in uppercased.nfd() {
        if is_combining_mark(character) {
            continue;
        }
        if character.is_whitespace() {
            if !previous_space {
                output.push(' ');
                previous_space = true;
            }
            continue;
        }
        if character.is_alphanumeric() || character == '_' {
            output.push(character);
            previous_space = false;
        }
    }

    let trimmed = output.trim_end();
    let rewritten = POST_REWRITES
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map(|(_, to)| *to)
        .unwrap_or(trimmed);

    if rewritten.is_empty() {
        return None;
    }
    Some(NormalizedKey(rewritten.to_string()))
}

pub fn normalize_str(raw: &str) -> Option<NormalizedKey> {
    normalize_label(Some(raw))
}
