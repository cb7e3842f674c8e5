//! Document content as seen by the operation algebra.

use crate::doc_op::DocOp;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The content of one document.
///
/// Serialized as a plain string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DocState {
    chars: Vec<char>,
}

impl DocState {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub(crate) fn from_chars(chars: Vec<char>) -> Self {
        Self { chars }
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Characters in `start..end`, clamped to the document.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Apply an operation, returning the resulting document.
    pub fn apply(&self, op: &DocOp) -> Result<DocState> {
        op.apply(self)
    }

    /// The operation that builds this document from nothing.
    pub fn to_initialization(&self) -> DocOp {
        DocOp::initialization(&self.text())
    }
}

impl From<String> for DocState {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl From<&str> for DocState {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<DocState> for String {
    fn from(doc: DocState) -> Self {
        doc.text()
    }
}

impl fmt::Display for DocState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
