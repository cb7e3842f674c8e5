//! Document operations - a sequence of retain/insert/delete components.
//!
//! A `DocOp` walks the whole document from start to end:
//! - `Retain(n)` keeps the next `n` characters
//! - `Insert(text)` inserts `text` at the cursor
//! - `Delete(text)` removes the next characters, which must equal `text`
//!
//! Retains and deletes together must cover the document exactly, so an
//! operation written against one document state cannot silently apply to
//! another. Positions and lengths count `char`s.

use crate::doc_state::DocState;
use crate::error::{OpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a document operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Keep characters unchanged.
    Retain(usize),
    /// Insert characters.
    Insert(String),
    /// Delete characters (carries the deleted text).
    Delete(String),
}

impl Component {
    /// Number of characters this component spans.
    pub fn len(&self) -> usize {
        match self {
            Component::Retain(n) => *n,
            Component::Insert(text) | Component::Delete(text) => text.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What is left of this component after its first `taken` characters.
    fn remainder(self, taken: usize) -> Option<Component> {
        match self {
            Component::Retain(n) if n > taken => Some(Component::Retain(n - taken)),
            Component::Retain(_) => None,
            Component::Insert(text) => {
                let (_, rest) = split_chars(&text, taken);
                (!rest.is_empty()).then_some(Component::Insert(rest))
            }
            Component::Delete(text) => {
                let (_, rest) = split_chars(&text, taken);
                (!rest.is_empty()).then_some(Component::Delete(rest))
            }
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Retain(n) => write!(f, "retain {}", n),
            Component::Insert(text) => write!(f, "insert {:?}", text),
            Component::Delete(text) => write!(f, "delete {:?}", text),
        }
    }
}

/// Split `text` after its first `at` characters.
fn split_chars(text: &str, at: usize) -> (String, String) {
    let byte = text
        .char_indices()
        .nth(at)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    (text[..byte].to_string(), text[byte..].to_string())
}

/// An immutable, normalized document operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawDocOp")]
pub struct DocOp {
    components: Vec<Component>,
}

/// Wire form of a `DocOp`, normalized on the way in.
#[derive(Deserialize)]
struct RawDocOp {
    components: Vec<Component>,
}

impl From<RawDocOp> for DocOp {
    fn from(raw: RawDocOp) -> Self {
        raw.components.into_iter().collect()
    }
}

impl DocOp {
    /// The operation that changes nothing on an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An operation that builds `text` from an empty document.
    pub fn initialization(text: &str) -> Self {
        DocOpBuilder::new().insert(text).build()
    }

    /// Insert `text` at `position` in a document of `doc_len` characters.
    ///
    /// A `position` past the end yields an operation that fails to apply.
    pub fn insert_at(doc_len: usize, position: usize, text: &str) -> Self {
        DocOpBuilder::new()
            .retain(position)
            .insert(text)
            .retain(doc_len.saturating_sub(position))
            .build()
    }

    /// Delete the characters in `start..end` of `doc`.
    pub fn delete_range(doc: &DocState, start: usize, end: usize) -> Result<Self> {
        if end < start || end > doc.len() {
            return Err(OpError::DeletePastEnd {
                position: start,
                count: end.saturating_sub(start),
                length: doc.len(),
            });
        }
        Ok(DocOpBuilder::new()
            .retain(start)
            .delete(doc.slice(start, end))
            .retain(doc.len() - end)
            .build())
    }

    /// Delete everything in `doc`.
    pub fn delete_all(doc: &DocState) -> Self {
        DocOpBuilder::new().delete(doc.text()).build()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Length of the document this operation applies to. Saturates at
    /// `usize::MAX` for malformed operations.
    pub fn source_len(&self) -> usize {
        self.components
            .iter()
            .map(|c| match c {
                Component::Retain(_) | Component::Delete(_) => c.len(),
                Component::Insert(_) => 0,
            })
            .fold(0, usize::saturating_add)
    }

    /// Length of the document this operation produces.
    pub fn target_len(&self) -> usize {
        self.components
            .iter()
            .map(|c| match c {
                Component::Retain(_) | Component::Insert(_) => c.len(),
                Component::Delete(_) => 0,
            })
            .fold(0, usize::saturating_add)
    }

    /// True if the operation only retains.
    pub fn is_noop(&self) -> bool {
        self.components
            .iter()
            .all(|c| matches!(c, Component::Retain(_)))
    }

    /// Apply to `doc`, returning the new document. `doc` is never modified.
    pub fn apply(&self, doc: &DocState) -> Result<DocState> {
        let chars = doc.chars();
        let length = chars.len();
        let mut cursor: usize = 0;
        let mut out: Vec<char> = Vec::with_capacity(length);

        for component in &self.components {
            match component {
                Component::Retain(count) => {
                    let end = match cursor.checked_add(*count) {
                        Some(end) if end <= length => end,
                        _ => {
                            return Err(OpError::RetainPastEnd {
                                position: cursor,
                                count: *count,
                                length,
                            })
                        }
                    };
                    out.extend_from_slice(&chars[cursor..end]);
                    cursor = end;
                }
                Component::Insert(text) => out.extend(text.chars()),
                Component::Delete(text) => {
                    let count = text.chars().count();
                    let end = match cursor.checked_add(count) {
                        Some(end) if end <= length => end,
                        _ => {
                            return Err(OpError::DeletePastEnd {
                                position: cursor,
                                count,
                                length,
                            })
                        }
                    };
                    if !chars[cursor..end].iter().copied().eq(text.chars()) {
                        return Err(OpError::DeleteMismatch {
                            position: cursor,
                            expected: text.clone(),
                            found: chars[cursor..end].iter().collect(),
                        });
                    }
                    cursor = end;
                }
            }
        }

        if cursor != length {
            return Err(OpError::LengthMismatch {
                covered: cursor,
                length,
            });
        }
        Ok(DocState::from_chars(out))
    }

    /// Sequential composition: applying the result equals applying `self`
    /// and then `other`.
    pub fn compose(&self, other: &DocOp) -> Result<DocOp> {
        if self.target_len() != other.source_len() {
            return Err(OpError::ComposeMismatch {
                first_target: self.target_len(),
                second_source: other.source_len(),
            });
        }

        let mut first = self.components.iter().cloned();
        let mut second = other.components.iter().cloned();
        let mut a = first.next();
        let mut b = second.next();
        let mut out = DocOpBuilder::new();
        // Position in the intermediate document, for error reporting.
        let mut position = 0;

        loop {
            match (a.take(), b.take()) {
                (None, None) => break,
                // Deletes of the first op never reach the second.
                (Some(Component::Delete(text)), next_b) => {
                    out = out.delete(text);
                    a = first.next();
                    b = next_b;
                }
                // Inserts of the second op consume nothing from the first.
                (next_a, Some(Component::Insert(text))) => {
                    out = out.insert(text);
                    a = next_a;
                    b = second.next();
                }
                (Some(left), Some(right)) => {
                    let taken = left.len().min(right.len());
                    match (&left, &right) {
                        (Component::Retain(_), Component::Retain(_)) => {
                            out = out.retain(taken);
                        }
                        (Component::Retain(_), Component::Delete(text)) => {
                            out = out.delete(split_chars(text, taken).0);
                        }
                        (Component::Insert(text), Component::Retain(_)) => {
                            out = out.insert(split_chars(text, taken).0);
                        }
                        (Component::Insert(inserted), Component::Delete(deleted)) => {
                            let inserted = split_chars(inserted, taken).0;
                            let deleted = split_chars(deleted, taken).0;
                            if inserted != deleted {
                                return Err(OpError::DeleteMismatch {
                                    position,
                                    expected: deleted,
                                    found: inserted,
                                });
                            }
                        }
                        // Delete on the left and Insert on the right are handled above.
                        _ => unreachable!("delete/insert handled by earlier arms"),
                    }
                    position = position.saturating_add(taken);
                    a = left.remainder(taken).or_else(|| first.next());
                    b = right.remainder(taken).or_else(|| second.next());
                }
                // Lengths were checked up front; only a malformed operation
                // with zero-length components could run out on one side.
                (Some(_), None) | (None, Some(_)) => {
                    return Err(OpError::ComposeMismatch {
                        first_target: self.target_len(),
                        second_source: other.source_len(),
                    });
                }
            }
        }

        Ok(out.build())
    }

    /// The operation that undoes this one.
    pub fn invert(&self) -> DocOp {
        let components = self
            .components
            .iter()
            .map(|c| match c {
                Component::Retain(n) => Component::Retain(*n),
                Component::Insert(text) => Component::Delete(text.clone()),
                Component::Delete(text) => Component::Insert(text.clone()),
            })
            .collect();
        DocOp { components }
    }

    /// One component per line, each indented by `indent` spaces.
    pub fn to_pretty_string(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        self.components
            .iter()
            .map(|c| format!("{}{}", pad, c))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for DocOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, "]")
    }
}

/// Builder that produces normalized operations: zero-length components are
/// dropped and adjacent components of the same kind are merged.
#[derive(Clone, Debug, Default)]
pub struct DocOpBuilder {
    components: Vec<Component>,
}

impl DocOpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retain(mut self, count: usize) -> Self {
        if count == 0 {
            return self;
        }
        match self.components.last_mut() {
            Some(Component::Retain(last)) => *last = last.saturating_add(count),
            _ => self.components.push(Component::Retain(count)),
        }
        self
    }

    pub fn insert(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.components.last_mut() {
            Some(Component::Insert(last)) => last.push_str(&text),
            _ => self.components.push(Component::Insert(text)),
        }
        self
    }

    pub fn delete(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.components.last_mut() {
            Some(Component::Delete(last)) => last.push_str(&text),
            _ => self.components.push(Component::Delete(text)),
        }
        self
    }

    /// Append a component, normalizing as it goes.
    pub fn push(self, component: Component) -> Self {
        match component {
            Component::Retain(n) => self.retain(n),
            Component::Insert(text) => self.insert(text),
            Component::Delete(text) => self.delete(text),
        }
    }

    pub fn build(self) -> DocOp {
        DocOp {
            components: self.components,
        }
    }
}

impl FromIterator<Component> for DocOp {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DocOpBuilder::new(), DocOpBuilder::push)
            .build()
    }
}
