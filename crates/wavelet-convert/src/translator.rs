//! Translators - the pluggable seam that defines the target representation.
//!
//! A translator turns one source content operation into the equivalent
//! operation on the converted document. It sees the source document as it
//! was *before* the operation (the shadow), which is enough to translate
//! positions, plus a per-document state value it may update.
//!
//! The same dispatch and lifecycle engine works for any translator.

use crate::error::TranslateError;
use std::sync::Arc;
use wavelet_ops::{Component, DocOp, DocOpBuilder, DocState, DocumentId, OpError};

/// Converts source content operations into target content operations.
pub trait OpTranslator {
    /// Per-document state, created fresh with each document converter and
    /// dropped when the converter is evicted.
    type State: Default + Clone;

    /// Translate `op`, which applies to `shadow`.
    ///
    /// `state` is a scratch copy: it is only kept if the whole conversion
    /// succeeds.
    fn translate(
        &self,
        document_id: &DocumentId,
        shadow: &DocState,
        state: &mut Self::State,
        op: &DocOp,
    ) -> Result<DocOp, TranslateError>;
}

impl<T: OpTranslator + ?Sized> OpTranslator for Arc<T> {
    type State = T::State;

    fn translate(
        &self,
        document_id: &DocumentId,
        shadow: &DocState,
        state: &mut Self::State,
        op: &DocOp,
    ) -> Result<DocOp, TranslateError> {
        (**self).translate(document_id, shadow, state, op)
    }
}

/// Target representation identical to the source.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl OpTranslator for Identity {
    type State = ();

    fn translate(
        &self,
        _document_id: &DocumentId,
        _shadow: &DocState,
        _state: &mut (),
        op: &DocOp,
    ) -> Result<DocOp, TranslateError> {
        Ok(op.clone())
    }
}

/// Target representation that drops every character `keep` rejects.
///
/// Retain counts are recomputed from the shadow so the converted operation
/// applies to the filtered document.
#[derive(Clone, Debug)]
pub struct CharFilter<P> {
    keep: P,
}

impl<P: Fn(char) -> bool> CharFilter<P> {
    pub fn new(keep: P) -> Self {
        Self { keep }
    }

    fn filtered(&self, text: &str) -> String {
        text.chars().filter(|c| (self.keep)(*c)).collect()
    }
}

/// Character predicate used by [`CharFilter::strip_control`].
pub type CharPredicate = fn(char) -> bool;

impl CharFilter<CharPredicate> {
    /// Drop control characters other than line breaks.
    pub fn strip_control() -> Self {
        Self::new(|c| c == '\n' || !c.is_control())
    }
}

impl<P: Fn(char) -> bool> OpTranslator for CharFilter<P> {
    type State = ();

    fn translate(
        &self,
        _document_id: &DocumentId,
        shadow: &DocState,
        _state: &mut (),
        op: &DocOp,
    ) -> Result<DocOp, TranslateError> {
        let chars = shadow.chars();
        let mut cursor: usize = 0;
        let mut out = DocOpBuilder::new();

        for component in op.components() {
            match component {
                Component::Retain(count) => {
                    let span = cursor
                        .checked_add(*count)
                        .and_then(|end| chars.get(cursor..end))
                        .ok_or(OpError::RetainPastEnd {
                            position: cursor,
                            count: *count,
                            length: chars.len(),
                        })?;
                    out = out.retain(span.iter().filter(|c| (self.keep)(**c)).count());
                    cursor += count;
                }
                Component::Insert(text) => out = out.insert(self.filtered(text)),
                Component::Delete(text) => {
                    out = out.delete(self.filtered(text));
                    cursor = cursor.saturating_add(text.chars().count());
                }
            }
        }

        Ok(out.build())
    }
}

/// Stateless translator built from a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FnTranslator<F> {
    f: F,
}

/// Wrap a closure as a translator.
///
/// ```rust
/// use wavelet_convert::translator::from_fn;
/// use wavelet_convert::WaveletConverter;
///
/// let converter = WaveletConverter::new(from_fn(|_id, op| Ok(op.clone())));
/// assert_eq!(converter.len(), 0);
/// ```
pub fn from_fn<F>(f: F) -> FnTranslator<F>
where
    F: Fn(&DocumentId, &DocOp) -> Result<DocOp, TranslateError>,
{
    FnTranslator { f }
}

impl<F> OpTranslator for FnTranslator<F>
where
    F: Fn(&DocumentId, &DocOp) -> Result<DocOp, TranslateError>,
{
    type State = ();

    fn translate(
        &self,
        document_id: &DocumentId,
        _shadow: &DocState,
        _state: &mut (),
        op: &DocOp,
    ) -> Result<DocOp, TranslateError> {
        (self.f)(document_id, op)
    }
}
