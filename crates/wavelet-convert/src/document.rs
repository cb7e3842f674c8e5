//! Per-document converter.
//!
//! Holds a shadow copy of one source document, rebuilt only from the
//! original operations in arrival order, never from converted ones. The
//! shadow is what lets the next operation on the same document be
//! translated in context.

use crate::error::ConversionFailure;
use crate::translator::OpTranslator;
use std::fmt;
use wavelet_ops::{DocOp, DocState, DocumentId};

/// Converter for a single document of a wavelet.
pub struct DocumentConverter<T: OpTranslator> {
    document_id: DocumentId,
    shadow: DocState,
    state: T::State,
    operations: u64,
}

impl<T: OpTranslator> DocumentConverter<T> {
    /// Create a converter in its initial state: empty shadow, fresh
    /// translator state.
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            shadow: DocState::new(),
            state: T::State::default(),
            operations: 0,
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// The source document after every operation converted so far.
    pub fn current_state(&self) -> &DocState {
        &self.shadow
    }

    pub fn translator_state(&self) -> &T::State {
        &self.state
    }

    /// Number of operations converted by this converter instance.
    pub fn operations_converted(&self) -> u64 {
        self.operations
    }

    /// Convert `op` and advance the shadow by it.
    ///
    /// Either both the shadow and translator state advance and the
    /// converted operation is returned, or nothing changes.
    pub fn convert_and_apply(
        &mut self,
        translator: &T,
        op: &DocOp,
    ) -> Result<DocOp, ConversionFailure> {
        let next = op.apply(&self.shadow)?;

        let mut state = self.state.clone();
        let converted = translator.translate(&self.document_id, &self.shadow, &mut state, op)?;

        self.shadow = next;
        self.state = state;
        self.operations += 1;
        Ok(converted)
    }
}

impl<T: OpTranslator> fmt::Debug for DocumentConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentConverter")
            .field("document_id", &self.document_id)
            .field("shadow_len", &self.shadow.len())
            .field("operations", &self.operations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use crate::translator::{from_fn, Identity};
    use wavelet_ops::{DocOpBuilder, OpError};

    #[test]
    fn test_starts_empty() {
        let converter: DocumentConverter<Identity> = DocumentConverter::new("b+1".into());
        assert!(converter.current_state().is_empty());
        assert_eq!(converter.operations_converted(), 0);
    }

    #[test]
    fn test_shadow_follows_source() {
        let mut converter = DocumentConverter::new("b+1".into());
        let first = DocOp::initialization("Hi");
        let second = DocOp::insert_at(2, 2, "!");

        assert_eq!(converter.convert_and_apply(&Identity, &first).unwrap(), first);
        assert_eq!(converter.convert_and_apply(&Identity, &second).unwrap(), second);
        assert_eq!(converter.current_state().text(), "Hi!");
        assert_eq!(converter.operations_converted(), 2);
    }

    #[test]
    fn test_shadow_tracks_original_not_converted() {
        let translator = from_fn(|_id, _op: &DocOp| Ok(DocOp::empty()));
        let mut converter = DocumentConverter::new("b+1".into());

        let converted = converter
            .convert_and_apply(&translator, &DocOp::initialization("abc"))
            .unwrap();
        assert_eq!(converted, DocOp::empty());
        assert_eq!(converter.current_state().text(), "abc");
    }

    #[test]
    fn test_apply_failure_leaves_state() {
        let mut converter = DocumentConverter::new("b+1".into());
        converter
            .convert_and_apply(&Identity, &DocOp::initialization("Hi"))
            .unwrap();

        let bad = DocOpBuilder::new().retain(2).delete("xyz").build();
        let err = converter.convert_and_apply(&Identity, &bad).unwrap_err();
        assert!(matches!(
            err,
            ConversionFailure::Apply(OpError::DeletePastEnd { .. })
        ));
        assert_eq!(converter.current_state().text(), "Hi");
        assert_eq!(converter.operations_converted(), 1);
    }

    #[test]
    fn test_translate_failure_leaves_state() {
        let translator = from_fn(|_id, _op: &DocOp| {
            Err(TranslateError::Unsupported("no".to_string()))
        });
        let mut converter = DocumentConverter::new("b+1".into());

        let err = converter
            .convert_and_apply(&translator, &DocOp::initialization("Hi"))
            .unwrap_err();
        assert!(matches!(err, ConversionFailure::Translate(_)));
        assert!(converter.current_state().is_empty());
    }
}
