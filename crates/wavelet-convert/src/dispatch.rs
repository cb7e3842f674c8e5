//! Operation classification and the single-result slot.
//!
//! `classify` is an exhaustive match over the closed operation set, so the
//! compiler already guarantees one route per variant. `DispatchSlot` keeps
//! the runtime check anyway: a result must be recorded exactly once per
//! input operation, and a second or missing result is a fatal error.

use crate::error::{ConvertError, Result};
use wavelet_ops::{BlipOperation, DocOp, DocumentId, WaveletOpKind, WaveletOperation};

/// Where an incoming operation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Structural operation, returned unchanged.
    PassThrough,
    /// Content operation for one document.
    Content {
        document_id: &'a DocumentId,
        op: &'a DocOp,
    },
}

/// Classify an operation, rejecting variants that must never reach the
/// converter.
///
/// Version updates belong to the caller's history bookkeeping, and blip
/// submits are consumed upstream; seeing either is a contract violation.
pub fn classify(operation: &WaveletOperation) -> Result<Route<'_>> {
    match &operation.kind {
        WaveletOpKind::NoOp
        | WaveletOpKind::AddParticipant(_)
        | WaveletOpKind::RemoveParticipant(_) => Ok(Route::PassThrough),
        WaveletOpKind::Blip { document_id, op } => match op {
            BlipOperation::Content(doc_op) => Ok(Route::Content {
                document_id,
                op: doc_op,
            }),
            BlipOperation::Submit => Err(unexpected(operation)),
        },
        WaveletOpKind::VersionUpdate { .. } => Err(unexpected(operation)),
    }
}

fn unexpected(operation: &WaveletOperation) -> ConvertError {
    ConvertError::UnexpectedOperation {
        kind: operation.op_kind(),
        operation: Box::new(operation.clone()),
    }
}

/// Holds the result of dispatching one operation.
#[derive(Debug)]
pub struct DispatchSlot<'a> {
    operation: &'a WaveletOperation,
    result: Option<WaveletOperation>,
}

impl<'a> DispatchSlot<'a> {
    pub fn new(operation: &'a WaveletOperation) -> Self {
        Self {
            operation,
            result: None,
        }
    }

    /// Record the result. Fails if one was already recorded.
    pub fn set(&mut self, result: WaveletOperation) -> Result<()> {
        if let Some(first) = &self.result {
            return Err(ConvertError::DuplicateResult {
                operation: Box::new(self.operation.clone()),
                first: Box::new(first.clone()),
                second: Box::new(result),
            });
        }
        self.result = Some(result);
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        self.result.is_some()
    }

    /// Take the result. Fails if none was recorded.
    pub fn finish(self) -> Result<WaveletOperation> {
        self.result.ok_or_else(|| ConvertError::MissingResult {
            operation: Box::new(self.operation.clone()),
        })
    }
}
