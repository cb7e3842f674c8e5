//! Stream converter for one wavelet.
//!
//! Consumes a wavelet's operations in arrival order, one at a time:
//!
//! ```text
//! on operation op:
//!   route = classify(op)                // fatal on VersionUpdate / Submit
//!   structural  -> result = op
//!   content(d)  -> c = converters[d] or new converter for d
//!                  result = op with c.convert_and_apply(op.content)
//!                  if c.shadow is empty: remove converters[d]
//!   return result                       // exactly one per op
//! ```
//!
//! Removing converters whose shadow is empty keeps memory proportional to
//! the documents that currently have content. It assumes a converter with
//! an empty shadow behaves like a fresh one, which is only approximately
//! true (see [`EvictionPolicy`]).

use crate::config::{ConverterConfig, EvictionPolicy};
use crate::dispatch::{classify, DispatchSlot, Route};
use crate::document::DocumentConverter;
use crate::error::{ConvertError, Result};
use crate::translator::OpTranslator;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error, info_span, trace, warn, Span};
use wavelet_ops::{DocOp, DocumentId, WaveletOperation};

/// Counters for one conversion session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Operations received, including failed ones.
    pub operations: u64,
    /// Structural operations returned unchanged.
    pub passed_through: u64,
    /// Content operations converted.
    pub content_converted: u64,
    /// Document converters created.
    pub converters_created: u64,
    /// Document converters evicted.
    pub converters_evicted: u64,
    /// Conversion failures (not counting fatal errors).
    pub failures: u64,
    /// Most document converters live at once.
    pub peak_tracked: usize,
}

/// Converts the history of one wavelet, operation by operation.
///
/// Not shareable across threads while converting: every call takes
/// `&mut self`, and one instance serves exactly one wavelet.
pub struct WaveletConverter<T: OpTranslator> {
    translator: T,
    config: ConverterConfig,
    converters: HashMap<DocumentId, DocumentConverter<T>>,
    stats: ConversionStats,
    span: Span,
    aborted: bool,
    warned_tracked: bool,
}

impl<T: OpTranslator> WaveletConverter<T> {
    /// Create a converter with the default configuration.
    pub fn new(translator: T) -> Self {
        Self::with_config(translator, ConverterConfig::default())
    }

    pub fn with_config(translator: T, config: ConverterConfig) -> Self {
        let span = info_span!("wavelet_converter", wavelet = %config.wavelet_id);
        Self {
            translator,
            config,
            converters: HashMap::new(),
            stats: ConversionStats::default(),
            span,
            aborted: false,
            warned_tracked: false,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    /// Number of live document converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Whether a converter is currently held for `document_id`.
    ///
    /// Absence does not mean the document was never touched: converters
    /// for emptied documents are evicted.
    pub fn is_tracking(&self, document_id: &DocumentId) -> bool {
        self.converters.contains_key(document_id)
    }

    pub fn document_converter(&self, document_id: &DocumentId) -> Option<&DocumentConverter<T>> {
        self.converters.get(document_id)
    }

    /// True once a fatal error has ended the session.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Convert one operation and advance the shadow state.
    ///
    /// Returns exactly one converted operation. Fatal errors abort the
    /// session: every later call returns [`ConvertError::SessionAborted`].
    /// Conversion failures leave all state as it was and do not abort.
    pub fn convert_and_apply(&mut self, operation: &WaveletOperation) -> Result<WaveletOperation> {
        let span = self.span.clone();
        let _enter = span.enter();

        if self.aborted {
            return Err(ConvertError::SessionAborted);
        }
        self.stats.operations += 1;

        match self.dispatch(operation) {
            Ok(converted) => Ok(converted),
            Err(err) if err.is_fatal() => {
                error!(error = %err, "aborting conversion session");
                self.aborted = true;
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "conversion failed");
                self.stats.failures += 1;
                Err(err)
            }
        }
    }

    /// Convert a whole stream, stopping at the first error.
    pub fn convert_all<'a>(
        &mut self,
        operations: impl IntoIterator<Item = &'a WaveletOperation>,
    ) -> Result<Vec<WaveletOperation>> {
        operations
            .into_iter()
            .map(|op| self.convert_and_apply(op))
            .collect()
    }

    fn dispatch(&mut self, operation: &WaveletOperation) -> Result<WaveletOperation> {
        let mut slot = DispatchSlot::new(operation);

        match classify(operation)? {
            Route::PassThrough => {
                trace!(kind = %operation.op_kind(), "passing through");
                self.stats.passed_through += 1;
                slot.set(operation.clone())?;
            }
            Route::Content { document_id, op } => {
                let converted = self.convert_content(operation, document_id, op)?;
                slot.set(WaveletOperation::content(
                    operation.context.clone(),
                    document_id.clone(),
                    converted,
                ))?;
                self.evict_if_empty(document_id);
            }
        }

        slot.finish()
    }

    fn convert_content(
        &mut self,
        operation: &WaveletOperation,
        document_id: &DocumentId,
        op: &DocOp,
    ) -> Result<DocOp> {
        let converter = match self.converters.entry(document_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(document = %document_id, "creating document converter");
                self.stats.converters_created += 1;
                entry.insert(DocumentConverter::new(document_id.clone()))
            }
        };

        let converted = converter
            .convert_and_apply(&self.translator, op)
            .map_err(|source| ConvertError::Conversion {
                operation: Box::new(operation.clone()),
                source,
            })?;

        trace!(document = %document_id, "converted content operation");
        self.stats.content_converted += 1;
        self.note_tracked();
        Ok(converted)
    }

    fn evict_if_empty(&mut self, document_id: &DocumentId) {
        let policy: EvictionPolicy = self.config.eviction;
        let evict = self
            .converters
            .get(document_id)
            .map_or(false, |c| policy.should_evict(c.current_state()));

        if evict {
            self.converters.remove(document_id);
            self.stats.converters_evicted += 1;
            debug!(document = %document_id, "evicted empty document converter");
        }
    }

    fn note_tracked(&mut self) {
        let tracked = self.converters.len();
        self.stats.peak_tracked = self.stats.peak_tracked.max(tracked);

        if !self.warned_tracked && tracked >= self.config.tracked_documents_warning {
            self.warned_tracked = true;
            warn!(
                tracked,
                threshold = self.config.tracked_documents_warning,
                "many live document converters"
            );
        }
    }
}

impl<T: OpTranslator> fmt::Display for WaveletConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaveletConverter({} entries in map)", self.converters.len())
    }
}

impl<T: OpTranslator> fmt::Debug for WaveletConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveletConverter")
            .field("config", &self.config)
            .field("converters", &self.converters.len())
            .field("stats", &self.stats)
            .field("aborted", &self.aborted)
            .finish()
    }
}
