//! # wavelet-convert
//!
//! Incremental conversion of a wavelet's operation history into a new
//! content representation.
//!
//! This crate provides:
//! - `WaveletConverter`: the stream converter for one wavelet
//! - Per-document converters that keep a shadow of the source document,
//!   created on first touch and evicted when the document becomes empty
//! - Exhaustive dispatch with a single-result slot per operation
//! - The `OpTranslator` seam, with `Identity`, `CharFilter` and closure
//!   translators
//! - Session configuration and conversion statistics
//!
//! ## Example
//!
//! ```rust
//! use wavelet_convert::{CharFilter, WaveletConverter};
//! use wavelet_ops::{DocOp, DocumentId, OperationContext, ParticipantId, WaveletOperation};
//!
//! let mut converter = WaveletConverter::new(CharFilter::strip_control());
//! let ctx = OperationContext::new(ParticipantId::new("alice@example.com"), 0);
//!
//! let op = WaveletOperation::content(ctx, DocumentId::from("b+1"), DocOp::initialization("Hi\u{1}"));
//! let converted = converter.convert_and_apply(&op).unwrap();
//!
//! assert_eq!(converted.content_op(), Some(&DocOp::initialization("Hi")));
//! assert_eq!(converter.len(), 1);
//! ```

pub mod config;
pub mod converter;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod translator;

pub use config::{ConverterConfig, ConverterConfigBuilder, EvictionPolicy};
pub use converter::{ConversionStats, WaveletConverter};
pub use dispatch::{classify, DispatchSlot, Route};
pub use document::DocumentConverter;
pub use error::{ConversionFailure, ConvertError, Result, TranslateError};
pub use translator::{from_fn, CharFilter, FnTranslator, Identity, OpTranslator};
