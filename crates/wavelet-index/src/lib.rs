//! # wavelet-index
//!
//! Read-only helpers over a converted wavelet, used when indexing it.
//!
//! This crate provides:
//! - Conversation title extraction from the manifest's root blip
//! - A plain-text description of every document
//!
//! ## Example
//!
//! ```rust
//! use wavelet_index::{extract_title, MANIFEST_DOCUMENT_ID};
//! use wavelet_ops::{DocOp, DocumentId, OperationContext, ParticipantId, WaveletOperation,
//!                   WaveletState};
//!
//! let ctx = OperationContext::new(ParticipantId::new("alice@example.com"), 0);
//! let mut wavelet = WaveletState::new("w+demo");
//! wavelet.apply(&WaveletOperation::content(
//!     ctx.clone(),
//!     DocumentId::from(MANIFEST_DOCUMENT_ID),
//!     DocOp::initialization("b+root"),
//! )).unwrap();
//! wavelet.apply(&WaveletOperation::content(
//!     ctx,
//!     DocumentId::from("b+root"),
//!     DocOp::initialization("Lunch plans? Pizza."),
//! )).unwrap();
//!
//! assert_eq!(extract_title(&wavelet), "Lunch plans?");
//! ```

pub mod describe;
pub mod title;

pub use describe::describe;
pub use title::{extract_title, root_blip_id, MANIFEST_DOCUMENT_ID};
