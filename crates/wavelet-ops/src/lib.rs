//! # wavelet-ops
//!
//! Operation algebra and data model for wavelet history conversion.
//!
//! This crate provides:
//! - Document operations (`DocOp`) with apply, compose and invert
//! - Document content (`DocState`)
//! - Wavelet operations: membership, blip content/submit, version updates
//! - An in-memory `WaveletState` that replays wavelet operations
//!
//! ## Example
//!
//! ```rust
//! use wavelet_ops::{DocOp, DocState, DocumentId, OperationContext, ParticipantId,
//!                   WaveletOperation, WaveletState};
//!
//! let alice = ParticipantId::new("alice@example.com");
//! let mut wavelet = WaveletState::new("w+demo");
//!
//! let op = WaveletOperation::content(
//!     OperationContext::new(alice, 0),
//!     DocumentId::from("b+root"),
//!     DocOp::insert_at(0, 0, "Hello"),
//! );
//! wavelet.apply(&op).unwrap();
//!
//! assert_eq!(wavelet.document(&DocumentId::from("b+root")), Some(&DocState::from_text("Hello")));
//! ```

pub mod doc_op;
pub mod doc_state;
pub mod error;
pub mod wavelet;
pub mod wavelet_state;

pub use doc_op::{Component, DocOp, DocOpBuilder};
pub use doc_state::DocState;
pub use error::OpError;
pub use wavelet::{
    BlipOperation, DocumentId, OpKind, OperationContext, ParticipantId, WaveletOpKind,
    WaveletOperation,
};
pub use wavelet_state::WaveletState;
