//! Wavelet operations - the stream the converter consumes.
//!
//! A wavelet is a named collection of documents plus a participant list.
//! Every change to it is a `WaveletOperation`: membership changes,
//! document (blip) operations, and version bookkeeping.

use crate::doc_op::DocOp;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Address of a wavelet participant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a document within a wavelet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generate a fresh blip id (`b+` followed by a ULID).
    pub fn generate() -> Self {
        Self(format!("b+{}", Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Metadata attached to every wavelet operation.
///
/// Opaque to the converter: it is carried through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationContext {
    /// Who made the change.
    pub creator: ParticipantId,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// How far the wavelet version advances when this op is applied.
    pub version_increment: u64,
}

impl OperationContext {
    pub fn new(creator: ParticipantId, timestamp: u64) -> Self {
        Self {
            creator,
            timestamp,
            version_increment: 1,
        }
    }

    pub fn with_version_increment(mut self, increment: u64) -> Self {
        self.version_increment = increment;
        self
    }
}

/// An operation on a single blip (document).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlipOperation {
    /// Mutates the document content.
    Content(DocOp),
    /// Marks the blip as submitted; carries no content.
    Submit,
}

/// The closed set of wavelet-level operation variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveletOpKind {
    NoOp,
    AddParticipant(ParticipantId),
    RemoveParticipant(ParticipantId),
    Blip {
        document_id: DocumentId,
        op: BlipOperation,
    },
    /// Version bookkeeping, owned by whoever stores the history.
    VersionUpdate { version: u64 },
}

/// Classification tag for a wavelet operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    NoOp,
    AddParticipant,
    RemoveParticipant,
    BlipContent,
    BlipSubmit,
    VersionUpdate,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::NoOp => "NoOp",
            OpKind::AddParticipant => "AddParticipant",
            OpKind::RemoveParticipant => "RemoveParticipant",
            OpKind::BlipContent => "BlipContent",
            OpKind::BlipSubmit => "SubmitBlip",
            OpKind::VersionUpdate => "VersionUpdate",
        };
        write!(f, "{}", name)
    }
}

/// A single change to a wavelet. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveletOperation {
    pub context: OperationContext,
    pub kind: WaveletOpKind,
}

impl WaveletOperation {
    pub fn new(context: OperationContext, kind: WaveletOpKind) -> Self {
        Self { context, kind }
    }

    pub fn no_op(context: OperationContext) -> Self {
        Self::new(context, WaveletOpKind::NoOp)
    }

    pub fn add_participant(context: OperationContext, participant: ParticipantId) -> Self {
        Self::new(context, WaveletOpKind::AddParticipant(participant))
    }

    pub fn remove_participant(context: OperationContext, participant: ParticipantId) -> Self {
        Self::new(context, WaveletOpKind::RemoveParticipant(participant))
    }

    pub fn content(context: OperationContext, document_id: DocumentId, op: DocOp) -> Self {
        Self::new(
            context,
            WaveletOpKind::Blip {
                document_id,
                op: BlipOperation::Content(op),
            },
        )
    }

    pub fn submit(context: OperationContext, document_id: DocumentId) -> Self {
        Self::new(
            context,
            WaveletOpKind::Blip {
                document_id,
                op: BlipOperation::Submit,
            },
        )
    }

    pub fn version_update(context: OperationContext, version: u64) -> Self {
        Self::new(context, WaveletOpKind::VersionUpdate { version })
    }

    pub fn op_kind(&self) -> OpKind {
        match &self.kind {
            WaveletOpKind::NoOp => OpKind::NoOp,
            WaveletOpKind::AddParticipant(_) => OpKind::AddParticipant,
            WaveletOpKind::RemoveParticipant(_) => OpKind::RemoveParticipant,
            WaveletOpKind::Blip {
                op: BlipOperation::Content(_),
                ..
            } => OpKind::BlipContent,
            WaveletOpKind::Blip {
                op: BlipOperation::Submit,
                ..
            } => OpKind::BlipSubmit,
            WaveletOpKind::VersionUpdate { .. } => OpKind::VersionUpdate,
        }
    }

    /// The document this operation targets, if any.
    pub fn document_id(&self) -> Option<&DocumentId> {
        match &self.kind {
            WaveletOpKind::Blip { document_id, .. } => Some(document_id),
            _ => None,
        }
    }

    /// The embedded content operation, if this is a blip content op.
    pub fn content_op(&self) -> Option<&DocOp> {
        match &self.kind {
            WaveletOpKind::Blip {
                op: BlipOperation::Content(op),
                ..
            } => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for WaveletOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WaveletOpKind::NoOp => write!(f, "NoOp")?,
            WaveletOpKind::AddParticipant(p) => write!(f, "AddParticipant({})", p)?,
            WaveletOpKind::RemoveParticipant(p) => write!(f, "RemoveParticipant({})", p)?,
            WaveletOpKind::Blip {
                document_id,
                op: BlipOperation::Content(op),
            } => write!(f, "BlipContent({}, {})", document_id, op)?,
            WaveletOpKind::Blip {
                document_id,
                op: BlipOperation::Submit,
            } => write!(f, "SubmitBlip({})", document_id)?,
            WaveletOpKind::VersionUpdate { version } => write!(f, "VersionUpdate({})", version)?,
        }
        write!(
            f,
            " by {} at {}",
            self.context.creator, self.context.timestamp
        )
    }
}
