//! In-memory wavelet state built by replaying wavelet operations.
//!
//! This is the caller's side of conversion: whoever drives a converter
//! appends each converted operation to a destination wavelet. Tests use two
//! of these (source and destination) to check that conversion never drifts.

use crate::doc_state::DocState;
use crate::error::{OpError, Result};
use crate::wavelet::{BlipOperation, DocumentId, ParticipantId, WaveletOpKind, WaveletOperation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A wavelet: participants, documents and version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveletState {
    id: String,
    /// Participants in the order they were added.
    participants: Vec<ParticipantId>,
    documents: BTreeMap<DocumentId, DocState>,
    version: u64,
    last_modified: u64,
}

impl WaveletState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Latest operation timestamp seen.
    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn is_participant(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }

    pub fn document(&self, id: &DocumentId) -> Option<&DocState> {
        self.documents.get(id)
    }

    /// All documents in id order. Documents that were emptied stay listed.
    pub fn documents(&self) -> impl Iterator<Item = (&DocumentId, &DocState)> + '_ {
        self.documents.iter()
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &DocumentId> + '_ {
        self.documents.keys()
    }

    /// Apply one operation. On error the wavelet is unchanged.
    pub fn apply(&mut self, op: &WaveletOperation) -> Result<()> {
        match &op.kind {
            WaveletOpKind::NoOp => {}
            WaveletOpKind::AddParticipant(participant) => {
                if self.is_participant(participant) {
                    return Err(OpError::DuplicateParticipant(participant.to_string()));
                }
                self.participants.push(participant.clone());
            }
            WaveletOpKind::RemoveParticipant(participant) => {
                let index = self
                    .participants
                    .iter()
                    .position(|p| p == participant)
                    .ok_or_else(|| OpError::UnknownParticipant(participant.to_string()))?;
                self.participants.remove(index);
            }
            WaveletOpKind::Blip { document_id, op } => match op {
                BlipOperation::Content(doc_op) => {
                    let next = match self.documents.get(document_id) {
                        Some(doc) => doc_op.apply(doc)?,
                        None => doc_op.apply(&DocState::new())?,
                    };
                    self.documents.insert(document_id.clone(), next);
                }
                BlipOperation::Submit => {}
            },
            WaveletOpKind::VersionUpdate { version } => {
                self.version = *version;
                self.last_modified = self.last_modified.max(op.context.timestamp);
                return Ok(());
            }
        }

        self.version += op.context.version_increment;
        self.last_modified = self.last_modified.max(op.context.timestamp);
        Ok(())
    }

    /// Apply operations in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        ops: impl IntoIterator<Item = &'a WaveletOperation>,
    ) -> Result<()> {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }
}
