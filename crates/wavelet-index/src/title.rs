//! Conversation title extraction.
//!
//! The manifest document lists the conversation's blips, one id per line;
//! the first one is the root blip. The title comes from the root blip's
//! text.

use tracing::debug;
use wavelet_ops::{DocState, DocumentId, WaveletState};

/// Id of the manifest document.
pub const MANIFEST_DOCUMENT_ID: &str = "conversation";

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// The root blip id listed in the manifest, if any.
pub fn root_blip_id(wavelet: &WaveletState) -> Option<DocumentId> {
    let manifest = wavelet.document(&DocumentId::from(MANIFEST_DOCUMENT_ID))?;
    manifest
        .text()
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(DocumentId::from)
}

/// Title of the conversation in `wavelet`, or an empty string.
///
/// An explicit title is the first line of a root blip that has more than
/// one line. Otherwise the first sentence is used.
pub fn extract_title(wavelet: &WaveletState) -> String {
    let Some(root) = root_blip_id(wavelet) else {
        return String::new();
    };
    let Some(doc) = wavelet.document(&root) else {
        return String::new();
    };

    let title = explicit_title(doc);
    if !title.is_empty() {
        debug!(blip = %root, "got title");
        return title;
    }
    debug!(blip = %root, "no title, inferring");
    implicit_title(doc)
}

fn explicit_title(doc: &DocState) -> String {
    let text = doc.text();
    match text.split_once('\n') {
        Some((first, _)) => first.trim().to_string(),
        None => String::new(),
    }
}

fn implicit_title(doc: &DocState) -> String {
    let text = doc.text();
    let end = text
        .find(SENTENCE_TERMINATORS)
        .map_or(text.len(), |i| i + 1);
    text[..end].trim().to_string()
}
