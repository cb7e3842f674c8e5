//! Human-readable dump of a wavelet's documents.

use std::fmt::Write;
use wavelet_ops::WaveletState;

/// Indentation of each document's initialization.
const INDENT: usize = 2;

/// Every document in id order, as its initialization operation.
///
/// ```text
/// b+1:
///   insert "Hello"
///
/// ```
pub fn describe(wavelet: &WaveletState) -> String {
    let mut out = String::new();
    for (id, doc) in wavelet.documents() {
        let _ = write!(
            out,
            "{}:\n{}\n\n",
            id,
            doc.to_initialization().to_pretty_string(INDENT)
        );
    }
    out
}
