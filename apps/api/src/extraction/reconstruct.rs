//! Deterministic text reconstruction from positioned fragments.
//!
//! The UI's client-side PDF text layer hands us fragments tagged with a
//! page index and a vertical coordinate. Reassembly is pure ordering: pages
//! ascending, then top of page first, same-coordinate fragments joined
//! left-to-right in encounter order. Identical input always yields a
//! byte-identical string.

use serde::Deserialize;

use crate::extraction::ExtractError;

/// Minimum reconstructed length before a document counts as readable.
/// Anything shorter is an image-only or empty upload; we reject rather
/// than attempt OCR.
pub const MIN_EXTRACTABLE_CHARS: usize = 50;

/// One positioned text run from the document's text layer.
#[derive(Debug, Clone, Deserialize)]
pub struct TextFragment {
    pub page: u32,
    /// Vertical coordinate within the page; smaller means closer to the top.
    pub y: f64,
    pub text: String,
}

/// Reassembles fragments into plain text and applies the minimum-length
/// gate. Fails with `InsufficientText` before any provider is contacted.
pub fn reconstruct(fragments: &[TextFragment]) -> Result<String, ExtractError> {
    ensure_min_length(reassemble(fragments))
}

fn reassemble(fragments: &[TextFragment]) -> String {
    let mut ordered: Vec<&TextFragment> = fragments.iter().collect();
    // Stable sort: encounter order survives for fragments on the same line.
    ordered.sort_by(|a, b| a.page.cmp(&b.page).then(a.y.total_cmp(&b.y)));

    let mut out = String::new();
    let mut current: Option<(u32, f64)> = None;

    for fragment in ordered {
        let trimmed = fragment.text.trim();
        if trimmed.is_empty() {
            continue;
        }
        match current {
            None => {}
            Some((page, _)) if page != fragment.page => out.push_str("\n\n"),
            Some((_, y)) if y != fragment.y => out.push('\n'),
            Some(_) => out.push(' '),
        }
        out.push_str(trimmed);
        current = Some((fragment.page, fragment.y));
    }
    out
}

/// Applies the readability gate shared by both upload paths.
pub fn ensure_min_length(text: String) -> Result<String, ExtractError> {
    let chars = text.trim().chars().count();
    if chars < MIN_EXTRACTABLE_CHARS {
        return Err(ExtractError::InsufficientText {
            chars,
            min: MIN_EXTRACTABLE_CHARS,
        });
    }
    Ok(text)
}

/// Server-side decode for raw PDF uploads. The embedded text layer is
/// pulled out in document order; the same length gate applies.
pub fn text_from_pdf_bytes(bytes: &[u8]) -> Result<String, ExtractError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Decode(e.to_string()))?;
    ensure_min_length(text)
}
