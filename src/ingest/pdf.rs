//! PDF text-layer extraction.

/// Extract the text layer of a PDF.
///
/// Wrapped in catch_unwind: pdf-extract (and its font parsers) can panic on
/// malformed fonts/glyphs.
pub(super) fn extract(bytes: &[u8]) -> Result<String, String> {
    tracing::debug!("[DocumentParser] PDF size: {} bytes", bytes.len());

    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    })) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            tracing::warn!("[DocumentParser] PDF extraction failed: {}", e);
            Err(format!("PDF extraction failed: {}", e))
        }
        Err(_panic) => {
            tracing::error!("[DocumentParser] PDF extraction panicked - likely malformed font/glyph");
            Err("PDF extraction panicked - likely contains malformed fonts".to_string())
        }
    }
}
