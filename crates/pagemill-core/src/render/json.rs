//! JSON rendering.
//!
//! The JSON form is a structured dump of the document model itself:
//! `title`, `base_url`, and `blocks` as top-level keys, each block a
//! tagged object mirroring the [`Block`] variants 1:1. Parsing the
//! rendering back with `serde_json` reconstructs an equivalent block
//! sequence, which is what downstream consumers rely on.

use crate::error::RenderError;
use crate::types::{Block, Document};

/// Render the whole document as pretty-printed JSON.
///
/// Valid JSON for every legal document, including an empty one
/// (`"blocks": []`). Indentation is for readability only.
pub fn render(doc: &Document) -> Result<String, RenderError> {
    serde_json::to_string_pretty(doc).map_err(|e| RenderError::Json(e.to_string()))
}

/// One block as a compact JSON object fragment.
pub fn render_block(block: &Block) -> Result<String, RenderError> {
    serde_json::to_string(block).map_err(|e| RenderError::Json(e.to_string()))
}
