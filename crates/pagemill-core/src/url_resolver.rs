//! Reference resolution against a document base URL.
//!
//! Every `href`/`src` stored in a [`Block`](crate::Block) is resolved
//! here exactly once, during parsing. Malformed references are kept as
//! the literal source text rather than dropped, so degraded documents
//! still carry whatever the author wrote.

use tracing::{debug, warn};
use url::Url;

/// Parse the document base URL.
///
/// A base that does not parse is reported once per document; references
/// are then kept literal instead of resolved.
#[must_use]
pub fn parse_base(base_url: &str) -> Option<Url> {
    match Url::parse(base_url) {
        Ok(url) => Some(url),
        Err(err) => {
            warn!(error = %err, %base_url, "base URL did not parse; keeping references literal");
            None
        },
    }
}

/// Resolve one reference against the base.
///
/// Standard URL-resolution rules apply: relative paths, protocol-relative
/// references, fragments, and queries resolve the way a browser would;
/// absolute references pass through unchanged. A reference that cannot be
/// resolved is returned verbatim.
#[must_use]
pub fn resolve(base: Option<&Url>, reference: &str) -> String {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Some(base) = base else {
        return trimmed.to_string();
    };

    match base.join(trimmed) {
        Ok(resolved) => resolved.into(),
        Err(err) => {
            debug!(error = %err, reference = %trimmed, "unresolvable reference kept literal");
            trimmed.to_string()
        },
    }
}
