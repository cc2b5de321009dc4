//! Error types and handling for pagemill-core operations.
//!
//! Errors are split per pipeline stage so callers can tell input errors
//! (bad HTML, bad chunk parameters) apart from programming errors
//! (renderer invariant violations, worker pool construction failures).
//!
//! ## Error Categories
//!
//! - **Parse Errors**: the input could not be tokenized as HTML at all
//! - **Chunk Errors**: invalid chunking parameters supplied by the caller
//! - **Render Errors**: renderer-internal failures; unreachable for any
//!   well-formed [`Document`](crate::Document)
//! - **Worker Pool Errors**: the batch orchestrator could not spawn workers
//!
//! Parsing is deliberately permissive: malformed *substructure* degrades to
//! plain text instead of erroring, so the parse-error surface is limited to
//! inputs that are not HTML text at all.
//!
//! ```rust
//! use pagemill_core::{parse, ParseError};
//!
//! match parse("", "https://example.com/") {
//!     Err(ParseError::Malformed) => eprintln!("not HTML"),
//!     Err(e) => eprintln!("parse failed: {e}"),
//!     Ok(doc) => println!("{} blocks", doc.blocks.len()),
//! }
//! ```

use thiserror::Error;

/// Failure to turn raw input into a [`Document`](crate::Document).
///
/// The parser only fails when the input cannot be tokenized as HTML at
/// all; anything that tokenizes degrades to paragraph text instead of
/// erroring. A failed document never affects its batch siblings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input is empty or is not HTML text (e.g. binary data).
    #[error("input could not be tokenized as HTML")]
    Malformed,

    /// The input exceeds the configured size cap.
    ///
    /// The cap exists so a single oversized document cannot exhaust
    /// memory during a large batch run; see
    /// [`ParseOptions::max_html_bytes`](crate::ParseOptions).
    #[error("HTML input too large: {size} bytes (limit {limit})")]
    TooLarge {
        /// Size of the rejected input in bytes.
        size: usize,
        /// Configured maximum in bytes.
        limit: usize,
    },
}

/// Failure to chunk a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// `overlap` must be strictly smaller than `chunk_size`.
    ///
    /// Caller error, surfaced immediately and never retried.
    #[error("invalid chunk parameters: overlap {overlap} must be < chunk_size {chunk_size}")]
    InvalidParameters {
        /// Requested maximum chunk length in characters.
        chunk_size: usize,
        /// Requested overlap length in characters.
        overlap: usize,
    },

    /// The chunker renders per-block fragments in the requested format;
    /// a renderer failure propagates here. Unreachable for well-formed
    /// documents.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Renderer-internal failure.
///
/// Rendering is a total function over any well-formed
/// [`Document`](crate::Document), so these variants indicate a
/// programming error rather than an input error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// JSON serialization of the document model failed.
    #[error("JSON serialization failed: {0}")]
    Json(String),

    /// XML writing failed.
    #[error("XML writing failed: {0}")]
    Xml(String),
}

/// The main error type for pagemill-core operations.
///
/// All public functions return `Result<T, Error>` or a stage-specific
/// error type; stage errors convert into `Error` via `From`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The document could not be parsed; see [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Chunking parameters were invalid; see [`ChunkError`].
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// A renderer violated an internal invariant; see [`RenderError`].
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The batch orchestrator could not construct its worker pool.
    ///
    /// This is the only whole-batch failure mode; per-document failures
    /// are captured in their result slot instead.
    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

impl Error {
    /// Stable category name for logging and metrics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Chunk(_) => "chunk",
            Self::Render(_) => "render",
            Self::WorkerPool(_) => "worker_pool",
        }
    }

    /// Whether this error was caused by caller-supplied input rather
    /// than an internal invariant violation.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Chunk(_))
    }
}

/// Result alias used throughout pagemill-core.
pub type Result<T, E = Error> = std::result::Result<T, E>;
