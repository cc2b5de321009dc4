//! # pagemill-core
//!
//! Core conversion engine of pagemill - turns fetched HTML into a
//! normalized document model, renders that model to Markdown/JSON/XML,
//! and slices it into retrieval-sized chunks with heading-path metadata.
//!
//! This crate is the performance-critical half of a larger
//! content-acquisition tool: the surrounding layers fetch pages, cache
//! responses, and drive the front end; this crate is invoked once per
//! fetched document and has to stay fast and allocation-conscious over
//! large batches. It performs no I/O of its own.
//!
//! ## Architecture
//!
//! - **Selector Cache**: compiled CSS selectors, built once per process
//! - **Parser**: HTML → [`Document`] in a single tree pass
//! - **Renderers**: stateless `&Document` → Markdown/JSON/XML
//! - **Chunker**: linear-time rolling-buffer chunking
//! - **Batch**: order-preserving fan-out over OS-thread workers
//!
//! ## Quick Start
//!
//! ```rust
//! use pagemill_core::{convert, ConversionRequest, Format};
//!
//! let request = ConversionRequest::rendered(Format::Markdown);
//! let output = convert(
//!     "<h1>Title</h1><p>Hello world.</p>",
//!     "https://example.com/",
//!     &request,
//! )?;
//! assert_eq!(output.rendered, "# Title\n\nHello world.");
//! # Ok::<(), pagemill_core::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Documents are immutable after parsing and owned by one conversion
//! request each; the selector cache is the only process-wide shared
//! state and is read-only after its one-time construction. All public
//! types are `Send + Sync` where appropriate.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`] with per-stage error
//! types. Parsing is permissive: malformed substructure degrades to
//! plain text, and only input that cannot be tokenized as HTML at all
//! fails.

/// Batch orchestration over a bounded worker pool
pub mod batch;
/// Linear-time retrieval chunking
pub mod chunker;
/// Error types and result aliases
pub mod error;
/// HTML to document-model parsing
pub mod parser;
/// Markdown, JSON, and XML renderers
pub mod render;
/// Process-wide compiled selector cache
pub mod selectors;
/// Core data types and structures
pub mod types;
/// Reference resolution against a base URL
pub mod url_resolver;
/// Safe string helpers
pub mod utils;

// Re-export commonly used types
pub use batch::{convert, convert_many, convert_many_with_workers, summarize};
pub use chunker::{chunk, chunk_markdown};
pub use error::{ChunkError, Error, ParseError, RenderError, Result};
pub use parser::{DEFAULT_MAX_HTML_BYTES, ParseOptions, parse, parse_with_options};
pub use render::render;
pub use selectors::{SelectorCache, SelectorGroup, selector_cache};
pub use types::*;
