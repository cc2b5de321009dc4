use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Normalized, format-agnostic model of one parsed HTML input.
///
/// Immutable once returned by the parser: renderers and the chunker only
/// ever take `&Document`, so one document can be read concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: Option<String>,
    /// Base used to resolve relative references during parsing.
    pub base_url: String,
    /// Blocks in document order; order is preserved end-to-end through
    /// rendering and chunking.
    pub blocks: Vec<Block>,
}

impl Document {
    /// An empty document for the given base URL.
    #[must_use]
    pub const fn empty(base_url: String) -> Self {
        Self {
            title: None,
            base_url,
            blocks: Vec::new(),
        }
    }
}

/// One structural unit of a [`Document`].
///
/// Every `href`/`src` stored here is an absolute URL; resolution against
/// the document base happens exactly once, during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        /// 1 through 6.
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Blockquote {
        text: String,
    },
    CodeBlock {
        language: Option<String>,
        /// Verbatim content; internal whitespace is never collapsed.
        text: String,
    },
    Link {
        text: String,
        href: String,
    },
    Image {
        alt: String,
        src: String,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// A bounded-length slice of rendered content plus heading-hierarchy
/// metadata, sized for retrieval use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the output sequence, stable and contiguous from 0.
    pub index: usize,
    /// Chunk content; at most `chunk_size + overlap` characters except
    /// possibly the final chunk.
    pub text: String,
    /// Stack of enclosing headings at the point the chunk begins.
    pub heading_path: Vec<String>,
    /// Copied from the owning document's `base_url`.
    pub source_url: String,
}

/// Interchange format produced by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Markdown,
    Json,
    Xml,
}

impl Format {
    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunking parameters, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    /// Target maximum chunk length.
    pub chunk_size: usize,
    /// Number of trailing characters repeated at the start of the next
    /// chunk. Must be strictly smaller than `chunk_size`.
    pub overlap: usize,
}

impl ChunkOptions {
    /// Default chunk size, sized for retrieval embedding windows.
    pub const DEFAULT_CHUNK_SIZE: usize = 1600;
    /// Default overlap between consecutive chunks.
    pub const DEFAULT_OVERLAP: usize = 200;

    /// Validate the `overlap < chunk_size` precondition.
    pub const fn validate(&self) -> Result<(), ChunkError> {
        if self.overlap >= self.chunk_size {
            return Err(ChunkError::InvalidParameters {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            overlap: Self::DEFAULT_OVERLAP,
        }
    }
}

/// What the caller wants out of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Target interchange format for the rendered text.
    pub format: Format,
    /// When set, the output also carries retrieval chunks.
    pub chunk: Option<ChunkOptions>,
}

impl ConversionRequest {
    /// Render-only request for the given format.
    #[must_use]
    pub const fn rendered(format: Format) -> Self {
        Self {
            format,
            chunk: None,
        }
    }

    /// Request rendering plus chunking with the given parameters.
    #[must_use]
    pub const fn chunked(format: Format, options: ChunkOptions) -> Self {
        Self {
            format,
            chunk: Some(options),
        }
    }
}

/// Per-input result of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The document rendered in the requested format.
    pub rendered: String,
    /// Retrieval chunks, present when the request asked for them.
    pub chunks: Option<Vec<Chunk>>,
}

/// Aggregate outcome of a batch run, for front-end reporting
/// ("3 of 50 documents failed to parse").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_tagged_serialization() {
        let block = Block::Heading {
            level: 2,
            text: "Install".to_string(),
        };

        let json = serde_json::to_string(&block).expect("Should serialize");
        assert!(json.contains("\"type\":\"heading\""));
        assert!(json.contains("\"level\":2"));

        let back: Block = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(back, block);
    }

    #[test]
    fn test_code_block_variant_name() {
        let block = Block::CodeBlock {
            language: Some("rust".to_string()),
            text: "fn main() {}".to_string(),
        };
        let json = serde_json::to_string(&block).expect("Should serialize");
        assert!(json.contains("\"type\":\"code_block\""));
    }

    #[test]
    fn test_chunk_options_validation() {
        assert!(
            ChunkOptions {
                chunk_size: 8,
                overlap: 2,
            }
            .validate()
            .is_ok()
        );

        let err = ChunkOptions {
            chunk_size: 5,
            overlap: 5,
        }
        .validate()
        .expect_err("equal overlap must be rejected");
        assert_eq!(
            err,
            ChunkError::InvalidParameters {
                chunk_size: 5,
                overlap: 5,
            }
        );
    }

    #[test]
    fn test_format_names_round_trip() {
        for format in [Format::Markdown, Format::Json, Format::Xml] {
            let json = serde_json::to_string(&format).expect("Should serialize");
            assert_eq!(json, format!("\"{format}\""));
        }
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::empty("https://x.test/".to_string());
        assert!(doc.title.is_none());
        assert!(doc.blocks.is_empty());
        assert_eq!(doc.base_url, "https://x.test/");
    }
}
