//! Retrieval chunking with heading-path metadata.
//!
//! Blocks are rendered to flat text in the requested format and pushed
//! through a rolling buffer that cuts a chunk whenever it reaches
//! `chunk_size` characters, seeding the next chunk with the last
//! `overlap` characters of the cut. Each character is written into the
//! buffer at most twice (once on arrival, at most once as overlap/tail
//! carry), so chunking is O(n) in the rendered length. Never re-derive
//! an overlap by scanning from the start of the document.
//!
//! Cuts prefer a natural boundary (paragraph break, sentence end,
//! newline, word gap) inside a bounded look-back window before falling
//! back to a hard cut at a character boundary.

use tracing::debug;

use crate::error::ChunkError;
use crate::render::render_block_fragment;
use crate::types::{Block, Chunk, ChunkOptions, Document, Format};

/// Maximum characters scanned backwards for a natural cut point.
const BOUNDARY_LOOKBACK: usize = 48;

/// Block separator in the flat text stream; matches the renderers.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Chunk a document's rendered text.
///
/// `overlap < chunk_size` is a precondition; violating it fails with
/// [`ChunkError::InvalidParameters`] before any work happens. A document
/// with zero blocks yields zero chunks. A single block larger than
/// `chunk_size` is split purely by the rolling-buffer rule.
pub fn chunk(
    doc: &Document,
    options: &ChunkOptions,
    format: Format,
) -> Result<Vec<Chunk>, ChunkError> {
    options.validate()?;

    let mut chunker = RollingChunker::new(doc.base_url.clone(), options);
    for (i, block) in doc.blocks.iter().enumerate() {
        if let Block::Heading { level, text } = block {
            chunker.enter_heading(*level, text);
        }
        if i > 0 {
            chunker.feed(BLOCK_SEPARATOR);
        }
        let fragment = render_block_fragment(block, format)?;
        chunker.feed(&fragment);
    }
    let chunks = chunker.finish();

    debug!(
        chunks = chunks.len(),
        chunk_size = options.chunk_size,
        overlap = options.overlap,
        format = %format,
        "chunked document"
    );
    Ok(chunks)
}

/// Chunk the Markdown rendering; the common retrieval path.
pub fn chunk_markdown(doc: &Document, options: &ChunkOptions) -> Result<Vec<Chunk>, ChunkError> {
    chunk(doc, options, Format::Markdown)
}

struct RollingChunker {
    source_url: String,
    chunk_size: usize,
    overlap: usize,
    buffer: String,
    buffer_chars: usize,
    /// Heading stack as (level, text), innermost last.
    heading_stack: Vec<(u8, String)>,
    /// Snapshot of the stack at the point the open chunk began.
    chunk_path: Vec<String>,
    chunk_path_taken: bool,
    /// Whether the buffer holds anything beyond the seeded overlap.
    has_fresh_content: bool,
    chunks: Vec<Chunk>,
}

impl RollingChunker {
    fn new(source_url: String, options: &ChunkOptions) -> Self {
        Self {
            source_url,
            chunk_size: options.chunk_size,
            overlap: options.overlap,
            buffer: String::with_capacity(options.chunk_size.min(64 * 1024)),
            buffer_chars: 0,
            heading_stack: Vec::new(),
            chunk_path: Vec::new(),
            chunk_path_taken: false,
            has_fresh_content: false,
            chunks: Vec::new(),
        }
    }

    /// Pop to the enclosing level, then push; equal-or-lower headings
    /// close their siblings.
    fn enter_heading(&mut self, level: u8, text: &str) {
        while self
            .heading_stack
            .last()
            .is_some_and(|(open, _)| *open >= level)
        {
            self.heading_stack.pop();
        }
        self.heading_stack.push((level, text.to_string()));
    }

    fn current_path(&self) -> Vec<String> {
        self.heading_stack
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Push text through the rolling buffer, cutting as it fills.
    fn feed(&mut self, text: &str) {
        let mut pos = 0;
        while pos < text.len() {
            if !self.chunk_path_taken {
                self.chunk_path = self.current_path();
                self.chunk_path_taken = true;
            }

            let capacity = self.chunk_size - self.buffer_chars;
            let (take_bytes, take_chars) = take_chars(&text[pos..], capacity);
            self.buffer.push_str(&text[pos..pos + take_bytes]);
            self.buffer_chars += take_chars;
            self.has_fresh_content = true;
            pos += take_bytes;

            if self.buffer_chars >= self.chunk_size {
                self.cut();
            }
        }
    }

    /// Cut one chunk off the front of the full buffer and seed the next
    /// one with the trailing `overlap` characters.
    fn cut(&mut self) {
        let cut_byte = self.find_cut_position();
        let chunk_text = &self.buffer[..cut_byte];
        let tail = &self.buffer[cut_byte..];

        let seed_start = start_of_last_chars(chunk_text, self.overlap);
        let mut next_buffer = String::with_capacity(self.buffer.len());
        next_buffer.push_str(&chunk_text[seed_start..]);
        next_buffer.push_str(tail);
        let tail_chars = tail.chars().count();
        let tail_is_empty = tail.is_empty();

        self.chunks.push(Chunk {
            index: self.chunks.len(),
            text: chunk_text.to_string(),
            heading_path: std::mem::take(&mut self.chunk_path),
            source_url: self.source_url.clone(),
        });

        self.buffer = next_buffer;
        self.buffer_chars = self.overlap + tail_chars;
        // The seed is the next chunk's beginning, so it inherits the
        // heading context in effect at the cut.
        self.chunk_path = self.current_path();
        self.chunk_path_taken = true;
        self.has_fresh_content = !tail_is_empty;
    }

    /// Byte position to cut at: a natural boundary inside the look-back
    /// window, or the end of the buffer for a hard cut. The window never
    /// reaches back into the first `overlap + 1` characters, so every
    /// cut makes forward progress.
    fn find_cut_position(&self) -> usize {
        let min_cut_char = self.overlap + 1;
        let lookback = BOUNDARY_LOOKBACK.min(self.chunk_size.saturating_sub(min_cut_char));
        if lookback == 0 {
            return self.buffer.len();
        }

        let window_start_char = self.chunk_size - lookback;
        let window_start = crate::utils::char_offset(&self.buffer, window_start_char);
        let window = self.buffer.as_bytes().get(window_start..).unwrap_or(&[]);

        if let Some(p) = memchr::memmem::rfind(window, b"\n\n") {
            return window_start + p + 2;
        }
        let sentence = [&b". "[..], &b"! "[..], &b"? "[..]]
            .iter()
            .filter_map(|pat| memchr::memmem::rfind(window, pat))
            .max();
        if let Some(p) = sentence {
            return window_start + p + 2;
        }
        if let Some(p) = memchr::memrchr(b'\n', window) {
            return window_start + p + 1;
        }
        if let Some(p) = memchr::memrchr(b' ', window) {
            return window_start + p + 1;
        }
        self.buffer.len()
    }

    fn finish(mut self) -> Vec<Chunk> {
        if self.has_fresh_content && !self.buffer.is_empty() {
            self.chunks.push(Chunk {
                index: self.chunks.len(),
                text: std::mem::take(&mut self.buffer),
                heading_path: std::mem::take(&mut self.chunk_path),
                source_url: self.source_url.clone(),
            });
        }
        self.chunks
    }
}

/// Byte length and character count of up to `n` characters from the
/// front of `s`.
fn take_chars(s: &str, n: usize) -> (usize, usize) {
    let mut chars = 0;
    for (idx, _) in s.char_indices() {
        if chars == n {
            return (idx, chars);
        }
        chars += 1;
    }
    (s.len(), chars)
}

/// Byte offset where the last `n` characters of `s` begin.
fn start_of_last_chars(s: &str, n: usize) -> usize {
    if n == 0 {
        return s.len();
    }
    let mut start = s.len();
    for (count, (idx, _)) in s.char_indices().rev().enumerate() {
        start = idx;
        if count + 1 == n {
            break;
        }
    }
    start
}
