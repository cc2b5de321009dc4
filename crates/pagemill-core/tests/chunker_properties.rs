//! Property tests for chunk coverage, size bounds, and JSON round-trips.

use proptest::prelude::*;

use pagemill_core::{Block, ChunkOptions, Document, Format, chunk_markdown, render};

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?]{0,80}"
}

fn arb_block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (1u8..=6, arb_text()).prop_map(|(level, text)| Block::Heading { level, text }),
        arb_text().prop_map(|text| Block::Paragraph { text }),
        (any::<bool>(), prop::collection::vec(arb_text(), 0..5))
            .prop_map(|(ordered, items)| Block::List { ordered, items }),
        arb_text().prop_map(|text| Block::Blockquote { text }),
        (prop::option::of("[a-z]{1,8}"), "[a-z\n ]{0,120}")
            .prop_map(|(language, text)| Block::CodeBlock { language, text }),
        (arb_text(), "[a-z]{1,10}").prop_map(|(text, tail)| Block::Link {
            text,
            href: format!("https://x.test/{tail}"),
        }),
        (arb_text(), "[a-z]{1,10}").prop_map(|(alt, tail)| Block::Image {
            alt,
            src: format!("https://x.test/{tail}.png"),
        }),
    ]
}

fn arb_document() -> impl Strategy<Value = Document> {
    prop::collection::vec(arb_block(), 0..12).prop_map(|blocks| Document {
        title: None,
        base_url: "https://x.test/".to_string(),
        blocks,
    })
}

/// `(chunk_size, overlap)` with the `overlap < chunk_size` precondition.
fn arb_chunk_options() -> impl Strategy<Value = ChunkOptions> {
    (2usize..200).prop_flat_map(|chunk_size| {
        (Just(chunk_size), 0usize..chunk_size).prop_map(|(chunk_size, overlap)| ChunkOptions {
            chunk_size,
            overlap,
        })
    })
}

fn reconstruct(chunks: &[pagemill_core::Chunk], overlap: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(&chunk.text);
        } else {
            let skip = chunk
                .text
                .char_indices()
                .nth(overlap)
                .map_or(chunk.text.len(), |(idx, _)| idx);
            out.push_str(&chunk.text[skip..]);
        }
    }
    out
}

proptest! {
    /// Stripping each non-first chunk's overlap prefix and concatenating
    /// reconstructs the rendered text with no content loss.
    #[test]
    fn chunk_coverage(doc in arb_document(), options in arb_chunk_options()) {
        let chunks = chunk_markdown(&doc, &options).expect("valid options");
        let rendered = render(&doc, Format::Markdown).expect("render");
        prop_assert_eq!(reconstruct(&chunks, options.overlap), rendered);
    }

    /// Every chunk fits in `chunk_size + overlap` characters.
    #[test]
    fn chunk_size_bound(doc in arb_document(), options in arb_chunk_options()) {
        let chunks = chunk_markdown(&doc, &options).expect("valid options");
        for chunk in &chunks {
            prop_assert!(chunk.text.chars().count() <= options.chunk_size + options.overlap);
        }
    }

    /// Chunk indices are contiguous from zero and carry the source URL.
    #[test]
    fn chunk_indices_contiguous(doc in arb_document(), options in arb_chunk_options()) {
        let chunks = chunk_markdown(&doc, &options).expect("valid options");
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
            prop_assert_eq!(chunk.source_url.as_str(), "https://x.test/");
        }
    }

    /// A document with blocks always renders deterministically and its
    /// JSON form round-trips to an equivalent block sequence.
    #[test]
    fn json_round_trip(doc in arb_document()) {
        let rendered = render(&doc, Format::Json).expect("render");
        let parsed: Document = serde_json::from_str(&rendered).expect("valid JSON");
        prop_assert_eq!(parsed.blocks, doc.blocks);
    }

    /// Chunking an empty document is a no-op, never an error.
    #[test]
    fn empty_document_yields_no_chunks(options in arb_chunk_options()) {
        let doc = Document::empty("https://x.test/".to_string());
        let chunks = chunk_markdown(&doc, &options).expect("valid options");
        prop_assert!(chunks.is_empty());
    }
}
