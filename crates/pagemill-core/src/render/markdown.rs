//! Markdown rendering.

use std::fmt::Write as _;

use crate::types::{Block, Document};

/// Render the whole document: block fragments joined by one blank line.
#[must_use]
pub fn render(doc: &Document) -> String {
    let fragments: Vec<String> = doc.blocks.iter().map(render_block).collect();
    fragments.join("\n\n")
}

/// Render one block as a Markdown fragment with no trailing newline.
#[must_use]
#[allow(clippy::expect_used)] // write! to a String cannot fail
pub fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("{} {text}", "#".repeat(usize::from(*level)))
        },
        Block::Paragraph { text } => text.clone(),
        Block::List { ordered, items } => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                if *ordered {
                    write!(out, "{}. {item}", i + 1).expect("write to String");
                } else {
                    write!(out, "- {item}").expect("write to String");
                }
            }
            out
        },
        Block::Blockquote { text } => format!("> {text}"),
        Block::CodeBlock { language, text } => {
            let language = language.as_deref().unwrap_or_default();
            format!("```{language}\n{text}\n```")
        },
        Block::Link { text, href } => format!("[{text}]({href})"),
        Block::Image { alt, src } => format!("![{alt}]({src})"),
        Block::Table { header, rows } => render_table(header, rows),
    }
}

fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    if !header.is_empty() {
        push_row(&mut out, header);
        out.push('\n');
        push_row(&mut out, &vec!["---".to_string(); header.len()]);
        if !rows.is_empty() {
            out.push('\n');
        }
    }
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_row(&mut out, row);
    }
    out
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for cell in cells {
        out.push(' ');
        out.push_str(cell);
        out.push_str(" |");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let doc = Document {
            title: Some("Title".into()),
            base_url: "https://x.test/".into(),
            blocks: vec![
                Block::Heading {
                    level: 1,
                    text: "Title".into(),
                },
                Block::Paragraph {
                    text: "Hello world.".into(),
                },
            ],
        };
        assert_eq!(render(&doc), "# Title\n\nHello world.");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            render_block(&Block::Heading {
                level: 3,
                text: "Deep".into(),
            }),
            "### Deep"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render_block(&Block::List {
                ordered: false,
                items: vec!["a".into(), "b".into()],
            }),
            "- a\n- b"
        );
        assert_eq!(
            render_block(&Block::List {
                ordered: true,
                items: vec!["a".into(), "b".into()],
            }),
            "1. a\n2. b"
        );
    }

    #[test]
    fn test_code_block_fence() {
        assert_eq!(
            render_block(&Block::CodeBlock {
                language: Some("rust".into()),
                text: "fn main() {}".into(),
            }),
            "```rust\nfn main() {}\n```"
        );
        assert_eq!(
            render_block(&Block::CodeBlock {
                language: None,
                text: "plain".into(),
            }),
            "```\nplain\n```"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            render_block(&Block::Link {
                text: "docs".into(),
                href: "https://x.test/docs".into(),
            }),
            "[docs](https://x.test/docs)"
        );
        assert_eq!(
            render_block(&Block::Image {
                alt: "logo".into(),
                src: "https://x.test/l.png".into(),
            }),
            "![logo](https://x.test/l.png)"
        );
    }

    #[test]
    fn test_pipe_table() {
        let table = Block::Table {
            header: vec!["Name".into(), "Age".into()],
            rows: vec![vec!["Ada".into(), "36".into()]],
        };
        assert_eq!(
            render_block(&table),
            "| Name | Age |\n| --- | --- |\n| Ada | 36 |"
        );
    }

    #[test]
    fn test_headerless_table() {
        let table = Block::Table {
            header: vec![],
            rows: vec![vec!["a".into()], vec!["b".into()]],
        };
        assert_eq!(render_block(&table), "| a |\n| b |");
    }

    #[test]
    fn test_empty_document_renders_empty() {
        let doc = Document::empty("https://x.test/".into());
        assert_eq!(render(&doc), "");
    }
}
