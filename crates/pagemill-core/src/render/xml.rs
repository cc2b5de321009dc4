//! XML rendering.
//!
//! Well-formed XML for every legal document: a leading XML declaration,
//! a root `<document>` element carrying `base_url`/`title` attributes,
//! one child element per block, and entity escaping handled by the
//! `quick-xml` writer for both text content and attribute values.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::RenderError;
use crate::types::{Block, Document};

/// Render the whole document as indented XML with a declaration.
pub fn render(doc: &Document) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut root = BytesStart::new("document");
    root.push_attribute(("base_url", doc.base_url.as_str()));
    if let Some(title) = doc.title.as_deref() {
        root.push_attribute(("title", title));
    }

    if doc.blocks.is_empty() {
        writer.write_event(Event::Empty(root)).map_err(xml_err)?;
    } else {
        writer.write_event(Event::Start(root)).map_err(xml_err)?;
        for block in &doc.blocks {
            write_block(&mut writer, block)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("document")))
            .map_err(xml_err)?;
    }

    into_string(writer.into_inner())
}

/// One block as a compact XML element fragment, no declaration.
pub fn render_block(block: &Block) -> Result<String, RenderError> {
    let mut writer = Writer::new(Vec::new());
    write_block(&mut writer, block)?;
    into_string(writer.into_inner())
}

fn write_block<W: Write>(writer: &mut Writer<W>, block: &Block) -> Result<(), RenderError> {
    match block {
        Block::Heading { level, text } => {
            let level = level.to_string();
            text_element(writer, "heading", &[("level", &level)], text)
        },
        Block::Paragraph { text } => text_element(writer, "paragraph", &[], text),
        Block::List { ordered, items } => {
            let mut start = BytesStart::new("list");
            start.push_attribute(("ordered", if *ordered { "true" } else { "false" }));
            writer.write_event(Event::Start(start)).map_err(xml_err)?;
            for item in items {
                text_element(writer, "item", &[], item)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("list")))
                .map_err(xml_err)
        },
        Block::Blockquote { text } => text_element(writer, "blockquote", &[], text),
        Block::CodeBlock { language, text } => match language.as_deref() {
            Some(language) => text_element(writer, "code", &[("language", language)], text),
            None => text_element(writer, "code", &[], text),
        },
        Block::Link { text, href } => text_element(writer, "link", &[("href", href)], text),
        Block::Image { alt, src } => {
            let mut start = BytesStart::new("image");
            start.push_attribute(("alt", alt.as_str()));
            start.push_attribute(("src", src.as_str()));
            writer.write_event(Event::Empty(start)).map_err(xml_err)
        },
        Block::Table { header, rows } => {
            writer
                .write_event(Event::Start(BytesStart::new("table")))
                .map_err(xml_err)?;
            if !header.is_empty() {
                writer
                    .write_event(Event::Start(BytesStart::new("header")))
                    .map_err(xml_err)?;
                for cell in header {
                    text_element(writer, "cell", &[], cell)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("header")))
                    .map_err(xml_err)?;
            }
            for row in rows {
                writer
                    .write_event(Event::Start(BytesStart::new("row")))
                    .map_err(xml_err)?;
                for cell in row {
                    text_element(writer, "cell", &[], cell)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("row")))
                    .map_err(xml_err)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("table")))
                .map_err(xml_err)
        },
    }
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<(), RenderError> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)
}

fn into_string(bytes: Vec<u8>) -> Result<String, RenderError> {
    String::from_utf8(bytes).map_err(|e| RenderError::Xml(e.to_string()))
}

fn xml_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Xml(err.to_string())
}
