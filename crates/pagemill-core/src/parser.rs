//! HTML to [`Document`] parsing.
//!
//! One [`Html::parse_document`] pass builds the tree; one traversal of
//! the main content region classifies elements into [`Block`]s, skipping
//! unwanted subtrees at visit time so boilerplate removal never needs a
//! second full-tree pass. References are resolved against the base URL
//! here, exactly once.
//!
//! The parser is permissive: unknown tags degrade to paragraph
//! text, malformed references stay literal, and only input that cannot
//! be tokenized as HTML at all is rejected.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::ParseError;
use crate::selectors::{SelectorGroup, selector_cache};
use crate::types::{Block, Document};
use crate::url_resolver;
use crate::utils::collapse_whitespace;

/// Default cap on raw HTML input size: 10 MiB.
pub const DEFAULT_MAX_HTML_BYTES: usize = 10 * 1024 * 1024;

/// Knobs for a single parse.
///
/// The process-wide selector cache is never mutated; per-call additions
/// are compiled on the spot.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// CSS selectors pruned in addition to the cached unwanted set.
    pub extra_unwanted: Vec<String>,
    /// Overrides the main-content probe when set.
    pub content_selector: Option<String>,
    /// Inputs above this many bytes fail with [`ParseError::TooLarge`].
    pub max_html_bytes: usize,
}

impl ParseOptions {
    /// Prune additional selectors on top of the cached unwanted set.
    #[must_use]
    pub fn with_extra_unwanted(mut self, selectors: Vec<String>) -> Self {
        self.extra_unwanted = selectors;
        self
    }

    /// Use `selector` as the content region instead of probing.
    #[must_use]
    pub fn with_content_selector(mut self, selector: impl Into<String>) -> Self {
        self.content_selector = Some(selector.into());
        self
    }

    /// Override the input size cap.
    #[must_use]
    pub const fn with_max_html_bytes(mut self, max: usize) -> Self {
        self.max_html_bytes = max;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extra_unwanted: Vec::new(),
            content_selector: None,
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
        }
    }
}

/// Parse one HTML input into a [`Document`] with default options.
pub fn parse(html: &str, base_url: &str) -> Result<Document, ParseError> {
    parse_with_options(html, base_url, &ParseOptions::default())
}

/// Parse one HTML input into a [`Document`].
///
/// Fails only when the input cannot be tokenized as HTML at all
/// (empty/binary input) or exceeds the configured size cap; everything
/// else degrades rather than erroring.
pub fn parse_with_options(
    html: &str,
    base_url: &str,
    options: &ParseOptions,
) -> Result<Document, ParseError> {
    if html.len() > options.max_html_bytes {
        return Err(ParseError::TooLarge {
            size: html.len(),
            limit: options.max_html_bytes,
        });
    }
    if html.trim().is_empty() || html.contains('\0') {
        return Err(ParseError::Malformed);
    }

    let dom = Html::parse_document(html);
    let base = url_resolver::parse_base(base_url);
    let cache = selector_cache();

    let extra_unwanted = compile_extra_unwanted(&options.extra_unwanted);
    let title = extract_title(&dom, cache.title());

    let region = content_region(&dom, options.content_selector.as_deref());

    let mut collector = Collector {
        base: base.as_ref(),
        unwanted: cache.unwanted(),
        extra_unwanted: &extra_unwanted,
        blocks: Vec::new(),
        paragraph: String::new(),
        skipped_subtrees: 0,
    };
    if let Some(region) = region {
        collector.walk(region);
    }
    collector.flush_paragraph();

    debug!(
        blocks = collector.blocks.len(),
        skipped = collector.skipped_subtrees,
        "parsed document"
    );

    let title = title.or_else(|| {
        collector.blocks.iter().find_map(|block| match block {
            Block::Heading { text, .. } => Some(text.clone()),
            _ => None,
        })
    });

    Ok(Document {
        title,
        base_url: base_url.to_string(),
        blocks: collector.blocks,
    })
}

fn compile_extra_unwanted(expressions: &[String]) -> Vec<Selector> {
    expressions
        .iter()
        .filter_map(|expr| match Selector::parse(expr) {
            Ok(selector) => Some(selector),
            Err(err) => {
                warn!(selector = %expr, error = ?err, "ignoring invalid extra unwanted selector");
                None
            },
        })
        .collect()
}

fn extract_title(dom: &Html, title_group: &SelectorGroup) -> Option<String> {
    let element = title_group.iter().find_map(|s| dom.select(s).next())?;
    let text: String = element.text().collect();
    let text = collapse_whitespace(&text).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Locate the root content region: explicit override, then the cached
/// main-content candidates in priority order, then `<body>`.
fn content_region<'a>(dom: &'a Html, override_selector: Option<&str>) -> Option<ElementRef<'a>> {
    if let Some(expr) = override_selector {
        match Selector::parse(expr) {
            Ok(selector) => {
                if let Some(region) = dom.select(&selector).next() {
                    return Some(region);
                }
                debug!(selector = %expr, "content selector override matched nothing; probing");
            },
            Err(err) => {
                warn!(selector = %expr, error = ?err, "invalid content selector override; probing");
            },
        }
    }

    let cache = selector_cache();
    if let Some(region) = cache.main_content().iter().find_map(|s| dom.select(s).next()) {
        return Some(region);
    }

    debug!("no main-content match; falling back to <body>");
    cache
        .body()
        .iter()
        .find_map(|s| dom.select(s).next())
        .or_else(|| Some(dom.root_element()))
}

struct Collector<'a> {
    base: Option<&'a Url>,
    unwanted: &'static SelectorGroup,
    extra_unwanted: &'a [Selector],
    blocks: Vec<Block>,
    paragraph: String,
    skipped_subtrees: usize,
}

impl Collector<'_> {
    fn is_unwanted(&self, element: &ElementRef<'_>) -> bool {
        self.unwanted.matches(element) || self.extra_unwanted.iter().any(|s| s.matches(element))
    }

    /// Classify the children of `element` in document order.
    ///
    /// Block-level children flush the open paragraph and emit their own
    /// block; inline children and bare text accumulate into the nearest
    /// open paragraph; unknown containers recurse so their text degrades
    /// to paragraph content.
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    self.paragraph.push_str(text);
                },
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.is_unwanted(&child_el) {
                        self.skipped_subtrees += 1;
                        continue;
                    }
                    self.element(child_el);
                },
                _ => {},
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name();
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_paragraph();
                let level = tag.as_bytes()[1] - b'0';
                let text = self.inline_text(element);
                if !text.is_empty() {
                    self.blocks.push(Block::Heading { level, text });
                }
            },
            "p" => {
                self.flush_paragraph();
                let text = self.inline_text(element);
                if !text.is_empty() {
                    self.blocks.push(Block::Paragraph { text });
                }
            },
            "ul" | "ol" => {
                self.flush_paragraph();
                self.list(element, tag == "ol");
            },
            "blockquote" => {
                self.flush_paragraph();
                let text = self.inline_text(element);
                if !text.is_empty() {
                    self.blocks.push(Block::Blockquote { text });
                }
            },
            "pre" => {
                self.flush_paragraph();
                self.code_block(element);
            },
            "table" => {
                self.flush_paragraph();
                self.table(element);
            },
            "img" => {
                self.flush_paragraph();
                if let Some(src) = element.value().attr("src") {
                    let alt = element.value().attr("alt").unwrap_or_default();
                    self.blocks.push(Block::Image {
                        alt: collapse_whitespace(alt).trim().to_string(),
                        src: url_resolver::resolve(self.base, src),
                    });
                }
            },
            "hr" => {
                self.flush_paragraph();
            },
            "br" => {
                self.paragraph.push(' ');
            },
            // Inline markup at block level flows into the open paragraph.
            "a" | "span" | "code" | "strong" | "b" | "em" | "i" | "small" | "sub" | "sup"
            | "mark" | "abbr" | "time" => {
                let mut inline = String::new();
                self.inline_element(element, &mut inline);
                if !self.paragraph.is_empty() && !self.paragraph.ends_with(char::is_whitespace) {
                    self.paragraph.push(' ');
                }
                self.paragraph.push_str(&inline);
            },
            // Containers and unknown tags degrade to their contents.
            _ => {
                self.walk(element);
            },
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = collapse_whitespace(&self.paragraph).trim().to_string();
        self.paragraph.clear();
        if !text.is_empty() {
            self.blocks.push(Block::Paragraph { text });
        }
    }

    /// Linearized inline text of an element, with links, images, code
    /// spans, and emphasis embedded in inline syntax and whitespace
    /// collapsed.
    fn inline_text(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.append_inline(element, &mut out);
        collapse_whitespace(&out).trim().to_string()
    }

    fn append_inline(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    out.push_str(text);
                },
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.is_unwanted(&child_el) {
                        continue;
                    }
                    self.inline_element(child_el, out);
                },
                _ => {},
            }
        }
    }

    fn inline_element(&self, element: ElementRef<'_>, out: &mut String) {
        let inner = |this: &Self| -> String {
            let mut buf = String::new();
            this.append_inline(element, &mut buf);
            collapse_whitespace(&buf).trim().to_string()
        };

        match element.value().name() {
            "a" => {
                let text = inner(self);
                match element.value().attr("href") {
                    Some(href) => {
                        let href = url_resolver::resolve(self.base, href);
                        if text.is_empty() {
                            out.push_str(&href);
                        } else {
                            out.push_str(&format!("[{text}]({href})"));
                        }
                    },
                    None => out.push_str(&text),
                }
            },
            "img" => {
                if let Some(src) = element.value().attr("src") {
                    let src = url_resolver::resolve(self.base, src);
                    let alt = element.value().attr("alt").unwrap_or_default().trim();
                    out.push_str(&format!("![{alt}]({src})"));
                }
            },
            "code" => {
                let text = inner(self);
                if !text.is_empty() {
                    out.push_str(&format!("`{text}`"));
                }
            },
            "strong" | "b" => {
                let text = inner(self);
                if !text.is_empty() {
                    out.push_str(&format!("**{text}**"));
                }
            },
            "em" | "i" => {
                let text = inner(self);
                if !text.is_empty() {
                    out.push_str(&format!("*{text}*"));
                }
            },
            "br" => {
                out.push(' ');
            },
            _ => {
                self.append_inline(element, out);
            },
        }
    }

    /// A list whose items are single anchors becomes a run of [`Block::Link`]
    /// blocks; anything else stays a [`Block::List`].
    fn list(&mut self, element: ElementRef<'_>, ordered: bool) {
        let items: Vec<ElementRef<'_>> = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "li" && !self.is_unwanted(el))
            .collect();
        if items.is_empty() {
            return;
        }

        if let Some(links) = self.as_link_group(&items) {
            self.blocks.extend(
                links
                    .into_iter()
                    .map(|(text, href)| Block::Link { text, href }),
            );
            return;
        }

        let texts: Vec<String> = items
            .iter()
            .map(|li| self.inline_text(*li))
            .filter(|text| !text.is_empty())
            .collect();
        if !texts.is_empty() {
            self.blocks.push(Block::List {
                ordered,
                items: texts,
            });
        }
    }

    /// `Some` when every item holds exactly one anchor and no other text.
    fn as_link_group(&self, items: &[ElementRef<'_>]) -> Option<Vec<(String, String)>> {
        let mut links = Vec::with_capacity(items.len());
        for li in items {
            let anchors: Vec<ElementRef<'_>> = li
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "a")
                .collect();
            let [anchor] = anchors.as_slice() else {
                return None;
            };
            let href = anchor.value().attr("href")?;

            let anchor_text: String = anchor.text().collect();
            let li_text: String = li.text().collect();
            if collapse_whitespace(&li_text).trim() != collapse_whitespace(&anchor_text).trim() {
                return None;
            }

            let text = collapse_whitespace(&anchor_text).trim().to_string();
            if text.is_empty() {
                return None;
            }
            links.push((text, url_resolver::resolve(self.base, href)));
        }
        Some(links)
    }

    fn code_block(&mut self, element: ElementRef<'_>) {
        let language = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "code")
            .and_then(|code| code.value().attr("class"))
            .and_then(code_language);

        // Verbatim: code content is the one place whitespace survives.
        let text: String = element.text().collect();
        let text = text.trim_end_matches('\n').to_string();
        if !text.is_empty() {
            self.blocks.push(Block::CodeBlock { language, text });
        }
    }

    fn table(&mut self, element: ElementRef<'_>) {
        let rows: Vec<ElementRef<'_>> = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr")
            .collect();
        if rows.is_empty() {
            return;
        }

        let mut header = Vec::new();
        let mut body = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let cells: Vec<ElementRef<'_>> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .collect();
            if cells.is_empty() {
                continue;
            }

            let texts: Vec<String> = cells.iter().map(|cell| self.inline_text(*cell)).collect();
            let in_thead = row
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|el| el.value().name() == "thead");
            let all_th = cells.iter().all(|cell| cell.value().name() == "th");

            if header.is_empty() && body.is_empty() && (in_thead || (i == 0 && all_th)) {
                header = texts;
            } else {
                body.push(texts);
            }
        }

        if !header.is_empty() || !body.is_empty() {
            self.blocks.push(Block::Table {
                header,
                rows: body,
            });
        }
    }
}

fn code_language(class_attr: &str) -> Option<String> {
    class_attr.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .map(ToString::to_string)
    })
}
