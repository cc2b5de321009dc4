//! Process-wide cache of compiled CSS selectors.
//!
//! Selector expressions are compiled exactly once, on first access, and
//! shared read-only across every parse for the life of the process. The
//! cache is small and fixed at startup; there is no eviction and no
//! mutation after construction, so the read path needs no locking.
//!
//! Hardcoded selector expressions that fail to compile are a bug in this
//! crate, not a runtime condition, hence the panic in the builder.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::debug;

/// Elements whose subtrees never carry content worth keeping.
const UNWANTED: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "nav",
    "header",
    "footer",
    "aside",
    "form",
    "iframe",
    "svg",
    ".sidebar",
    ".advertisement",
    ".cookie-banner",
    ".breadcrumbs",
];

/// Containers probed, in priority order, for the main content region.
const MAIN_CONTENT: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#main-content",
    ".main-content",
    "#content",
    ".content",
    ".post-content",
    ".entry-content",
    "[itemprop='articleBody']",
];

const TITLE: &[&str] = &["title"];

const BODY: &[&str] = &["body"];

static CACHE: LazyLock<SelectorCache> = LazyLock::new(|| {
    let cache = SelectorCache {
        unwanted: SelectorGroup::compile("unwanted", UNWANTED),
        main_content: SelectorGroup::compile("main-content", MAIN_CONTENT),
        title: SelectorGroup::compile("title", TITLE),
        body: SelectorGroup::compile("body", BODY),
    };
    debug!(
        unwanted = cache.unwanted.len(),
        main_content = cache.main_content.len(),
        "compiled selector cache"
    );
    cache
});

/// A named, ordered set of compiled selectors.
#[derive(Debug)]
pub struct SelectorGroup {
    name: &'static str,
    selectors: Vec<Selector>,
}

impl SelectorGroup {
    #[allow(clippy::panic)] // invalid hardcoded selectors are a bug
    fn compile(name: &'static str, expressions: &[&str]) -> Self {
        let selectors = expressions
            .iter()
            .map(|expr| {
                Selector::parse(expr)
                    .unwrap_or_else(|e| panic!("invalid hardcoded selector {expr:?}: {e:?}"))
            })
            .collect();
        Self { name, selectors }
    }

    /// Symbolic name this group is registered under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of selectors in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Iterate the compiled selectors in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.selectors.iter()
    }

    /// Whether any selector in the group matches the element.
    #[must_use]
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }
}

/// Lazily-built, read-only table of the selector groups used by the
/// parser.
#[derive(Debug)]
pub struct SelectorCache {
    unwanted: SelectorGroup,
    main_content: SelectorGroup,
    title: SelectorGroup,
    body: SelectorGroup,
}

impl SelectorCache {
    /// Look up a group by its symbolic name.
    ///
    /// Returns `None` for unregistered names; asking for one is a
    /// programmer error, not a runtime condition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SelectorGroup> {
        match name {
            "unwanted" => Some(&self.unwanted),
            "main-content" => Some(&self.main_content),
            "title" => Some(&self.title),
            "body" => Some(&self.body),
            _ => None,
        }
    }

    /// Boilerplate subtrees to drop during the content walk.
    #[must_use]
    pub const fn unwanted(&self) -> &SelectorGroup {
        &self.unwanted
    }

    /// Main-content candidates in priority order.
    #[must_use]
    pub const fn main_content(&self) -> &SelectorGroup {
        &self.main_content
    }

    /// The document title element.
    #[must_use]
    pub const fn title(&self) -> &SelectorGroup {
        &self.title
    }

    /// The `<body>` fallback used when no main-content candidate matches.
    #[must_use]
    pub const fn body(&self) -> &SelectorGroup {
        &self.body
    }
}

/// Access the process-wide selector cache, building it on first use.
///
/// Construction is idempotent and race-free: `LazyLock` guarantees that
/// concurrent first callers all observe the one fully-built table.
pub fn selector_cache() -> &'static SelectorCache {
    &CACHE
}
