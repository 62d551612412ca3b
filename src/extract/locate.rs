//! Finding a language's section on a page.
//!
//! Wiktionary editions mark language sections in incompatible ways: id'd
//! spans, heading ids, heading text, headline spans, page-level language
//! markers. Each convention is one [`LocateStrategy`]; a [`Locator`] tries
//! them in a fixed order and returns the first hit. No strategy mutates the
//! document.

use tracing::{debug, trace};

use crate::config::{CONTAINER_TAG, capitalize};
use crate::dom::{Document, NodeId};

use super::section::Section;

/// Id of the page-title marker used by some editions.
const TITLE_MARKER_ID: &str = "title_0";

/// Class substring of headline spans.
const HEADLINE_CLASS: &str = "mw-headline";

/// Class substring of the main content container.
const CONTENT_CLASS: &str = "mw-parser-output";

/// The language being searched for.
#[derive(Debug, Clone)]
pub struct LanguageQuery {
    code: String,
    name: Option<String>,
    code_lower: String,
    name_lower: Option<String>,
}

impl LanguageQuery {
    /// `name` is the display name, when one is known for `code`.
    pub fn new(code: impl Into<String>, name: Option<String>) -> Self {
        let code = code.into();
        let code_lower = code.to_lowercase();
        let name_lower = name.as_deref().map(str::to_lowercase);
        Self {
            code,
            name,
            code_lower,
            name_lower,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether heading text mentions the code or the display name,
    /// ignoring case.
    pub fn text_matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        text.contains(&self.code_lower)
            || self
                .name_lower
                .as_deref()
                .is_some_and(|name| text.contains(name))
    }
}

/// One way of finding a language section.
pub trait LocateStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The section for `query`, or `None` to let the next strategy try.
    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section>;
}

/// Nearest `details` element at or above `id`.
pub fn enclosing_container(doc: &Document, id: NodeId) -> Option<NodeId> {
    doc.ancestors_or_self(id)
        .find(|&n| doc.is_tag(n, CONTAINER_TAG))
}

/// First candidate that sits inside a container, as that container.
fn first_contained(
    doc: &Document,
    candidates: impl IntoIterator<Item = NodeId>,
) -> Option<Section> {
    candidates
        .into_iter()
        .find_map(|id| enclosing_container(doc, id))
        .map(Section::Subtree)
}

fn elements<'a>(
    doc: &'a Document,
    scope: NodeId,
    tags: &'a [&'a str],
) -> impl Iterator<Item = NodeId> + 'a {
    doc.descendants(scope)
        .filter(move |&id| doc.tag(id).is_some_and(|t| tags.contains(&t)))
}

fn attr_contains(doc: &Document, id: NodeId, attr: &str, needle: &str) -> bool {
    doc.attr(id, attr).is_some_and(|v| v.contains(needle))
}

/// An element whose id is the language code, e.g. `<span id="ca">`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdAnchor;

impl LocateStrategy for IdAnchor {
    fn name(&self) -> &'static str {
        "id-anchor"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        first_contained(doc, doc.get_by_id(query.code()))
    }
}

/// Same as [`IdAnchor`] with the code capitalized, e.g. `<span id="Ca">`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapitalizedIdAnchor;

impl LocateStrategy for CapitalizedIdAnchor {
    fn name(&self) -> &'static str {
        "capitalized-id-anchor"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        first_contained(doc, doc.get_by_id(&capitalize(query.code())))
    }
}

/// An `h2`/`h3` whose id contains the display name.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingId;

impl LocateStrategy for HeadingId {
    fn name(&self) -> &'static str {
        "heading-id"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        let name = query.name()?;
        first_contained(
            doc,
            elements(doc, doc.root(), &["h2", "h3"])
                .filter(|&id| doc.element_id(id).is_some_and(|v| v.contains(name))),
        )
    }
}

/// An `h2` whose text mentions the code or the display name.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingText;

impl LocateStrategy for HeadingText {
    fn name(&self) -> &'static str {
        "heading-text"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        first_contained(
            doc,
            elements(doc, doc.root(), &["h2"])
                .filter(|&id| query.text_matches(&doc.text_content(id))),
        )
    }
}

/// A headline `span` whose text contains the display name.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headline;

impl LocateStrategy for Headline {
    fn name(&self) -> &'static str {
        "headline"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        let name = query.name()?.to_lowercase();
        first_contained(
            doc,
            elements(doc, doc.root(), &["span"]).filter(|&id| {
                attr_contains(doc, id, "class", HEADLINE_CLASS)
                    && doc.text_content(id).to_lowercase().contains(&name)
            }),
        )
    }
}

/// Headings next to a `div#title_0` page-title marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleMarker;

impl LocateStrategy for TitleMarker {
    fn name(&self) -> &'static str {
        "title-marker"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        let marker = doc.get_by_id(TITLE_MARKER_ID)?;
        if !doc.is_tag(marker, "div") {
            return None;
        }
        let scope = doc.parent(marker)?;
        first_contained(
            doc,
            elements(doc, scope, &["h2", "h3"])
                .filter(|&id| query.text_matches(&doc.text_content(id))),
        )
    }
}

/// Pages written entirely in the language: any element whose class or
/// `lang` attribute mentions the code selects the main content `div`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageLanguage;

impl LocateStrategy for PageLanguage {
    fn name(&self) -> &'static str {
        "page-language"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        let code = query.code();
        let marked = doc.descendants(doc.root()).any(|id| {
            attr_contains(doc, id, "class", code) || attr_contains(doc, id, "lang", code)
        });
        if !marked {
            return None;
        }
        doc.descendants(doc.root())
            .find(|&id| doc.is_tag(id, "div") && attr_contains(doc, id, "class", CONTENT_CLASS))
            .map(Section::Subtree)
    }
}

/// Any container whose first `h2`/`h3` mentions the language.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerScan;

impl LocateStrategy for ContainerScan {
    fn name(&self) -> &'static str {
        "container-scan"
    }

    fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        doc.descendants(doc.root())
            .filter(|&id| doc.is_tag(id, CONTAINER_TAG))
            .find(|&container| {
                elements(doc, container, &["h2", "h3"])
                    .next()
                    .is_some_and(|h| query.text_matches(&doc.text_content(h)))
            })
            .map(Section::Subtree)
    }
}

/// A located section and the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub section: Section,
    pub strategy: &'static str,
}

/// Ordered list of strategies.
pub struct Locator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Locator {
    /// The built-in strategies, most specific first.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(IdAnchor),
            Box::new(CapitalizedIdAnchor),
            Box::new(HeadingId),
            Box::new(HeadingText),
            Box::new(Headline),
            Box::new(TitleMarker),
            Box::new(PageLanguage),
            Box::new(ContainerScan),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn LocateStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First strategy that finds a section.
    pub fn find(&self, doc: &Document, query: &LanguageQuery) -> Option<Match> {
        for strategy in &self.strategies {
            if let Some(section) = strategy.locate(doc, query) {
                debug!(strategy = strategy.name(), lang = query.code(), "language section found");
                return Some(Match {
                    section,
                    strategy: strategy.name(),
                });
            }
            trace!(strategy = strategy.name(), "no match");
        }
        None
    }

    pub fn locate(&self, doc: &Document, query: &LanguageQuery) -> Option<Section> {
        self.find(doc, query).map(|m| m.section)
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
