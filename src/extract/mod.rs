//! Per-page extraction: locate the language section, then read its
//! definitions.
//!
//! An [`Extractor`] holds everything that stays fixed for a run (strategies,
//! language, exclusions) and is shared read-only across worker threads.

mod definitions;
mod locate;
mod section;

use std::path::Path;

use tracing::trace;

pub use definitions::{ExcludedSections, extract_definitions};
pub use locate::{
    CapitalizedIdAnchor, ContainerScan, HeadingId, HeadingText, Headline, IdAnchor,
    LanguageQuery, LocateStrategy, Locator, Match, PageLanguage, TitleMarker,
    enclosing_container,
};
pub use section::{Section, Slice};

use crate::config::Config;
use crate::dom::{self, Document};
use crate::entry::Entry;
use crate::error::{Error, Result};

/// Turns pages into entries for one language.
#[derive(Debug)]
pub struct Extractor {
    locator: Locator,
    query: LanguageQuery,
    excluded: ExcludedSections,
}

impl Extractor {
    pub fn new(query: LanguageQuery, excluded: ExcludedSections) -> Self {
        Self {
            locator: Locator::new(),
            query,
            excluded,
        }
    }

    /// Extractor for `lang_code`, with the display name and exclusions
    /// taken from `config`.
    pub fn for_language(lang_code: &str, config: &Config) -> Self {
        let name = config.lookup_language(lang_code).map(str::to_string);
        Self::new(
            LanguageQuery::new(lang_code, name),
            ExcludedSections::new(&config.excluded_sections),
        )
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn query(&self) -> &LanguageQuery {
        &self.query
    }

    pub fn excluded(&self) -> &ExcludedSections {
        &self.excluded
    }

    /// Entry for `word` from an already parsed page.
    pub fn extract_document(&self, word: &str, doc: &Document) -> Result<Entry> {
        let section = self.locate_section(doc)?;
        self.build_entry(word, doc, &section)
    }

    pub fn locate_section(&self, doc: &Document) -> Result<Section> {
        self.locator
            .locate(doc, &self.query)
            .ok_or_else(|| Error::LanguageNotFound(self.query.code().to_string()))
    }

    /// Entry for `word` from a section found by [`locate_section`](Self::locate_section).
    pub fn build_entry(&self, word: &str, doc: &Document, section: &Section) -> Result<Entry> {
        let definitions = extract_definitions(doc, section, &self.excluded);
        trace!(word, labels = definitions.len(), "extracted");
        Entry::new(word, definitions).ok_or(Error::NoDefinitions)
    }

    /// Read, parse and extract one file. The word is the file name.
    pub fn extract_file(&self, path: &Path) -> Result<Entry> {
        let doc = dom::read_document(path)?;
        let word = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.extract_document(&word, &doc)
    }
}
