//! Dictionary entries.

use indexmap::IndexMap;

/// Part-of-speech label to definitions, in first-seen label order.
pub type Definitions = IndexMap<String, Vec<String>>;

/// One headword and its definitions.
///
/// An entry always has at least one label with at least one non-empty
/// definition; [`Entry::new`] refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    word: String,
    definitions: Definitions,
}

impl Entry {
    /// Build an entry, dropping empty definitions and labels left without
    /// any. Returns `None` if nothing remains.
    pub fn new(word: impl Into<String>, definitions: Definitions) -> Option<Entry> {
        let definitions: Definitions = definitions
            .into_iter()
            .filter(|(label, _)| !label.is_empty())
            .map(|(label, defs)| {
                let defs: Vec<String> = defs.into_iter().filter(|d| !d.is_empty()).collect();
                (label, defs)
            })
            .filter(|(_, defs)| !defs.is_empty())
            .collect();

        if definitions.is_empty() {
            return None;
        }
        Some(Entry {
            word: word.into(),
            definitions,
        })
    }

    /// The word as it appears in the file name.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The word for display, underscores shown as spaces.
    pub fn headword(&self) -> String {
        self.word.replace('_', " ")
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.values().map(Vec::len).sum()
    }
}
