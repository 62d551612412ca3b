//! Part-of-speech subsections and their definition lists.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::{CONTAINER_TAG, DEFAULT_EXCLUDED_SECTIONS, LEVEL_ATTR, POS_SECTION_LEVELS};
use crate::dom::{Document, NodeId};
use crate::entry::Definitions;
use crate::text::normalize;

use super::section::{Section, Slice};

const LABEL_HEADINGS: &[&str] = &["h2", "h3", "h4"];
const VIRTUAL_HEADINGS: &[&str] = &["h3", "h4"];

/// Section names that never become part-of-speech labels.
///
/// Matching ignores case, and a label is excluded when it contains an entry
/// or an entry contains it, so `Translations` also covers `Translations_2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedSections {
    names: Vec<String>,
}

impl ExcludedSections {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lowered: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() && !lowered.contains(&name) {
                lowered.push(name);
            }
        }
        Self { names: lowered }
    }

    pub fn none() -> Self {
        Self { names: Vec::new() }
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.names
            .iter()
            .any(|name| label.contains(name.as_str()) || name.contains(label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lower-cased names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ExcludedSections {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_SECTIONS)
    }
}

/// Collect `label -> definitions` from a language section.
///
/// Part-of-speech candidates are `details` containers at each level of
/// [`POS_SECTION_LEVELS`], pooled in that order. Pages without such
/// containers fall back to one [`Slice`] per `h3`/`h4` heading. Labels seen
/// twice keep their first position but take the later definitions.
pub fn extract_definitions(
    doc: &Document,
    section: &Section,
    excluded: &ExcludedSections,
) -> Definitions {
    let mut definitions = Definitions::new();

    if !section.has_element(doc, "ol") {
        trace!("no ordered lists in section");
        return definitions;
    }

    let mut candidates = container_candidates(doc, section);
    if candidates.is_empty() {
        candidates = section
            .elements(doc, VIRTUAL_HEADINGS)
            .map(|h| Section::Slice(Slice::from_heading(doc, h)))
            .collect();
        trace!(count = candidates.len(), "using heading slices");
    } else {
        trace!(count = candidates.len(), "using section containers");
    }

    for candidate in candidates {
        let Some(heading) = candidate.elements(doc, LABEL_HEADINGS).next() else {
            continue;
        };
        let label = normalize(&doc.text_content(heading));
        if label.is_empty() || excluded.matches(&label) {
            debug!(%label, "skipping section");
            continue;
        }

        let items: Vec<String> = list_items(doc, candidate)
            .into_iter()
            .map(|li| normalize(&doc.text_content(li)))
            .filter(|text| !text.is_empty())
            .collect();
        if items.is_empty() {
            trace!(%label, "no definitions");
            continue;
        }

        debug!(%label, count = items.len(), "definitions found");
        definitions.insert(label, items);
    }

    definitions
}

fn container_candidates(doc: &Document, section: &Section) -> Vec<Section> {
    let mut candidates = Vec::new();
    for level in POS_SECTION_LEVELS {
        let level = level.to_string();
        candidates.extend(
            section
                .nodes(doc)
                .filter(|&id| {
                    doc.is_tag(id, CONTAINER_TAG) && doc.attr(id, LEVEL_ATTR) == Some(level.as_str())
                })
                .map(Section::Subtree),
        );
    }
    candidates
}

/// Every `li` below an ordered list, each once, in document order. Items
/// of a `ul` nested inside a definition count as definitions too.
fn list_items(doc: &Document, section: Section) -> Vec<NodeId> {
    let mut nested = HashSet::new();
    let mut items = Vec::new();
    for ol in section.elements(doc, &["ol"]) {
        if nested.contains(&ol) {
            continue;
        }
        for id in doc.descendants(ol) {
            if doc.is_tag(id, "ol") {
                nested.insert(id);
            } else if doc.is_tag(id, "li") {
                items.push(id);
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::dom::parse_html_str;

    fn extract(html: &str) -> Definitions {
        extract_with(html, &ExcludedSections::default())
    }

    fn extract_with(html: &str, excluded: &ExcludedSections) -> Definitions {
        let doc = parse_html_str(html);
        let body = doc
            .descendants(doc.root())
            .find(|&id| doc.is_tag(id, "body"))
            .expect("body");
        extract_definitions(&doc, &Section::Subtree(body), excluded)
    }

    fn pairs(defs: &Definitions) -> Vec<(&str, Vec<&str>)> {
        defs.iter()
            .map(|(k, v)| (k.as_str(), v.iter().map(String::as_str).collect()))
            .collect()
    }

    #[test]
    fn test_container_section() {
        let defs = extract(
            r#"<details data-level="3"><h3>Noun</h3><ol><li>foo</li><li>bar</li></ol></details>"#,
        );
        assert_eq!(pairs(&defs), vec![("Noun", vec!["foo", "bar"])]);
    }

    #[test]
    fn test_heading_slices_isolate_sections() {
        let defs = extract(
            "<h3>Verb</h3><p>run (third-person runs)</p><ol><li>to run</li></ol>\
             <h3>Noun</h3><ol><li>a run</li><li>a score</li></ol>",
        );
        assert_eq!(
            pairs(&defs),
            vec![("Verb", vec!["to run"]), ("Noun", vec!["a run", "a score"])]
        );
    }

    #[test]
    fn test_no_ordered_lists() {
        assert!(extract("<details data-level=\"3\"><h3>Noun</h3><ul><li>x</li></ul></details>").is_empty());
    }

    #[test]
    fn test_levels_pooled_in_order() {
        let defs = extract(
            r#"<details data-level="2"><h2>Nom</h2><ol><li>a</li></ol></details>
               <details data-level="3"><h3>Verb</h3><ol><li>b</li></ol></details>
               <details data-level="4"><h4>Adjectiu</h4><ol><li>c</li></ol></details>
               <details data-level="5"><h4>Ignored</h4><ol><li>d</li></ol></details>"#,
        );
        let labels: Vec<&str> = defs.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["Verb", "Nom", "Adjectiu"]);
    }

    #[test]
    fn test_excluded_sections() {
        let defs = extract(
            r#"<details data-level="3"><h3>Nom</h3><ol><li>casa</li></ol></details>
               <details data-level="3"><h3>Traduccions_2</h3><ol><li>house</li></ol></details>
               <details data-level="3"><h3>see ALSO</h3><ol><li>home</li></ol></details>"#,
        );
        assert_eq!(pairs(&defs), vec![("Nom", vec!["casa"])]);
    }

    #[test]
    fn test_excluded_either_direction() {
        let excluded = ExcludedSections::new(["Translations of the word"]);
        assert!(excluded.matches("translations"));
        assert!(excluded.matches("TRANSLATIONS OF THE WORD (2)"));
        assert!(!excluded.matches("Noun"));
        assert!(!ExcludedSections::none().matches("Translations"));
    }

    #[test]
    fn test_duplicate_labels_last_write_wins() {
        let defs = extract(
            r#"<details data-level="3"><h3>Noun</h3><ol><li>first</li></ol></details>
               <details data-level="3"><h3>Verb</h3><ol><li>go</li></ol></details>
               <details data-level="3"><h3>Noun</h3><ol><li>second</li></ol></details>"#,
        );
        assert_eq!(
            pairs(&defs),
            vec![("Noun", vec!["second"]), ("Verb", vec!["go"])]
        );
    }

    #[test]
    fn test_item_text_is_normalized() {
        let defs = extract(
            r#"<details data-level="3"><h3> Noun <span class="mw-editsection">[edit]</span></h3>
               <ol><li><a href="/wiki/dwelling">dwelling</a> ( <i>archaic</i> ) ,</li>
               <li>   </li></ol></details>"#,
        );
        assert_eq!(pairs(&defs), vec![("Noun", vec!["dwelling (archaic),"])]);
    }

    #[test]
    fn test_nested_lists() {
        let defs = extract(
            r#"<details data-level="3"><h3>Noun</h3><ol>
                <li>outer<ol><li>inner</li></ol></li>
                <li>plain<ul><li>example quote</li></ul></li>
               </ol></details>"#,
        );
        assert_eq!(
            pairs(&defs),
            vec![(
                "Noun",
                vec!["outer inner", "inner", "plain example quote", "example quote"]
            )]
        );
    }

    #[test]
    fn test_slice_without_lists_is_skipped() {
        let defs = extract(
            "<h3>Etymology</h3><p>From Latin.</p><h3>Noun</h3><ol><li>thing</li></ol>",
        );
        assert_eq!(pairs(&defs), vec![("Noun", vec!["thing"])]);
    }

    proptest! {
        #[test]
        fn prop_excluded_and_empty_never_returned(
            labels in proptest::collection::vec("[A-Za-z_ ]{0,12}", 1..6),
            items in proptest::collection::vec("[a-z ]{0,8}", 0..4),
        ) {
            let excluded = ExcludedSections::new(["Translations", "See also"]);
            let mut html = String::new();
            for label in &labels {
                html.push_str("<details data-level=\"3\"><h3>");
                html.push_str(label);
                html.push_str("</h3><ol>");
                for item in &items {
                    html.push_str("<li>");
                    html.push_str(item);
                    html.push_str("</li>");
                }
                html.push_str("</ol></details>");
            }

            let defs = extract_with(&html, &excluded);
            for (label, list) in &defs {
                prop_assert!(!label.is_empty());
                prop_assert!(!excluded.matches(label));
                prop_assert!(!list.is_empty());
                prop_assert!(list.iter().all(|d| !d.is_empty()));
            }
        }
    }
}
