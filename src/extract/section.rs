//! Views over regions of a [`Document`].
//!
//! A [`Section`] is either a real element subtree or a [`Slice`]: a heading
//! plus the element siblings that follow it, up to the next heading of the
//! same or higher rank. Slices stand in for subsections on pages that never
//! wrap them in a container. They only hold node ids, never copies.

use std::iter;

use crate::dom::{Document, NodeId};

/// Wrapper class put around headings by newer wiki renderers.
const HEADING_WRAPPER_CLASS: &str = "mw-heading";

/// A located region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// An element and everything below it.
    Subtree(NodeId),
    /// A heading and the content up to the next comparable heading.
    Slice(Slice),
}

impl Section {
    /// Every node inside the section, in document order.
    ///
    /// For a subtree the root itself is not included; for a slice every
    /// member is, followed by its descendants.
    pub fn nodes<'a>(&self, doc: &'a Document) -> Box<dyn Iterator<Item = NodeId> + 'a> {
        match *self {
            Section::Subtree(root) => Box::new(doc.descendants(root)),
            Section::Slice(slice) => Box::new(
                slice
                    .members(doc)
                    .flat_map(move |m| iter::once(m).chain(doc.descendants(m))),
            ),
        }
    }

    /// Elements inside the section with one of the given tags.
    pub fn elements<'a>(
        self,
        doc: &'a Document,
        tags: &'a [&'a str],
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes(doc)
            .filter(move |&id| doc.tag(id).is_some_and(|t| tags.contains(&t)))
    }

    pub fn has_element(&self, doc: &Document, tag: &str) -> bool {
        self.nodes(doc).any(|id| doc.is_tag(id, tag))
    }

    /// The element the section is rooted at, or the slice's first member.
    pub fn anchor(&self) -> NodeId {
        match self {
            Section::Subtree(root) => *root,
            Section::Slice(slice) => slice.start,
        }
    }
}

/// A run of sibling elements starting at a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// The heading, or its wrapper `div` when it has one.
    start: NodeId,
    /// First sibling not included; `None` runs to the last sibling.
    end: Option<NodeId>,
}

impl Slice {
    /// Build the slice introduced by `heading`.
    pub fn from_heading(doc: &Document, heading: NodeId) -> Slice {
        let start = doc
            .parent(heading)
            .filter(|&p| is_heading_wrapper(doc, p))
            .unwrap_or(heading);
        let level = doc.heading_level(heading).unwrap_or(u8::MAX);

        let end = iter::successors(doc.next_sibling(start), |&id| doc.next_sibling(id))
            .find(|&id| boundary_level(doc, id).is_some_and(|l| l <= level));

        Slice { start, end }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> Option<NodeId> {
        self.end
    }

    /// The start node and following element siblings, text nodes skipped.
    pub fn members<'a>(self, doc: &'a Document) -> impl Iterator<Item = NodeId> + 'a {
        let end = self.end;
        iter::successors(Some(self.start), move |&id| doc.next_sibling(id))
            .take_while(move |&id| Some(id) != end)
            .filter(move |&id| doc.is_element(id))
    }
}

fn is_heading_wrapper(doc: &Document, id: NodeId) -> bool {
    doc.is_tag(id, "div") && doc.has_class(id, HEADING_WRAPPER_CLASS)
}

/// Heading rank of a sibling: a heading element, or a wrapper around one.
fn boundary_level(doc: &Document, id: NodeId) -> Option<u8> {
    if let Some(level) = doc.heading_level(id) {
        return Some(level);
    }
    if is_heading_wrapper(doc, id) {
        return doc.children(id).find_map(|c| doc.heading_level(c));
    }
    None
}
