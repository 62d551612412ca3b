//! Arena-allocated document tree.
//!
//! html5ever parses into this tree through [`super::tree_sink::DocumentSink`].
//! Nodes live in one vector and link to each other by index, so the section
//! locator can walk parents and siblings freely without reference counting.

use std::collections::HashMap;

use html5ever::QualName;

/// Tags whose text never contributes to extracted content.
const SILENT_TAGS: &[&str] = &["script", "style"];

/// Class of the "[edit]" link spans that wiki renderers put inside headings.
const EDIT_SECTION_CLASS: &str = "mw-editsection";

/// Index of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    fn into_option(self) -> Option<NodeId> {
        if self.is_some() { Some(self) } else { None }
    }
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted `id` attribute.
        id: Option<String>,
        /// Pre-extracted, whitespace-split `class` attribute.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

/// Element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node and its tree links.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// One parsed HTML page.
///
/// Built once per input file and dropped when extraction finishes. All
/// read accessors take `&self`; nothing in the extraction path mutates it.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    /// First element carrying each `id` value, in creation order.
    id_map: HashMap<String, NodeId>,
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId::NONE,
            id_map: HashMap::new(),
        };
        doc.root = doc.alloc(Node::new(NodeData::Document));
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// The document root (not the `<html>` element).
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ------------------------------------------------------------------
    // Construction (used by the tree sink)
    // ------------------------------------------------------------------

    pub(crate) fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            match attr.name.local.as_ref() {
                "id" => id = Some(attr.value.clone()),
                "class" => {
                    classes = attr
                        .value
                        .split_whitespace()
                        .map(str::to_string)
                        .collect();
                }
                _ => {}
            }
        }

        let node_id = self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id: id.clone(),
            classes,
        }));

        if let Some(id_str) = id {
            self.id_map.entry(id_str).or_insert(node_id);
        }

        node_id
    }

    /// Merge attributes the element does not have yet, keeping the cached
    /// `id`, classes and id index in step.
    pub(crate) fn add_attrs_if_missing(&mut self, target: NodeId, attrs: Vec<Attribute>) {
        let mut new_id = None;
        if let Some(node) = self.get_mut(target)
            && let NodeData::Element {
                attrs: existing,
                id,
                classes,
                ..
            } = &mut node.data
        {
            for attr in attrs {
                if existing.iter().any(|a| a.name == attr.name) {
                    continue;
                }
                match attr.name.local.as_ref() {
                    "id" => {
                        *id = Some(attr.value.clone());
                        new_id = Some(attr.value.clone());
                    }
                    "class" => {
                        *classes = attr
                            .value
                            .split_whitespace()
                            .map(str::to_string)
                            .collect();
                    }
                    _ => {}
                }
                existing.push(attr);
            }
        }

        if let Some(id_str) = new_id {
            self.id_map.entry(id_str).or_insert(target);
        }
    }

    pub(crate) fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    pub(crate) fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub(crate) fn create_doctype(&mut self, name: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype(name)))
    }

    /// Append `child` as the last child of `parent`.
    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub(crate) fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to `parent`, merging into a trailing text node if there is one.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings. Its own subtree stays intact.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.into_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.into_option())
    }

    /// Iterate over the direct children of a node.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            doc: self,
            current: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Iterate over `id` and then each of its ancestors up to the root.
    pub fn ancestors_or_self(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            current: if self.get(id).is_some() { id } else { NodeId::NONE },
        }
    }

    /// Pre-order (document order) iteration over every node below `id`,
    /// not including `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            scope: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// First element whose `id` attribute equals `value`.
    pub fn get_by_id(&self, value: &str) -> Option<NodeId> {
        self.id_map.get(value).copied()
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    /// Local tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name.local.as_ref()),
            _ => None,
        })
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    pub fn attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Heading rank for `h1`..`h6`.
    pub fn heading_level(&self, id: NodeId) -> Option<u8> {
        match self.tag(id)? {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Raw string of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// All text below a node, one piece per text node, joined by single
    /// spaces and trimmed.
    ///
    /// Script and style bodies and wiki "[edit]" links are left out.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut pieces = Vec::new();
        self.collect_text(id, &mut pieces);
        pieces.join(" ").trim().to_string()
    }

    /// Pre-order walk with an explicit stack; page nesting depth is unbounded.
    fn collect_text<'a>(&'a self, id: NodeId, pieces: &mut Vec<&'a str>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            match &node.data {
                NodeData::Text(s) => {
                    pieces.push(s);
                    continue;
                }
                NodeData::Element { name, classes, .. } => {
                    if SILENT_TAGS.contains(&name.local.as_ref())
                        || classes.iter().any(|c| c == EDIT_SECTION_CLASS)
                    {
                        continue;
                    }
                }
                NodeData::Document => {}
                NodeData::Comment(_) | NodeData::Doctype(_) => continue,
            }

            // Reversed so the first child is popped first.
            let mark = stack.len();
            stack.extend(self.children(current));
            stack[mark..].reverse();
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.doc.get(id).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(id)
    }
}

/// Iterator from a node up to the document root.
pub struct Ancestors<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.doc.get(id).map_or(NodeId::NONE, |n| n.parent);
        Some(id)
    }
}

/// Pre-order iterator bounded to the subtree under `scope`.
pub struct Descendants<'a> {
    doc: &'a Document,
    scope: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        let node = self.doc.get(current)?;

        self.next = if node.first_child.is_some() {
            node.first_child
        } else {
            // Climb until a node with an unvisited next sibling, without
            // leaving the scope.
            let mut cursor = current;
            loop {
                if cursor == self.scope {
                    break NodeId::NONE;
                }
                let Some(n) = self.doc.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_some() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if cursor.is_none() || cursor == self.scope {
                    break NodeId::NONE;
                }
            }
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use html5ever::{LocalName, ns};

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: qname(name),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_elements() {
        let mut doc = Document::new();
        let div = doc.create_element(
            qname("div"),
            vec![attr("id", "main"), attr("class", "mw-parser-output ltr")],
        );
        doc.append(doc.root(), div);

        assert_eq!(doc.tag(div), Some("div"));
        assert_eq!(doc.element_id(div), Some("main"));
        assert_eq!(doc.get_by_id("main"), Some(div));
        assert!(doc.has_class(div, "ltr"));
        assert_eq!(doc.attr(div, "class"), Some("mw-parser-output ltr"));
    }

    #[test]
    fn test_first_id_wins() {
        let mut doc = Document::new();
        let first = doc.create_element(qname("span"), vec![attr("id", "ca")]);
        let second = doc.create_element(qname("span"), vec![attr("id", "ca")]);
        doc.append(doc.root(), first);
        doc.append(doc.root(), second);

        assert_eq!(doc.get_by_id("ca"), Some(first));
    }

    #[test]
    fn test_text_merging() {
        let mut doc = Document::new();
        let p = doc.create_element(qname("p"), vec![]);
        doc.append(doc.root(), p);
        doc.append_text(p, "Hello, ");
        doc.append_text(p, "World!");

        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_descendants_stay_in_scope() {
        let mut doc = Document::new();
        let a = doc.create_element(qname("div"), vec![]);
        let a1 = doc.create_element(qname("p"), vec![]);
        let a2 = doc.create_element(qname("p"), vec![]);
        let a1x = doc.create_element(qname("b"), vec![]);
        let b = doc.create_element(qname("div"), vec![]);
        doc.append(doc.root(), a);
        doc.append(doc.root(), b);
        doc.append(a, a1);
        doc.append(a, a2);
        doc.append(a1, a1x);

        let under_a: Vec<_> = doc.descendants(a).collect();
        assert_eq!(under_a, vec![a1, a1x, a2]);

        let under_root: Vec<_> = doc.descendants(doc.root()).collect();
        assert_eq!(under_root, vec![a, a1, a1x, a2, b]);

        assert_eq!(doc.descendants(a1x).count(), 0);
    }

    #[test]
    fn test_ancestors_include_self() {
        let mut doc = Document::new();
        let outer = doc.create_element(qname("details"), vec![]);
        let inner = doc.create_element(qname("span"), vec![]);
        doc.append(doc.root(), outer);
        doc.append(outer, inner);

        let chain: Vec<_> = doc.ancestors_or_self(inner).collect();
        assert_eq!(chain, vec![inner, outer, doc.root()]);
    }

    #[test]
    fn test_detach_relinks_siblings() {
        let mut doc = Document::new();
        let ul = doc.create_element(qname("ul"), vec![]);
        let items: Vec<_> = (0..3)
            .map(|_| doc.create_element(qname("li"), vec![]))
            .collect();
        doc.append(doc.root(), ul);
        for &li in &items {
            doc.append(ul, li);
        }

        doc.detach(items[1]);
        let left: Vec<_> = doc.children(ul).collect();
        assert_eq!(left, vec![items[0], items[2]]);
        assert_eq!(doc.parent(items[1]), None);
    }

    #[test]
    fn test_text_content_skips_edit_links() {
        let mut doc = Document::new();
        let h3 = doc.create_element(qname("h3"), vec![]);
        let edit = doc.create_element(qname("span"), vec![attr("class", "mw-editsection")]);
        doc.append(doc.root(), h3);
        doc.append_text(h3, "Noun");
        doc.append(h3, edit);
        doc.append_text(edit, "[edit]");

        assert_eq!(doc.text_content(h3), "Noun");
        assert_eq!(doc.heading_level(h3), Some(3));
    }

    #[test]
    fn test_text_content_order_and_silent_tags() {
        let mut doc = Document::new();
        let li = doc.create_element(qname("li"), vec![]);
        let b = doc.create_element(qname("b"), vec![]);
        let script = doc.create_element(qname("script"), vec![]);
        doc.append(doc.root(), li);
        doc.append_text(li, "one");
        doc.append(li, b);
        doc.append_text(b, "two");
        doc.append(li, script);
        doc.append_text(script, "var x;");
        doc.append_text(li, "three");

        assert_eq!(doc.text_content(li), "one two three");
    }

    #[test]
    fn test_text_content_deep_nesting() {
        let mut doc = Document::new();
        let mut parent = doc.root();
        for _ in 0..200_000 {
            let span = doc.create_element(qname("span"), vec![]);
            doc.append(parent, span);
            parent = span;
        }
        doc.append_text(parent, "deep");

        assert_eq!(doc.text_content(doc.root()), "deep");
    }
}
