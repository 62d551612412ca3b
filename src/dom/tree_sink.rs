//! html5ever `TreeSink` that builds a [`Document`].

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{Attribute, Document, NodeId};

/// Name reported for handles that are not elements.
static NO_NAME: QualName = QualName {
    prefix: None,
    ns: html5ever::ns!(),
    local: html5ever::local_name!(""),
};

/// Handle passed back and forth with the tree builder.
///
/// Element handles carry their own name so `elem_name` can lend it out
/// without reaching through the `RefCell`.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    id: NodeId,
    name: Option<Rc<QualName>>,
}

impl NodeHandle {
    fn plain(id: NodeId) -> Self {
        Self { id, name: None }
    }
}

/// Tree sink collecting html5ever output into a [`Document`].
///
/// html5ever's `TreeSink` takes `&self`, so the document sits behind a
/// `RefCell`.
pub struct DocumentSink {
    doc: RefCell<Document>,
    errors: RefCell<usize>,
}

impl Default for DocumentSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink {
    pub fn new() -> Self {
        Self {
            doc: RefCell::new(Document::new()),
            errors: RefCell::new(0),
        }
    }

    /// Number of recoverable parse errors html5ever reported.
    pub fn error_count(&self) -> usize {
        *self.errors.borrow()
    }

    pub fn into_document(self) -> Document {
        self.doc.into_inner()
    }

    fn insert(&self, parent: NodeId, child: NodeOrText<NodeHandle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => doc.append(parent, node.id),
            NodeOrText::AppendText(text) => doc.append_text(parent, &text),
        }
    }
}

impl TreeSink for DocumentSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own; only the count is kept.
        *self.errors.borrow_mut() += 1;
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle::plain(self.doc.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        target.name.as_deref().unwrap_or(&NO_NAME)
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();

        let id = self.doc.borrow_mut().create_element(name.clone(), attrs);
        NodeHandle {
            id,
            name: Some(Rc::new(name)),
        }
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        NodeHandle::plain(self.doc.borrow_mut().create_comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        NodeHandle::plain(self.doc.borrow_mut().create_comment(String::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.insert(parent.id, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.doc.borrow().parent(element.id).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.insert(prev_element.id, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.create_doctype(name.to_string());
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents stay inline with the template element.
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.id == y.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => doc.insert_before(sibling.id, node.id),
            NodeOrText::AppendText(text) => {
                let text_node = doc.create_text(text.to_string());
                doc.insert_before(sibling.id, text_node);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        self.doc.borrow_mut().add_attrs_if_missing(target.id, attrs);
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.doc.borrow_mut().detach(target.id);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children: Vec<_> = self.doc.borrow().children(node.id).collect();
        let mut doc = self.doc.borrow_mut();
        for child in children {
            doc.detach(child);
            doc.append(new_parent.id, child);
        }
    }
}
