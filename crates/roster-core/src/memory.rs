//! In-memory [`Document`] for native hosts and tests.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
//! only detaches it; detached subtrees stay in the arena but no longer match
//! document-wide queries.

use crate::RosterError;
use crate::document::Document;

/// Arena index of a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Root,
    Element(Element),
    Text(String),
    /// Trusted markup, kept verbatim.
    Markup(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    displayed: bool,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// A small element tree with just enough structure for the roster behaviours.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document holding only its root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
            root: NodeId(0),
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Append a new element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(
            Some(parent),
            NodeKind::Element(Element {
                tag: tag.to_ascii_lowercase(),
                id: None,
                classes: Vec::new(),
                displayed: true,
            }),
        )
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(Some(parent), NodeKind::Text(text.to_owned()))
    }

    /// Set the element's id. No-op on non-element nodes.
    pub fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(element) = self.element_mut(node) {
            element.id = Some(id.to_owned());
        }
    }

    /// Add a class to the element, ignoring duplicates and blanks.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let class = class.trim();
        if class.is_empty() {
            return;
        }
        if let Some(element) = self.element_mut(node)
            && !element.classes.iter().any(|c| c == class)
        {
            element.classes.push(class.to_owned());
        }
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    /// Whether the element is shown. Non-elements report `false`.
    #[must_use]
    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.displayed)
    }

    /// Whether the node is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.nodes.get(current.0).and_then(|n| n.parent);
        }
        false
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// Trusted markup held by the node's single markup child, if any.
    #[must_use]
    pub fn markup(&self, node: NodeId) -> Option<&str> {
        self.children(node)
            .iter()
            .find_map(|child| match &self.nodes[child.0].kind {
                NodeKind::Markup(markup) => Some(markup.as_str()),
                _ => None,
            })
    }

    /// Attached elements in document order, starting below `from`.
    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    fn replace_children(&mut self, node: NodeId, kind: NodeKind) -> Result<(), RosterError> {
        if self.element(node).is_none() {
            return Err(RosterError::Host(format!("{node:?} is not an element")));
        }
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.push(Some(node), kind);
        Ok(())
    }

    /// Serialise the attached tree.
    ///
    /// Text and attribute values are escaped; markup nodes are emitted
    /// verbatim. Hidden elements carry `style="display: none"`.
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root) {
            self.render_node(child, &mut out);
        }
        out
    }

    fn render_node(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Root => {}
            NodeKind::Text(text) => out.push_str(&html_escape(text)),
            NodeKind::Markup(markup) => out.push_str(markup),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                if let Some(id) = &element.id {
                    out.push_str(&format!(" id=\"{}\"", html_escape(id)));
                }
                if !element.classes.is_empty() {
                    out.push_str(&format!(
                        " class=\"{}\"",
                        html_escape(&element.classes.join(" "))
                    ));
                }
                if !element.displayed {
                    out.push_str(" style=\"display: none\"");
                }
                out.push('>');
                for &child in self.children(node) {
                    self.render_node(child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn closest(&self, node: &NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if self
                .tag_name(current)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag))
            {
                return Some(current);
            }
            cursor = self.parent(&current);
        }
        None
    }

    fn find_by_id(&self, scope: &NodeId, id: &str) -> Option<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .find(|&node| self.element(node).and_then(|e| e.id.as_deref()) == Some(id))
    }

    fn descendants_by_tag(&self, root: &NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|&node| {
                self.tag_name(node)
                    .is_some_and(|t| t.eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn children_by_class(&self, parent: &NodeId, class: &str) -> Vec<NodeId> {
        self.children(*parent)
            .iter()
            .copied()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element(*node)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn class_names(&self, node: &NodeId) -> Vec<String> {
        self.element(*node)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let Some(n) = self.nodes.get(node.0) else {
            return String::new();
        };
        match &n.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Markup(markup) => strip_tags(markup),
            NodeKind::Root | NodeKind::Element(_) => n
                .children
                .iter()
                .map(|child| self.text_content(child))
                .collect(),
        }
    }

    fn set_displayed(&mut self, node: &NodeId, displayed: bool) -> Result<(), RosterError> {
        let element = self
            .element_mut(*node)
            .ok_or_else(|| RosterError::Host(format!("{node:?} is not an element")))?;
        element.displayed = displayed;
        Ok(())
    }

    fn create_element(&mut self, tag: &str, class: &str) -> Result<NodeId, RosterError> {
        let node = self.push(
            None,
            NodeKind::Element(Element {
                tag: tag.to_ascii_lowercase(),
                id: None,
                classes: Vec::new(),
                displayed: true,
            }),
        );
        self.add_class(node, class);
        Ok(node)
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), RosterError> {
        self.replace_children(*node, NodeKind::Text(text.to_owned()))
    }

    fn set_markup(&mut self, node: &NodeId, markup: &str) -> Result<(), RosterError> {
        self.replace_children(*node, NodeKind::Markup(markup.to_owned()))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), RosterError> {
        if self.element(*parent).is_none() && *parent != self.root {
            return Err(RosterError::Host(format!("{parent:?} cannot have children")));
        }
        if *child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(RosterError::Host(format!(
                "appending {child:?} under {parent:?} would create a cycle"
            )));
        }
        self.remove(child)?;
        self.nodes[child.0].parent = Some(*parent);
        self.nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn remove(&mut self, node: &NodeId) -> Result<(), RosterError> {
        if node.0 >= self.nodes.len() {
            return Err(RosterError::Host(format!("{node:?} does not exist")));
        }
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| c != node);
        }
        Ok(())
    }
}
