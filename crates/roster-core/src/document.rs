//! Structural contract between the roster behaviours and the host document.
//!
//! The host owns the tree and mutates it synchronously. The behaviours only
//! ever query elements by structural role (tag, id, class) and attach or
//! detach elements they constructed themselves.

use core::fmt::Debug;

use crate::RosterError;

/// A live, host-owned element tree.
///
/// Queries never fail: a missing element is `None` or an empty `Vec`.
/// Mutations return [`RosterError::Host`] when the host refuses them.
pub trait Document {
    /// Handle to one element. Equality is identity.
    type Node: Clone + PartialEq + Debug;

    /// Parent element, or `None` for the root and detached nodes.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Nearest inclusive ancestor with the given tag name.
    fn closest(&self, node: &Self::Node, tag: &str) -> Option<Self::Node>;

    /// First descendant of `scope` whose id is `id`.
    fn find_by_id(&self, scope: &Self::Node, id: &str) -> Option<Self::Node>;

    /// Descendants of `root` with the given tag, in document order.
    fn descendants_by_tag(&self, root: &Self::Node, tag: &str) -> Vec<Self::Node>;

    /// Elements anywhere in the attached document carrying `class`.
    fn elements_by_class(&self, class: &str) -> Vec<Self::Node>;

    /// Direct children of `parent` carrying `class`.
    fn children_by_class(&self, parent: &Self::Node, class: &str) -> Vec<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn class_names(&self, node: &Self::Node) -> Vec<String>;

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Show (`true`) or hide (`false`) an element.
    fn set_displayed(&mut self, node: &Self::Node, displayed: bool) -> Result<(), RosterError>;

    /// Create a detached element with a single class.
    fn create_element(&mut self, tag: &str, class: &str) -> Result<Self::Node, RosterError>;

    /// Replace the node's children with `text`, never interpreted as markup.
    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), RosterError>;

    /// Replace the node's children with trusted, authored markup.
    fn set_markup(&mut self, node: &Self::Node, markup: &str) -> Result<(), RosterError>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), RosterError>;

    /// Detach `node` from its parent.
    fn remove(&mut self, node: &Self::Node) -> Result<(), RosterError>;

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut cursor = Some(node.clone());
        while let Some(current) = cursor {
            if &current == ancestor {
                return true;
            }
            cursor = self.parent(&current);
        }
        false
    }
}
