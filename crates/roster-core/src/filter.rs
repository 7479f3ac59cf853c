//! Category filtering of a roster list.
//!
//! A dropdown change shows the entries of the list in the dropdown's own page
//! section whose tags contain the selected value, or every entry for the
//! show-all sentinel. Entry visibility depends on nothing else, so applying
//! the same selection twice is a no-op.

use std::rc::Rc;

use tracing::{debug, debug_span, warn};

use crate::RosterError;
use crate::document::Document;
use crate::layout::PageLayout;

/// The value chosen in a filter dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSelection<'a> {
    /// Show every entry.
    All,
    /// Show entries tagged with this category.
    Category(&'a str),
}

impl<'a> FilterSelection<'a> {
    /// Interpret a raw dropdown value against the show-all sentinel.
    #[must_use]
    pub fn parse(value: &'a str, show_all_value: &str) -> Self {
        if value == show_all_value {
            Self::All
        } else {
            Self::Category(value)
        }
    }

    /// Whether an entry passes, given a tag membership test.
    pub fn admits_with(&self, has_tag: impl FnOnce(&str) -> bool) -> bool {
        match self {
            Self::All => true,
            Self::Category(tag) => has_tag(tag),
        }
    }

    /// Whether an entry with this tag set passes.
    pub fn admits<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.admits_with(|wanted| tags.into_iter().any(|tag| tag.as_ref() == wanted))
    }
}

/// What a filter application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The control sits outside any scope; nothing changed.
    NoScope,
    /// The scope holds no list container; nothing changed.
    NoList,
    Applied { shown: usize, hidden: usize },
}

/// Applies dropdown selections to the list in the control's scope.
#[derive(Debug, Clone)]
pub struct FilterController {
    layout: Rc<PageLayout>,
}

impl FilterController {
    #[must_use]
    pub fn new(layout: Rc<PageLayout>) -> Self {
        Self { layout }
    }

    /// Show or hide every entry of the list sharing `control`'s scope.
    ///
    /// A missing scope or list container is a silent no-op. A value matching
    /// no entry hides them all. Every entry is visited even when the host
    /// refuses one update; the first refusal is returned afterwards.
    pub fn apply<D: Document>(
        &self,
        doc: &mut D,
        control: &D::Node,
        value: &str,
    ) -> Result<FilterOutcome, RosterError> {
        let _span = debug_span!("roster_filter", value).entered();

        let Some(scope) = doc.closest(control, &self.layout.scope_tag) else {
            debug!(scope_tag = %self.layout.scope_tag, "control has no enclosing scope");
            return Ok(FilterOutcome::NoScope);
        };
        let Some(list) = doc.find_by_id(&scope, &self.layout.list_id) else {
            debug!(list_id = %self.layout.list_id, "scope has no list container");
            return Ok(FilterOutcome::NoList);
        };

        let selection = FilterSelection::parse(value, &self.layout.show_all_value);
        let mut shown = 0;
        let mut hidden = 0;
        let mut first_err = None;
        for entry in doc.descendants_by_tag(&list, &self.layout.entry_tag) {
            let visible = selection.admits(doc.class_names(&entry));
            if let Err(err) = doc.set_displayed(&entry, visible) {
                warn!(?entry, %err, "entry visibility not updated");
                first_err.get_or_insert(err);
                continue;
            }
            if visible {
                shown += 1;
            } else {
                hidden += 1;
            }
        }

        debug!(shown, hidden, "filter applied");
        match first_err {
            Some(err) => Err(err),
            None => Ok(FilterOutcome::Applied { shown, hidden }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, NodeId};
    use tracing_test::traced_test;

    struct Page {
        doc: MemoryDocument,
        select: NodeId,
        entries: Vec<NodeId>,
    }

    fn page(tagged: &[&[&str]]) -> Page {
        let mut doc = MemoryDocument::new();
        let main = doc.append_element(doc.root(), "main");
        let select = doc.append_element(main, "select");
        let list = doc.append_element(main, "ul");
        doc.set_id(list, "character-list");
        let entries = tagged
            .iter()
            .map(|tags| {
                let li = doc.append_element(list, "li");
                for tag in *tags {
                    doc.add_class(li, tag);
                }
                li
            })
            .collect();
        Page {
            doc,
            select,
            entries,
        }
    }

    fn controller() -> FilterController {
        FilterController::new(Rc::new(PageLayout::default()))
    }

    fn visible(page: &Page) -> Vec<bool> {
        page.entries
            .iter()
            .map(|&e| page.doc.is_displayed(e))
            .collect()
    }

    #[test]
    fn selection_parse_uses_sentinel() {
        assert_eq!(FilterSelection::parse("all", "all"), FilterSelection::All);
        assert_eq!(
            FilterSelection::parse("All", "all"),
            FilterSelection::Category("All")
        );
    }

    #[test]
    fn admits_matches_exact_tags() {
        let sel = FilterSelection::Category("cast-a");
        assert!(sel.admits(["x", "cast-a"]));
        assert!(!sel.admits(["cast-ab"]));
        assert!(!sel.admits(Vec::<String>::new()));
        assert!(FilterSelection::All.admits(Vec::<String>::new()));
    }

    #[test]
    fn category_shows_only_tagged_entries() {
        let mut p = page(&[&["cast-a"], &["cast-b"], &["cast-a", "cast-b"], &[]]);
        let outcome = controller().apply(&mut p.doc, &p.select, "cast-a").unwrap();
        assert_eq!(outcome, FilterOutcome::Applied { shown: 2, hidden: 2 });
        assert_eq!(visible(&p), vec![true, false, true, false]);
    }

    #[test]
    fn all_restores_every_entry() {
        let mut p = page(&[&["cast-a"], &["cast-b"], &[]]);
        let filter = controller();
        filter.apply(&mut p.doc, &p.select, "cast-b").unwrap();
        filter.apply(&mut p.doc, &p.select, "all").unwrap();
        assert_eq!(visible(&p), vec![true, true, true]);
    }

    #[test]
    fn unknown_value_hides_everything() {
        let mut p = page(&[&["cast-a"], &["cast-b"]]);
        let outcome = controller().apply(&mut p.doc, &p.select, "nobody").unwrap();
        assert_eq!(outcome, FilterOutcome::Applied { shown: 0, hidden: 2 });
    }

    #[test]
    fn scopes_do_not_interfere() {
        let mut p = page(&[&["cast-a"], &["cast-b"]]);
        let other_main = p.doc.append_element(p.doc.root(), "main");
        let other_list = p.doc.append_element(other_main, "ul");
        p.doc.set_id(other_list, "character-list");
        let other_entry = p.doc.append_element(other_list, "li");
        p.doc.add_class(other_entry, "cast-b");

        controller().apply(&mut p.doc, &p.select, "cast-a").unwrap();
        assert_eq!(visible(&p), vec![true, false]);
        assert!(p.doc.is_displayed(other_entry));
    }

    #[test]
    #[traced_test]
    fn missing_scope_is_a_logged_no_op() {
        let mut doc = MemoryDocument::new();
        let select = doc.append_element(doc.root(), "select");
        let outcome = controller().apply(&mut doc, &select, "cast-a").unwrap();
        assert_eq!(outcome, FilterOutcome::NoScope);
        assert!(logs_contain("control has no enclosing scope"));
    }

    /// Memory document whose host refuses to restyle one node.
    struct Refusing {
        inner: MemoryDocument,
        refused: NodeId,
    }

    impl Document for Refusing {
        type Node = NodeId;

        fn parent(&self, node: &NodeId) -> Option<NodeId> {
            self.inner.parent(node)
        }
        fn closest(&self, node: &NodeId, tag: &str) -> Option<NodeId> {
            self.inner.closest(node, tag)
        }
        fn find_by_id(&self, scope: &NodeId, id: &str) -> Option<NodeId> {
            self.inner.find_by_id(scope, id)
        }
        fn descendants_by_tag(&self, root: &NodeId, tag: &str) -> Vec<NodeId> {
            self.inner.descendants_by_tag(root, tag)
        }
        fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
            self.inner.elements_by_class(class)
        }
        fn children_by_class(&self, parent: &NodeId, class: &str) -> Vec<NodeId> {
            self.inner.children_by_class(parent, class)
        }
        fn has_class(&self, node: &NodeId, class: &str) -> bool {
            self.inner.has_class(node, class)
        }
        fn class_names(&self, node: &NodeId) -> Vec<String> {
            self.inner.class_names(node)
        }
        fn text_content(&self, node: &NodeId) -> String {
            self.inner.text_content(node)
        }
        fn set_displayed(&mut self, node: &NodeId, displayed: bool) -> Result<(), RosterError> {
            if *node == self.refused {
                return Err(RosterError::Host("style is read-only".into()));
            }
            self.inner.set_displayed(node, displayed)
        }
        fn create_element(&mut self, tag: &str, class: &str) -> Result<NodeId, RosterError> {
            self.inner.create_element(tag, class)
        }
        fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), RosterError> {
            self.inner.set_text(node, text)
        }
        fn set_markup(&mut self, node: &NodeId, markup: &str) -> Result<(), RosterError> {
            self.inner.set_markup(node, markup)
        }
        fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), RosterError> {
            self.inner.append_child(parent, child)
        }
        fn remove(&mut self, node: &NodeId) -> Result<(), RosterError> {
            self.inner.remove(node)
        }
    }

    #[test]
    #[traced_test]
    fn refused_entry_does_not_stop_the_rest() {
        let p = page(&[&["cast-b"], &["cast-a"], &["cast-b"], &["cast-a"]]);
        let mut doc = Refusing {
            inner: p.doc,
            refused: p.entries[1],
        };

        let err = controller().apply(&mut doc, &p.select, "cast-b").unwrap_err();
        assert_eq!(err, RosterError::Host("style is read-only".into()));
        assert!(logs_contain("entry visibility not updated"));

        let visible: Vec<bool> = p
            .entries
            .iter()
            .map(|&e| doc.inner.is_displayed(e))
            .collect();
        // Entries after the refused one are still filtered.
        assert_eq!(visible, vec![true, true, true, false]);
    }

    #[test]
    fn missing_list_is_a_no_op() {
        let mut doc = MemoryDocument::new();
        let main = doc.append_element(doc.root(), "main");
        let select = doc.append_element(main, "select");
        let stray = doc.append_element(doc.root(), "li");
        doc.add_class(stray, "cast-b");
        let outcome = controller().apply(&mut doc, &select, "cast-a").unwrap();
        assert_eq!(outcome, FilterOutcome::NoList);
        assert!(doc.is_displayed(stray));
    }
}
