//! Entry info popups.
//!
//! Each entry is either closed or open. Clicking a closed entry first closes
//! whatever popup is open elsewhere, then attaches a freshly built popup to the
//! entry; clicking an open entry closes it. At most one popup exists in the
//! document at any time.
//!
//! Open popups are found by their container class rather than remembered, so
//! the controller keeps no state between clicks.

use std::rc::Rc;

use tracing::{debug, debug_span};

use crate::RosterError;
use crate::document::Document;
use crate::entry::EntryLabel;
use crate::layout::PageLayout;
use crate::records::CharacterTable;

/// Result of clicking an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTransition {
    Opened,
    Closed,
}

/// Body text of a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Description<'a> {
    /// Authored rich text from the character table, rendered as markup.
    Rich(&'a str),
    /// Placeholder for characters without a description, rendered as text.
    Fallback(&'a str),
}

/// Everything shown in a popup, before it becomes elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupContent<'a> {
    pub title: &'a str,
    pub performer: Option<&'a str>,
    pub description: Description<'a>,
}

#[derive(Debug, Clone)]
pub struct PopupController {
    layout: Rc<PageLayout>,
    records: Rc<CharacterTable>,
}

impl PopupController {
    #[must_use]
    pub fn new(layout: Rc<PageLayout>, records: Rc<CharacterTable>) -> Self {
        Self { layout, records }
    }

    #[must_use]
    pub fn records(&self) -> &CharacterTable {
        &self.records
    }

    /// Resolve the popup content for an entry's raw text.
    #[must_use]
    pub fn content<'a>(&'a self, raw_text: &'a str) -> PopupContent<'a> {
        let label = EntryLabel::parse(raw_text);
        let description = match self.records.description(label.name) {
            Some(rich) => Description::Rich(rich),
            None => Description::Fallback(&self.layout.popup.fallback_description),
        };
        PopupContent {
            title: label.name,
            performer: label.has_performer().then_some(label.performer),
            description,
        }
    }

    /// Toggle the popup of `entry`.
    pub fn toggle<D: Document>(
        &self,
        doc: &mut D,
        entry: &D::Node,
    ) -> Result<PopupTransition, RosterError> {
        let _span = debug_span!("roster_popup_toggle").entered();
        let class = &self.layout.popup.container_class;

        let own = doc.children_by_class(entry, class);
        if !own.is_empty() {
            for popup in &own {
                doc.remove(popup)?;
            }
            debug!("popup closed by its own entry");
            return Ok(PopupTransition::Closed);
        }

        let closed = self.close_all(doc)?;
        let raw_text = doc.text_content(entry);
        let popup = self.build(doc, &raw_text)?;
        doc.append_child(entry, &popup)?;
        debug!(closed, "popup opened");
        Ok(PopupTransition::Opened)
    }

    /// Remove every popup in the document, returning how many were open.
    pub fn close_all<D: Document>(&self, doc: &mut D) -> Result<usize, RosterError> {
        let open = doc.elements_by_class(&self.layout.popup.container_class);
        for popup in &open {
            doc.remove(popup)?;
        }
        Ok(open.len())
    }

    /// Build a detached popup for an entry's raw text.
    pub fn build<D: Document>(&self, doc: &mut D, raw_text: &str) -> Result<D::Node, RosterError> {
        let parts = &self.layout.popup;
        let content = self.content(raw_text);

        let container = doc.create_element(&parts.container_tag, &parts.container_class)?;

        let title = doc.create_element(&parts.title_tag, &parts.title_class)?;
        doc.set_text(&title, content.title)?;
        doc.append_child(&container, &title)?;

        if let Some(performer) = content.performer {
            let line = doc.create_element(&parts.performer_tag, &parts.performer_class)?;
            doc.set_text(&line, performer)?;
            doc.append_child(&container, &line)?;
        }

        let body = doc.create_element(&parts.description_tag, &parts.description_class)?;
        match content.description {
            Description::Rich(markup) => doc.set_markup(&body, markup)?,
            Description::Fallback(text) => doc.set_text(&body, text)?,
        }
        doc.append_child(&container, &body)?;

        Ok(container)
    }
}
