//! One-time page setup and host-driven event delivery.
//!
//! [`RosterPage::mount`] discovers the entries and dropdowns present in the
//! document once; later additions are never bound. Hosts with a native event
//! system (the browser) register the three handlers themselves. Other hosts
//! push [`PageEvent`]s through [`RosterPage::dispatch`], which reproduces DOM
//! bubbling: an entry handler runs before the page-level fallback and stops
//! the click from reaching it.

use std::rc::Rc;

use tracing::{debug, info};

use crate::RosterError;
use crate::document::Document;
use crate::filter::{FilterController, FilterOutcome};
use crate::layout::PageLayout;
use crate::popup::{PopupController, PopupTransition};
use crate::records::CharacterTable;

/// Whether an event should keep bubbling after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// An input delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent<N> {
    /// A dropdown took a new value.
    SelectionChanged { control: N, value: String },
    /// A click landed on `target`.
    Click { target: N },
}

/// Which handler consumed a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Entry(PopupTransition),
    /// Page-level fallback; `closed` popups were removed.
    Page { closed: usize },
}

/// Result of [`RosterPage::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Filter(FilterOutcome),
    Click(ClickOutcome),
    /// The event came from an element bound to nothing.
    Ignored,
}

/// Elements bound at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings<N> {
    /// Entries of every scope's list, in document order.
    pub entries: Vec<N>,
    /// Dropdowns of every scope holding a list.
    pub controls: Vec<N>,
}

impl<N: Clone + PartialEq> Bindings<N> {
    /// Collect the entries and controls of every scope that holds a list.
    pub fn discover<D: Document<Node = N>>(doc: &D, layout: &PageLayout, root: &N) -> Self {
        let mut entries = Vec::new();
        let mut controls = Vec::new();
        for scope in doc.descendants_by_tag(root, &layout.scope_tag) {
            let Some(list) = doc.find_by_id(&scope, &layout.list_id) else {
                continue;
            };
            push_unique(&mut entries, doc.descendants_by_tag(&list, &layout.entry_tag));
            push_unique(&mut controls, doc.descendants_by_tag(&scope, &layout.control_tag));
        }
        Self { entries, controls }
    }
}

// Nested scopes can reach the same list twice.
fn push_unique<N: PartialEq>(into: &mut Vec<N>, nodes: Vec<N>) {
    for node in nodes {
        if !into.contains(&node) {
            into.push(node);
        }
    }
}

/// A mounted roster page.
#[derive(Debug, Clone)]
pub struct RosterPage<N> {
    layout: Rc<PageLayout>,
    filter: FilterController,
    popups: PopupController,
    bindings: Bindings<N>,
}

impl<N: Clone + PartialEq> RosterPage<N> {
    /// Run the setup phase against a fully loaded document rooted at `root`.
    pub fn mount<D: Document<Node = N>>(
        doc: &D,
        root: &N,
        layout: PageLayout,
        records: CharacterTable,
    ) -> Self {
        let layout = Rc::new(layout);
        let records = Rc::new(records);
        let bindings = Bindings::discover(doc, &layout, root);
        info!(
            entries = bindings.entries.len(),
            controls = bindings.controls.len(),
            records = records.len(),
            "roster page mounted"
        );
        Self {
            filter: FilterController::new(Rc::clone(&layout)),
            popups: PopupController::new(Rc::clone(&layout), records),
            layout,
            bindings,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    #[must_use]
    pub fn bindings(&self) -> &Bindings<N> {
        &self.bindings
    }

    #[must_use]
    pub fn filter(&self) -> &FilterController {
        &self.filter
    }

    #[must_use]
    pub fn popups(&self) -> &PopupController {
        &self.popups
    }

    /// Dropdown change handler.
    pub fn on_selection_change<D: Document<Node = N>>(
        &self,
        doc: &mut D,
        control: &N,
        value: &str,
    ) -> Result<FilterOutcome, RosterError> {
        self.filter.apply(doc, control, value)
    }

    /// Entry click handler. Always stops propagation.
    pub fn on_entry_click<D: Document<Node = N>>(
        &self,
        doc: &mut D,
        entry: &N,
    ) -> Result<(PopupTransition, Propagation), RosterError> {
        let transition = self.popups.toggle(doc, entry)?;
        Ok((transition, Propagation::Stop))
    }

    /// Page-level fallback click handler.
    pub fn on_page_click<D: Document<Node = N>>(&self, doc: &mut D) -> Result<usize, RosterError> {
        let closed = self.popups.close_all(doc)?;
        if closed > 0 {
            debug!(closed, "outside click closed popups");
        }
        Ok(closed)
    }

    /// Deliver one host event to the bound handlers.
    pub fn dispatch<D: Document<Node = N>>(
        &self,
        doc: &mut D,
        event: PageEvent<N>,
    ) -> Result<Dispatched, RosterError> {
        match event {
            PageEvent::SelectionChanged { control, value } => {
                if !self.bindings.controls.contains(&control) {
                    return Ok(Dispatched::Ignored);
                }
                let outcome = self.on_selection_change(doc, &control, &value)?;
                Ok(Dispatched::Filter(outcome))
            }
            PageEvent::Click { target } => {
                let mut cursor = Some(target);
                while let Some(node) = cursor {
                    if self.bindings.entries.contains(&node) {
                        let (transition, propagation) = self.on_entry_click(doc, &node)?;
                        if propagation == Propagation::Stop {
                            return Ok(Dispatched::Click(ClickOutcome::Entry(transition)));
                        }
                    }
                    cursor = doc.parent(&node);
                }
                let closed = self.on_page_click(doc)?;
                Ok(Dispatched::Click(ClickOutcome::Page { closed }))
            }
        }
    }
}
