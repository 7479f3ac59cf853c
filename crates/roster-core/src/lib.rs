#![forbid(unsafe_code)]

//! Host-agnostic behaviour for a character roster page.
//!
//! Two behaviours share one page:
//! - **filtering**: a dropdown selection shows or hides the entries of the list
//!   living in the same page section ([`filter`]);
//! - **popups**: clicking an entry toggles a small info panel anchored to it,
//!   with at most one panel open on the whole page ([`popup`]).
//!
//! Both operate on a live tree owned by the host through the [`Document`]
//! trait. The browser binding lives in `roster-web`; [`MemoryDocument`] backs
//! native hosts and tests.

pub mod document;
pub mod entry;
pub mod filter;
pub mod layout;
pub mod memory;
pub mod page;
pub mod popup;
pub mod records;

pub use document::Document;
pub use entry::EntryLabel;
pub use filter::{FilterController, FilterOutcome, FilterSelection};
pub use layout::{PageLayout, PopupLayout};
pub use memory::{MemoryDocument, NodeId};
pub use page::{Bindings, ClickOutcome, Dispatched, PageEvent, Propagation, RosterPage};
pub use popup::{Description, PopupContent, PopupController, PopupTransition};
pub use records::{CharacterRecord, CharacterTable};

/// Roster error type.
///
/// Expected lookup misses (no scope, no record, no separator) are not errors;
/// these variants only cover malformed configuration data and host failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Page layout JSON could not be parsed.
    Layout(String),
    /// Page layout parsed but a field is unusable.
    InvalidLayout(&'static str),
    /// Character table JSON could not be parsed.
    Records(String),
    /// The host document rejected an operation.
    Host(String),
}

impl core::fmt::Display for RosterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Layout(msg) => write!(f, "page layout: {msg}"),
            Self::InvalidLayout(field) => write!(f, "page layout: `{field}` is invalid"),
            Self::Records(msg) => write!(f, "character table: {msg}"),
            Self::Host(msg) => write!(f, "host document: {msg}"),
        }
    }
}

impl std::error::Error for RosterError {}
