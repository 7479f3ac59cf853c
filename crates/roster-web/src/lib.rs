#![forbid(unsafe_code)]

//! WASM frontend for the character roster.
//!
//! Binds `roster-core` to the browser DOM:
//! - mounts automatically once the document's structure is available,
//! - registers one click listener per entry, one page-level click listener
//!   and one change listener per filter dropdown,
//! - publishes `filterCharacters(select)` on `window` for pages wiring the
//!   filter through an inline `onchange` attribute,
//! - routes `tracing` output to the browser console.
//!
//! Pages may embed two optional JSON blocks: `#roster-layout` overrides the
//! [`roster_core::PageLayout`] and `#character-data` replaces the bundled
//! character table.

use std::rc::Rc;

use roster_core::{
    CharacterTable, Document, FilterController, FilterOutcome, PageLayout, RosterError,
};

pub mod console_log;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{DomDocument, filter_characters, mount_roster, publish_inline_filter};

/// Native builds have no browser document to mount on. This stub keeps the
/// entry point so `cargo check --workspace` stays green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
pub fn mount_roster() -> Result<(), RosterError> {
    Err(RosterError::Host("roster mounting needs a browser document".into()))
}

/// Global name inline `onchange` attributes call.
pub const INLINE_FILTER_GLOBAL: &str = "filterCharacters";

/// Id of the optional inline JSON block overriding the page layout.
pub const LAYOUT_BLOCK_ID: &str = "roster-layout";

/// Id of the optional inline JSON block replacing the character table.
pub const RECORDS_BLOCK_ID: &str = "character-data";

/// Resolve the page layout from an optional inline JSON block.
pub fn layout_from_block(json: Option<&str>) -> Result<PageLayout, RosterError> {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => PageLayout::from_json(json),
        None => Ok(PageLayout::default()),
    }
}

/// Resolve the character table from an optional inline JSON block, falling
/// back to the bundled table.
pub fn records_from_block(json: Option<&str>) -> Result<CharacterTable, RosterError> {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => CharacterTable::from_json(json),
        None => CharacterTable::builtin(),
    }
}

/// Filter invoked from an inline `onchange` attribute.
///
/// Runs without a mounted page, so the layout is read from its block on every
/// call.
pub fn filter_inline<D: Document>(
    doc: &mut D,
    layout_block: Option<&str>,
    control: &D::Node,
    value: &str,
) -> Result<FilterOutcome, RosterError> {
    let layout = layout_from_block(layout_block)?;
    FilterController::new(Rc::new(layout)).apply(doc, control, value)
}
