//! Structural roles the roster behaviours look for in the page markup.
//!
//! Defaults match the stock character pages; a page may override any field
//! with a JSON document (see [`PageLayout::from_json`]).

use serde::{Deserialize, Serialize};

use crate::RosterError;

/// Default description shown when a character has no record.
pub const DEFAULT_FALLBACK_DESCRIPTION: &str =
    "Informations clés à propos de ce personnage bientôt disponibles.";

/// Where the filter and popup behaviours find their elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageLayout {
    /// Tag of the page section isolating one filtered list.
    pub scope_tag: String,
    /// Id of the list container inside a scope.
    pub list_id: String,
    /// Tag of one entry inside the list container.
    pub entry_tag: String,
    /// Tag of the dropdown driving the filter.
    pub control_tag: String,
    /// Selection value that shows every entry.
    pub show_all_value: String,
    pub popup: PopupLayout,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            scope_tag: "main".into(),
            list_id: "character-list".into(),
            entry_tag: "li".into(),
            control_tag: "select".into(),
            show_all_value: "all".into(),
            popup: PopupLayout::default(),
        }
    }
}

/// Shape of the popup built for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopupLayout {
    pub container_tag: String,
    /// Marks popups in the document; used to find the open one.
    pub container_class: String,
    pub title_tag: String,
    pub title_class: String,
    pub performer_tag: String,
    pub performer_class: String,
    pub description_tag: String,
    pub description_class: String,
    pub fallback_description: String,
}

impl Default for PopupLayout {
    fn default() -> Self {
        Self {
            container_tag: "div".into(),
            container_class: "character-popup".into(),
            title_tag: "h3".into(),
            title_class: "popup-name".into(),
            performer_tag: "p".into(),
            performer_class: "popup-performer".into(),
            description_tag: "div".into(),
            description_class: "popup-description".into(),
            fallback_description: DEFAULT_FALLBACK_DESCRIPTION.into(),
        }
    }
}

impl PageLayout {
    /// Parse and validate a layout. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let layout: Self =
            serde_json::from_str(json).map_err(|err| RosterError::Layout(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Reject layouts the behaviours cannot work with.
    pub fn validate(&self) -> Result<(), RosterError> {
        let popup = &self.popup;
        let required = [
            ("scope_tag", &self.scope_tag),
            ("list_id", &self.list_id),
            ("entry_tag", &self.entry_tag),
            ("control_tag", &self.control_tag),
            ("show_all_value", &self.show_all_value),
            ("popup.container_tag", &popup.container_tag),
            ("popup.container_class", &popup.container_class),
            ("popup.title_tag", &popup.title_tag),
            ("popup.title_class", &popup.title_class),
            ("popup.performer_tag", &popup.performer_tag),
            ("popup.performer_class", &popup.performer_class),
            ("popup.description_tag", &popup.description_tag),
            ("popup.description_class", &popup.description_class),
        ];
        for (field, value) in required {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                return Err(RosterError::InvalidLayout(field));
            }
        }

        // Popup classes must be pairwise distinct. A clash is reported on the
        // later field; the container comes first.
        let classes = [
            ("popup.container_class", &popup.container_class),
            ("popup.title_class", &popup.title_class),
            ("popup.performer_class", &popup.performer_class),
            ("popup.description_class", &popup.description_class),
        ];
        for (i, (field, class)) in classes.iter().enumerate().skip(1) {
            if classes[..i].iter().any(|(_, earlier)| earlier == class) {
                return Err(RosterError::InvalidLayout(*field));
            }
        }
        Ok(())
    }
}
