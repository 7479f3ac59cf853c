//! Parsing of an entry's display text.

/// Separator between a character name and its performer label (en dash).
pub const PERFORMER_SEPARATOR: char = '\u{2013}';

/// Name and performer label parsed from `"<Name> – <Performer>"`.
///
/// Only the first en dash splits; a name containing one is split there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLabel<'a> {
    pub name: &'a str,
    /// Empty when the text carries no separator.
    pub performer: &'a str,
}

impl<'a> EntryLabel<'a> {
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(PERFORMER_SEPARATOR) {
            Some((name, performer)) => Self {
                name: name.trim(),
                performer: performer.trim(),
            },
            None => Self {
                name: raw.trim(),
                performer: "",
            },
        }
    }

    #[must_use]
    pub fn has_performer(&self) -> bool {
        !self.performer.is_empty()
    }
}
