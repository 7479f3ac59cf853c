//! Property-based invariant tests for the roster behaviours.
//!
//! Verifies:
//! 1. Visibility: an entry is shown iff the value is `all` or one of its tags
//! 2. Filtering the same value twice leaves the document unchanged
//! 3. Filtering never touches entries of another scope
//! 4. At most one popup exists after any click sequence, owned by the entry a
//!    simple open/closed model predicts
//! 5. Entry text splits at the first en dash only, trimming both halves

use proptest::prelude::*;
use roster_core::{
    CharacterTable, Document, EntryLabel, MemoryDocument, NodeId, PageEvent, PageLayout,
    RosterPage,
};

const TAGS: [&str; 4] = ["jane", "john", "extras", "guest"];

// ── Fixtures ──────────────────────────────────────────────────────────

struct Roster {
    doc: MemoryDocument,
    page: RosterPage<NodeId>,
    select: NodeId,
    outside: NodeId,
    entries: Vec<NodeId>,
    other_entries: Vec<NodeId>,
}

fn build_scope(doc: &mut MemoryDocument, tag_sets: &[Vec<usize>]) -> (NodeId, Vec<NodeId>) {
    let root = doc.root();
    let main = doc.append_element(root, "main");
    let select = doc.append_element(main, "select");
    let list = doc.append_element(main, "ul");
    doc.set_id(list, "character-list");
    let entries = tag_sets
        .iter()
        .enumerate()
        .map(|(i, tags)| {
            let li = doc.append_element(list, "li");
            for &t in tags {
                doc.add_class(li, TAGS[t]);
            }
            let span = doc.append_element(li, "span");
            doc.append_text(span, &format!("Character {i} \u{2013} Performer {i}"));
            li
        })
        .collect();
    (select, entries)
}

fn roster(tag_sets: &[Vec<usize>], other_sets: &[Vec<usize>]) -> Roster {
    let mut doc = MemoryDocument::new();
    let root = doc.root();
    let outside = doc.append_element(root, "header");
    let (select, entries) = build_scope(&mut doc, tag_sets);
    let (_, other_entries) = build_scope(&mut doc, other_sets);
    let page = RosterPage::mount(&doc, &root, PageLayout::default(), CharacterTable::new());
    Roster {
        doc,
        page,
        select,
        outside,
        entries,
        other_entries,
    }
}

fn change(r: &mut Roster, value: &str) {
    let event = PageEvent::SelectionChanged {
        control: r.select,
        value: value.to_owned(),
    };
    r.page.dispatch(&mut r.doc, event).unwrap();
}

fn click(r: &mut Roster, target: NodeId) {
    r.page
        .dispatch(&mut r.doc, PageEvent::Click { target })
        .unwrap();
}

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_tag_sets() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..TAGS.len(), 0..3), 0..8)
}

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("all".to_owned()),
        (0..TAGS.len()).prop_map(|t| TAGS[t].to_owned()),
        Just("nobody".to_owned()),
    ]
}

#[derive(Debug, Clone)]
enum Click {
    Entry(usize),
    EntryText(usize),
    Outside,
    InsidePopup,
}

fn arb_clicks(entries: usize) -> impl Strategy<Value = Vec<Click>> {
    let click = prop_oneof![
        (0..entries).prop_map(Click::Entry),
        (0..entries).prop_map(Click::EntryText),
        Just(Click::Outside),
        Just(Click::InsidePopup),
    ];
    prop::collection::vec(click, 0..24)
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn visibility_follows_selection(sets in arb_tag_sets(), value in arb_value()) {
        let mut r = roster(&sets, &[]);
        change(&mut r, &value);
        for (entry, tags) in r.entries.iter().zip(&sets) {
            let expected = value == "all" || tags.iter().any(|&t| TAGS[t] == value);
            prop_assert_eq!(r.doc.is_displayed(*entry), expected);
        }
    }

    #[test]
    fn filtering_is_idempotent(sets in arb_tag_sets(), first in arb_value(), value in arb_value()) {
        let mut r = roster(&sets, &[]);
        change(&mut r, &first);
        change(&mut r, &value);
        let once = r.doc.render_html();
        change(&mut r, &value);
        prop_assert_eq!(once, r.doc.render_html());
    }

    #[test]
    fn filtering_stays_in_its_scope(
        sets in arb_tag_sets(),
        other in arb_tag_sets(),
        value in arb_value()
    ) {
        let mut r = roster(&sets, &other);
        change(&mut r, &value);
        for entry in &r.other_entries {
            prop_assert!(r.doc.is_displayed(*entry));
        }
    }

    #[test]
    fn at_most_one_popup_for_any_clicks(clicks in arb_clicks(5)) {
        let mut r = roster(&vec![Vec::<usize>::new(); 5], &[]);
        let mut open: Option<usize> = None;

        for c in clicks {
            match c {
                Click::Entry(i) => {
                    let target = r.entries[i];
                    click(&mut r, target);
                    open = if open == Some(i) { None } else { Some(i) };
                }
                Click::EntryText(i) => {
                    let target = r.doc.children(r.entries[i])[0];
                    click(&mut r, target);
                    open = if open == Some(i) { None } else { Some(i) };
                }
                Click::Outside => {
                    let target = r.outside;
                    click(&mut r, target);
                    open = None;
                }
                Click::InsidePopup => {
                    let target = r
                        .doc
                        .elements_by_class("character-popup")
                        .first()
                        .map_or(r.outside, |p| r.doc.children(*p)[0]);
                    click(&mut r, target);
                    open = None;
                }
            }

            let popups = r.doc.elements_by_class("character-popup");
            prop_assert!(popups.len() <= 1);
            let owner = popups.first().and_then(|p| r.doc.parent(p));
            prop_assert_eq!(owner, open.map(|i| r.entries[i]));
        }
    }

    #[test]
    fn split_takes_first_en_dash(
        name in "[A-Za-z][A-Za-z ]{0,15}",
        performer in "[A-Za-z \u{2013}]{0,20}"
    ) {
        let raw = format!(" {name} \u{2013} {performer} ");
        let label = EntryLabel::parse(&raw);
        prop_assert_eq!(label.name, name.trim());
        prop_assert_eq!(label.performer, performer.trim());
        prop_assert_eq!(label.has_performer(), !performer.trim().is_empty());
    }

    #[test]
    fn text_without_en_dash_is_all_name(raw in "[^\u{2013}]{0,30}") {
        let label = EntryLabel::parse(&raw);
        prop_assert_eq!(label.name, raw.trim());
        prop_assert_eq!(label.performer, "");
    }
}
