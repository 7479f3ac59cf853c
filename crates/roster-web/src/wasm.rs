use std::cell::Cell;
use std::rc::Rc;

use roster_core::{Document, Propagation, RosterError, RosterPage};
use tracing::{Level, debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlCollection, HtmlElement, HtmlSelectElement};

use crate::console_log::{ConsoleConfig, ConsoleLayer, ConsoleSink};
use crate::{
    INLINE_FILTER_GLOBAL, LAYOUT_BLOCK_ID, RECORDS_BLOCK_ID, filter_inline, layout_from_block,
    records_from_block,
};

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

fn host_err(err: JsValue) -> RosterError {
    RosterError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn to_js(err: RosterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`Document`] over the live browser DOM.
#[derive(Debug, Clone)]
pub struct DomDocument {
    document: web_sys::Document,
}

impl DomDocument {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The document of the current window.
    pub fn from_window() -> Result<Self, RosterError> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
            .ok_or_else(|| RosterError::Host("no window document".into()))
    }

    /// Text of the element with `id`, typically an inline JSON block.
    fn block_text(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)
            .and_then(|block| block.text_content())
    }

    fn collect(collection: &HtmlCollection) -> Vec<Element> {
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }
}

fn attr_selector_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Document for DomDocument {
    type Node = Element;

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn closest(&self, node: &Element, tag: &str) -> Option<Element> {
        node.closest(tag).ok().flatten()
    }

    fn find_by_id(&self, scope: &Element, id: &str) -> Option<Element> {
        scope
            .query_selector(&format!("[id=\"{}\"]", attr_selector_value(id)))
            .ok()
            .flatten()
    }

    fn descendants_by_tag(&self, root: &Element, tag: &str) -> Vec<Element> {
        Self::collect(&root.get_elements_by_tag_name(tag))
    }

    fn elements_by_class(&self, class: &str) -> Vec<Element> {
        // Live collection: snapshot before callers start removing.
        Self::collect(&self.document.get_elements_by_class_name(class))
    }

    fn children_by_class(&self, parent: &Element, class: &str) -> Vec<Element> {
        Self::collect(&parent.children())
            .into_iter()
            .filter(|child| self.has_class(child, class))
            .collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn class_names(&self, node: &Element) -> Vec<String> {
        let list = node.class_list();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_displayed(&mut self, node: &Element, displayed: bool) -> Result<(), RosterError> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| RosterError::Host(format!("<{}> has no style", node.tag_name())))?;
        let style = element.style();
        if displayed {
            style.remove_property("display").map_err(host_err)?;
        } else {
            style.set_property("display", "none").map_err(host_err)?;
        }
        Ok(())
    }

    fn create_element(&mut self, tag: &str, class: &str) -> Result<Element, RosterError> {
        let element = self.document.create_element(tag).map_err(host_err)?;
        element.set_class_name(class);
        Ok(element)
    }

    fn set_text(&mut self, node: &Element, text: &str) -> Result<(), RosterError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_markup(&mut self, node: &Element, markup: &str) -> Result<(), RosterError> {
        node.set_inner_html(markup);
        Ok(())
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> Result<(), RosterError> {
        parent.append_child(child).map_err(host_err)?;
        Ok(())
    }

    fn remove(&mut self, node: &Element) -> Result<(), RosterError> {
        node.remove();
        Ok(())
    }
}

struct BrowserConsole;

impl ConsoleSink for BrowserConsole {
    fn write_line(&self, level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            Level::DEBUG => web_sys::console::debug_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

fn install_console_logging() {
    let layer = ConsoleLayer::new(BrowserConsole, ConsoleConfig::default());
    // A host page may already have installed its own subscriber.
    let _ = tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer));
}

/// Module entry point: mount once the page structure is available.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_console_logging();
    publish_inline_filter()?;
    let doc = DomDocument::from_window().map_err(to_js)?;
    if doc.document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(|| {
            if let Err(err) = mount_roster() {
                warn!(?err, "roster mount failed");
            }
        });
        doc.document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        return Ok(());
    }
    mount_roster()
}

/// Bind the roster handlers to the current document.
///
/// Runs once; later calls are no-ops.
#[wasm_bindgen(js_name = mountRoster)]
pub fn mount_roster() -> Result<(), JsValue> {
    if MOUNTED.with(Cell::get) {
        debug!("roster already mounted");
        return Ok(());
    }

    let doc = DomDocument::from_window().map_err(to_js)?;
    let layout = layout_from_block(doc.block_text(LAYOUT_BLOCK_ID).as_deref()).map_err(to_js)?;
    let records =
        records_from_block(doc.block_text(RECORDS_BLOCK_ID).as_deref()).map_err(to_js)?;
    let root = doc
        .document
        .document_element()
        .ok_or_else(|| JsValue::from_str("document has no root element"))?;

    let page = Rc::new(RosterPage::mount(&doc, &root, layout, records));
    bind_entries(&doc, &page)?;
    bind_page(&doc, &page)?;
    bind_controls(&doc, &page)?;

    MOUNTED.with(|mounted| mounted.set(true));
    Ok(())
}

fn bind_entries(doc: &DomDocument, page: &Rc<RosterPage<Element>>) -> Result<(), JsValue> {
    for entry in &page.bindings().entries {
        let page = Rc::clone(page);
        let mut doc = doc.clone();
        let target = entry.clone();
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            match page.on_entry_click(&mut doc, &target) {
                Ok((_, Propagation::Stop)) => event.stop_propagation(),
                Ok((_, Propagation::Continue)) => {}
                Err(err) => {
                    warn!(%err, "entry click failed");
                    // Still keep the page-level fallback out of this click.
                    event.stop_propagation();
                }
            }
        });
        entry.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

fn bind_page(doc: &DomDocument, page: &Rc<RosterPage<Element>>) -> Result<(), JsValue> {
    let page = Rc::clone(page);
    let mut handler_doc = doc.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        if let Err(err) = page.on_page_click(&mut handler_doc) {
            warn!(%err, "page click failed");
        }
    });
    doc.document
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn bind_controls(doc: &DomDocument, page: &Rc<RosterPage<Element>>) -> Result<(), JsValue> {
    for control in &page.bindings().controls {
        let page = Rc::clone(page);
        let mut doc = doc.clone();
        let source = control.clone();
        let on_change = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let value = js_sys::Reflect::get(source.as_ref(), &JsValue::from_str("value"))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_default();
            if let Err(err) = page.on_selection_change(&mut doc, &source, &value) {
                warn!(%err, "filter failed");
            }
        });
        control.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }
    Ok(())
}

/// Filter the list sharing `select`'s page section.
///
/// Works whether or not the roster has been mounted.
#[wasm_bindgen(js_name = filterCharacters)]
pub fn filter_characters(select: HtmlSelectElement) -> Result<(), JsValue> {
    let mut doc = DomDocument::from_window().map_err(to_js)?;
    let block = doc.block_text(LAYOUT_BLOCK_ID);
    let control: &Element = select.as_ref();
    filter_inline(&mut doc, block.as_deref(), control, &select.value()).map_err(to_js)?;
    Ok(())
}

/// Assign [`filter_characters`] to `window.filterCharacters`.
///
/// Module exports are not globals; markup such as
/// `onchange="filterCharacters(this)"` resolves the name on `window`.
pub fn publish_inline_filter() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let inline = Closure::<dyn Fn(JsValue)>::new(|control: JsValue| {
        match control.dyn_into::<HtmlSelectElement>() {
            Ok(select) => {
                if let Err(err) = filter_characters(select) {
                    warn!(?err, "inline filter failed");
                }
            }
            Err(other) => warn!(?other, "inline filter needs a <select>"),
        }
    });
    js_sys::Reflect::set(
        window.as_ref(),
        &JsValue::from_str(INLINE_FILTER_GLOBAL),
        inline.as_ref(),
    )?;
    inline.forget();
    debug!(name = INLINE_FILTER_GLOBAL, "inline filter published");
    Ok(())
}
