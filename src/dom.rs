//! Thin wrappers over repetitive DOM operations: the hidden marker class,
//! item enumeration, and focus queries.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlElement};

/// Class name the host stylesheet interprets as visual suppression.
pub const HIDDEN_CLASS: &str = "hidden";

/// Class marking the interactive items of a menu.
pub const ITEM_CLASS: &str = "dropdown-item";

/// Class marking the trigger's text label.
pub const BUTTON_TEXT_CLASS: &str = "dropdown-button-text";

/// Class marking the trigger's chevron/icon.
pub const BUTTON_ICON_CLASS: &str = "dropdown-button-icon";

/// Class marking the panel's header block.
pub const HEADER_CLASS: &str = "dropdown-header";

/// Selector for the container new items are appended to.
pub const MENU_ROLE_SELECTOR: &str = r#"[role="menu"]"#;

/// Toggle the hidden marker class on an element.
pub(crate) fn set_hidden(el: &Element, hidden: bool) {
    let _ = if hidden {
        el.class_list().add_1(HIDDEN_CLASS)
    } else {
        el.class_list().remove_1(HIDDEN_CLASS)
    };
}

/// Enumerate the menu items inside `container`, in document order.
pub(crate) fn items_of(container: &Element) -> Vec<HtmlElement> {
    let mut items = Vec::new();
    if let Ok(list) = container.query_selector_all(&format!(".{ITEM_CLASS}")) {
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                items.push(el);
            }
        }
    }
    items
}

/// The element that currently holds keyboard focus, if any.
pub(crate) fn active_element() -> Option<Element> {
    web_sys::window()?.document()?.active_element()
}

/// Position of `el` within `items`, comparing JS object identity.
pub(crate) fn index_of(items: &[HtmlElement], el: &Element) -> Option<usize> {
    let needle: &JsValue = el.as_ref();
    items
        .iter()
        .position(|item| AsRef::<JsValue>::as_ref(item) == needle)
}

/// Resolve an event's target to the nearest enclosing menu item, if the
/// event originated inside one.
pub(crate) fn closest_item(event: &Event) -> Option<HtmlElement> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target
        .closest(&format!(".{ITEM_CLASS}"))
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}
