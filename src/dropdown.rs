//! The dropdown controller: one open/closed state per trigger+panel pair,
//! listener wiring, keyboard navigation, and content mutation.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, trace};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent, Node};

use crate::dispatch::{self, DocumentObserver};
use crate::dom;
use crate::error::Error;
use crate::options::{DropdownOptions, ItemAction};
use crate::position::{AnchorPositioner, PositioningSession};

/// Delay before moving focus into a freshly shown panel. The panel has to be
/// rendered visible before its children can receive focus, so the move runs
/// after the current event-handling turn.
const FOCUS_DELAY_MS: u32 = 10;

/// An attached dropdown. Holds the only strong reference to the instance;
/// dropping the handle (or calling [`Dropdown::destroy`]) detaches every
/// listener this instance added and releases its positioning session.
pub struct Dropdown {
    inner: Rc<Inner>,
}

struct Inner {
    weak: Weak<Inner>,
    container: Element,
    trigger: HtmlElement,
    panel: HtmlElement,
    trigger_text: Option<Element>,
    trigger_icon: Option<Element>,
    open: Cell<bool>,
    options: DropdownOptions,
    session: Box<dyn PositioningSession>,
    trigger_click: RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>,
    container_click: RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>,
    pending_focus: RefCell<Option<Timeout>>,
    item_actions: RefCell<Vec<(Element, ItemAction)>>,
    registration: RefCell<Option<Weak<dyn DocumentObserver>>>,
    detached: Cell<bool>,
}

impl Dropdown {
    /// Attach dropdown behavior to `container`.
    ///
    /// Locates the trigger and panel by the configured selectors (failing if
    /// either is absent), normalizes the closed state on both, applies the
    /// label/icon options, wires up all listeners, and creates the
    /// positioning session. Fully synchronous; the instance is usable as
    /// soon as this returns.
    pub fn attach(container: &Element, options: DropdownOptions) -> Result<Dropdown, Error> {
        let trigger = query::<HtmlElement>(container, &options.trigger_selector)
            .ok_or_else(|| Error::TriggerNotFound(options.trigger_selector.clone()))?;
        let panel = query::<HtmlElement>(container, &options.panel_selector)
            .ok_or_else(|| Error::PanelNotFound(options.panel_selector.clone()))?;

        let trigger_text = query::<Element>(container, &format!(".{}", dom::BUTTON_TEXT_CLASS));
        let trigger_icon = query::<Element>(container, &format!(".{}", dom::BUTTON_ICON_CLASS));

        let config = options.position_config();
        let session = match &options.positioner {
            Some(factory) => factory(&trigger, &panel, &config),
            None => AnchorPositioner::create(&trigger, &panel, &config),
        };

        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let trigger_click = {
                let weak = weak.clone();
                Closure::wrap(Box::new(move |event: MouseEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.toggle(Some(&event));
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let container_click = {
                let weak = weak.clone();
                Closure::wrap(Box::new(move |event: MouseEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.item_clicked(&event);
                    }
                }) as Box<dyn FnMut(_)>)
            };

            Inner {
                weak: weak.clone(),
                container: container.clone(),
                trigger,
                panel,
                trigger_text,
                trigger_icon,
                open: Cell::new(false),
                options,
                session,
                trigger_click: RefCell::new(Some(trigger_click)),
                container_click: RefCell::new(Some(container_click)),
                pending_focus: RefCell::new(None),
                item_actions: RefCell::new(Vec::new()),
                registration: RefCell::new(None),
                detached: Cell::new(false),
            }
        });

        // Closed is the initial state; make the DOM agree with it.
        dom::set_hidden(&inner.panel, true);
        let _ = inner.trigger.set_attribute("aria-expanded", "false");

        if let Some(text) = inner.options.button_text.clone() {
            inner.set_button_text(&text);
        }
        inner.set_icon_visible(inner.options.icon_visible);

        if let Some(closure) = inner.trigger_click.borrow().as_ref() {
            let _ = inner
                .trigger
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
        // One delegated listener at the container serves every item, present
        // and future; items added later need no registration of their own.
        if let Some(closure) = inner.container_click.borrow().as_ref() {
            let _ = inner
                .container
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }

        let observer: Weak<dyn DocumentObserver> =
            Rc::downgrade(&(inner.clone() as Rc<dyn DocumentObserver>));
        dispatch::register(observer.clone());
        *inner.registration.borrow_mut() = Some(observer);

        debug!("dropdown attached (trigger `{}`)", inner.options.trigger_selector);
        Ok(Dropdown { inner })
    }

    /// Whether the panel is currently shown.
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Open if closed, close if open. When called with the originating click
    /// event, stops its propagation so the outside-click handler never sees
    /// the same interaction.
    pub fn toggle(&self, event: Option<&MouseEvent>) {
        self.inner.toggle(event);
    }

    /// Show the panel. No-op if already open.
    pub fn show(&self) {
        self.inner.show();
    }

    /// Hide the panel. No-op if already closed.
    pub fn hide(&self) {
        self.inner.hide();
    }

    /// Overwrite the trigger label. No-op if the label element is absent.
    pub fn set_button_text(&self, text: &str) {
        self.inner.set_button_text(text);
    }

    /// Show or hide the trigger icon. No-op if the icon element is absent.
    pub fn set_icon_visible(&self, visible: bool) {
        self.inner.set_icon_visible(visible);
    }

    /// Overwrite the header text. No-op if the header element is absent.
    pub fn set_header_text(&self, text: &str) {
        self.inner.set_header_text(text);
    }

    /// Append a menu item with the given label and link target to the
    /// `role="menu"` container. Returns `None` without side effects if that
    /// container is absent. When `action` is given, clicking the item
    /// invokes it instead of following the link.
    pub fn add_item(
        &self,
        text: &str,
        url: &str,
        action: Option<ItemAction>,
    ) -> Option<HtmlElement> {
        self.inner.add_item(text, url, action)
    }

    /// Remove the item at `index` in document order. Out-of-range indices
    /// are a silent no-op.
    pub fn remove_item(&self, index: usize) {
        self.inner.remove_item(index);
    }

    /// The current menu items, in document order.
    pub fn items(&self) -> Vec<HtmlElement> {
        dom::items_of(&self.inner.container)
    }

    /// Tear the instance down: detach every listener it added, cancel any
    /// pending focus move, and release the positioning session. Consuming
    /// `self` makes use-after-teardown unrepresentable; dropping the handle
    /// without calling this has the same effect.
    pub fn destroy(self) {
        self.inner.detach();
    }
}

impl Drop for Dropdown {
    fn drop(&mut self) {
        self.inner.detach();
    }
}

impl Inner {
    fn toggle(&self, event: Option<&MouseEvent>) {
        if let Some(event) = event {
            event.stop_propagation();
        }
        if self.open.get() {
            self.hide();
        } else {
            self.show();
        }
    }

    fn show(&self) {
        if self.open.get() {
            return;
        }
        self.open.set(true);
        dom::set_hidden(&self.panel, false);
        let _ = self.trigger.set_attribute("aria-expanded", "true");
        self.session.update();
        self.schedule_focus();
        trace!("dropdown shown");
        if let Some(on_show) = &self.options.on_show {
            on_show();
        }
    }

    fn hide(&self) {
        if !self.open.get() {
            return;
        }
        // Cancel any focus move still pending from show().
        self.pending_focus.borrow_mut().take();
        self.open.set(false);
        dom::set_hidden(&self.panel, true);
        let _ = self.trigger.set_attribute("aria-expanded", "false");
        trace!("dropdown hidden");
        if let Some(on_hide) = &self.options.on_hide {
            on_hide();
        }
    }

    /// Schedule the deferred move of keyboard focus onto the first item.
    /// The task is cancelled by `hide`, `destroy`, and by a newer `show`.
    fn schedule_focus(&self) {
        let weak = self.weak.clone();
        let task = Timeout::new(FOCUS_DELAY_MS, move || {
            if let Some(inner) = weak.upgrade() {
                inner.pending_focus.borrow_mut().take();
                if inner.open.get() {
                    if let Some(first) = dom::items_of(&inner.container).into_iter().next() {
                        let _ = first.focus();
                    }
                }
            }
        });
        *self.pending_focus.borrow_mut() = Some(task);
    }

    /// Delegated handler for clicks bubbling through the container.
    fn item_clicked(&self, event: &MouseEvent) {
        let Some(item) = dom::closest_item(event) else {
            return;
        };
        if !self.container.contains(Some(item.as_ref())) {
            return;
        }
        if let Some(action) = self.action_for(&item) {
            event.prevent_default();
            action(event);
        }
        if let Some(on_item_select) = &self.options.on_item_select {
            on_item_select(item.as_ref(), event);
        }
        if self.options.close_on_select {
            self.hide();
        }
    }

    fn action_for(&self, item: &HtmlElement) -> Option<ItemAction> {
        let needle: &Element = item.as_ref();
        self.item_actions
            .borrow()
            .iter()
            .find(|(el, _)| el == needle)
            .map(|(_, action)| action.clone())
    }

    fn set_button_text(&self, text: &str) {
        if let Some(label) = &self.trigger_text {
            label.set_text_content(Some(text));
        }
    }

    fn set_icon_visible(&self, visible: bool) {
        if let Some(icon) = &self.trigger_icon {
            dom::set_hidden(icon, !visible);
        }
    }

    fn set_header_text(&self, text: &str) {
        let Some(header) = query::<Element>(&self.container, &format!(".{}", dom::HEADER_CLASS))
        else {
            return;
        };
        match header.first_element_child() {
            Some(child) => child.set_text_content(Some(text)),
            None => header.set_text_content(Some(text)),
        }
    }

    fn add_item(&self, text: &str, url: &str, action: Option<ItemAction>) -> Option<HtmlElement> {
        let menu = query::<Element>(&self.container, dom::MENU_ROLE_SELECTOR)?;
        let document = menu.owner_document()?;
        let item: HtmlElement = document.create_element("a").ok()?.dyn_into().ok()?;
        item.set_class_name(dom::ITEM_CLASS);
        let _ = item.set_attribute("role", "menuitem");
        let _ = item.set_attribute("href", url);
        item.set_text_content(Some(text));
        menu.append_child(&item).ok()?;
        if let Some(action) = action {
            self.item_actions
                .borrow_mut()
                .push((item.clone().into(), action));
        }
        Some(item)
    }

    fn remove_item(&self, index: usize) {
        let items = dom::items_of(&self.container);
        let Some(item) = items.get(index) else {
            return;
        };
        item.remove();
        let removed: &Element = item.as_ref();
        self.item_actions.borrow_mut().retain(|(el, _)| el != removed);
    }

    /// Move keyboard focus one item forward or backward, wrapping at both
    /// ends. With no item focused, forward lands on the first item and
    /// backward on the last.
    fn step_focus(&self, forward: bool) {
        let items = dom::items_of(&self.container);
        if items.is_empty() {
            return;
        }
        let current = dom::active_element().and_then(|active| dom::index_of(&items, &active));
        let next = step_index(current, items.len(), forward);
        let _ = items[next].focus();
    }

    fn detach(&self) {
        if self.detached.replace(true) {
            return;
        }
        self.pending_focus.borrow_mut().take();
        // Detach with the exact closures that were attached.
        if let Some(closure) = self.trigger_click.borrow_mut().take() {
            let _ = self
                .trigger
                .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = self.container_click.borrow_mut().take() {
            let _ = self
                .container
                .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
        if let Some(observer) = self.registration.borrow_mut().take() {
            dispatch::unregister(&observer);
        }
        debug!("dropdown detached");
    }
}

impl DocumentObserver for Inner {
    fn document_click(&self, event: &MouseEvent) {
        if !self.open.get() {
            return;
        }
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = target
            .as_ref()
            .is_some_and(|node| self.container.contains(Some(node)));
        if !inside {
            self.hide();
        }
    }

    fn document_keydown(&self, event: &KeyboardEvent) {
        if !self.open.get() {
            return;
        }
        match event.key().as_str() {
            "Escape" => {
                event.prevent_default();
                self.hide();
                let _ = self.trigger.focus();
            }
            "ArrowDown" => {
                event.prevent_default();
                self.step_focus(true);
            }
            "ArrowUp" => {
                event.prevent_default();
                self.step_focus(false);
            }
            _ => {}
        }
    }
}

fn query<T: JsCast>(scope: &Element, selector: &str) -> Option<T> {
    scope
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Next focus index for arrow navigation, wrapping at both ends.
fn step_index(current: Option<usize>, len: usize, forward: bool) -> usize {
    match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    }
}

#[cfg(test)]
mod tests {
    use super::step_index;

    #[test]
    fn forward_steps_and_wraps() {
        assert_eq!(step_index(Some(0), 3, true), 1);
        assert_eq!(step_index(Some(1), 3, true), 2);
        assert_eq!(step_index(Some(2), 3, true), 0);
    }

    #[test]
    fn backward_steps_and_wraps() {
        assert_eq!(step_index(Some(2), 3, false), 1);
        assert_eq!(step_index(Some(0), 3, false), 2);
    }

    #[test]
    fn unfocused_lands_on_first_or_last() {
        assert_eq!(step_index(None, 3, true), 0);
        assert_eq!(step_index(None, 3, false), 2);
    }

    #[test]
    fn single_item_always_stays_put() {
        assert_eq!(step_index(Some(0), 1, true), 0);
        assert_eq!(step_index(Some(0), 1, false), 0);
    }
}
