//! Shared document-level event dispatch.
//!
//! Every dropdown needs to hear about clicks outside its own container and
//! about key presses while it is open. Instead of each instance attaching
//! its own document-wide listeners, this module keeps one thread-local
//! registry of live instances and installs exactly one click listener and
//! one keydown listener on the document. The listeners are attached when the
//! first instance registers and removed, with the same stored closures that
//! were attached, when the last one unregisters.

use std::cell::RefCell;
use std::rc::Weak;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, KeyboardEvent, MouseEvent};

/// Implemented by dropdown instances; the registry holds weak references
/// only and never owns an instance.
pub(crate) trait DocumentObserver {
    fn document_click(&self, event: &MouseEvent);
    fn document_keydown(&self, event: &KeyboardEvent);
}

struct Dispatcher {
    observers: Vec<Weak<dyn DocumentObserver>>,
    click: Option<Closure<dyn FnMut(MouseEvent)>>,
    keydown: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

impl Dispatcher {
    const fn new() -> Self {
        Self {
            observers: Vec::new(),
            click: None,
            keydown: None,
        }
    }
}

thread_local! {
    static DISPATCHER: RefCell<Dispatcher> = RefCell::new(Dispatcher::new());
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub(crate) fn register(observer: Weak<dyn DocumentObserver>) {
    DISPATCHER.with(|cell| {
        let mut dispatcher = cell.borrow_mut();
        dispatcher.observers.push(observer);
        if dispatcher.click.is_none() {
            install(&mut dispatcher);
        }
    });
}

pub(crate) fn unregister(observer: &Weak<dyn DocumentObserver>) {
    DISPATCHER.with(|cell| {
        let mut dispatcher = cell.borrow_mut();
        dispatcher
            .observers
            .retain(|entry| entry.strong_count() > 0 && !entry.ptr_eq(observer));
        if dispatcher.observers.is_empty() {
            uninstall(&mut dispatcher);
        }
    });
}

fn install(dispatcher: &mut Dispatcher) {
    let Some(document) = document() else {
        return;
    };

    let click = Closure::wrap(Box::new(|event: MouseEvent| {
        dispatch(|observer| observer.document_click(&event));
    }) as Box<dyn FnMut(_)>);
    let keydown = Closure::wrap(Box::new(|event: KeyboardEvent| {
        dispatch(|observer| observer.document_keydown(&event));
    }) as Box<dyn FnMut(_)>);

    let _ = document.add_event_listener_with_callback("click", click.as_ref().unchecked_ref());
    let _ = document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());

    dispatcher.click = Some(click);
    dispatcher.keydown = Some(keydown);
}

fn uninstall(dispatcher: &mut Dispatcher) {
    let Some(document) = document() else {
        dispatcher.click = None;
        dispatcher.keydown = None;
        return;
    };

    if let Some(click) = dispatcher.click.take() {
        let _ =
            document.remove_event_listener_with_callback("click", click.as_ref().unchecked_ref());
    }
    if let Some(keydown) = dispatcher.keydown.take() {
        let _ = document
            .remove_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    }
}

/// Fan an event out to every live observer. Observers are snapshotted first
/// so a handler may unregister (or attach new dropdowns) re-entrantly; dead
/// entries are pruned afterwards.
fn dispatch(mut notify: impl FnMut(&dyn DocumentObserver)) {
    let snapshot = DISPATCHER.with(|cell| cell.borrow().observers.clone());
    for entry in &snapshot {
        if let Some(observer) = entry.upgrade() {
            notify(&*observer);
        }
    }
    DISPATCHER.with(|cell| {
        let mut dispatcher = cell.borrow_mut();
        dispatcher.observers.retain(|entry| entry.strong_count() > 0);
        if dispatcher.observers.is_empty() && dispatcher.click.is_some() {
            uninstall(&mut dispatcher);
        }
    });
}
