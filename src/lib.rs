//! Dropdown menu behavior for web applications.
//!
//! `flowdrop` attaches open/close state, keyboard navigation, outside-click
//! dismissal, and floating-panel positioning to an existing DOM subtree. It
//! owns no markup and no styling: the host page provides a trigger and a
//! panel inside a container, styles the `hidden` marker class, and this
//! crate only flips state on what is already there.
//!
//! ```no_run
//! use flowdrop::{Dropdown, DropdownOptions};
//!
//! let document = web_sys::window().unwrap().document().unwrap();
//! let container = document.get_element_by_id("user-menu").unwrap();
//!
//! let dropdown = Dropdown::attach(
//!     &container,
//!     DropdownOptions::new().on_show(|| log::debug!("menu opened")),
//! )?;
//!
//! dropdown.show();
//! # Ok::<(), flowdrop::Error>(())
//! ```
//!
//! Expected structure inside the container: a trigger at the configured
//! selector (default `#dropdown-button`), a panel at the configured selector
//! (default `#dropdown-menu`), zero or more `.dropdown-item` elements, and
//! optionally `.dropdown-button-text`, `.dropdown-button-icon`,
//! `.dropdown-header`, and a `role="menu"` container for item insertion.

mod dispatch;
mod dom;
mod dropdown;
mod error;
mod options;
mod position;

pub use dom::{
    BUTTON_ICON_CLASS, BUTTON_TEXT_CLASS, HEADER_CLASS, HIDDEN_CLASS, ITEM_CLASS,
    MENU_ROLE_SELECTOR,
};
pub use dropdown::Dropdown;
pub use error::Error;
pub use options::{DropdownOptions, ItemAction, ItemSelectCallback, StateCallback};
pub use position::{
    AnchorPositioner, Offset, Placement, PositionConfig, PositionerFactory, PositioningSession,
};

use wasm_bindgen::prelude::*;

/// Install the console logger and panic hook. Call once from the host app
/// before attaching dropdowns; safe to call more than once.
#[wasm_bindgen]
pub fn init_log() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}
