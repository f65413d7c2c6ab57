//! Construction-time configuration for a dropdown instance.

use std::rc::Rc;

use web_sys::{Element, HtmlElement, MouseEvent};

use crate::position::{Offset, Placement, PositionConfig, PositionerFactory, PositioningSession};

/// Callback invoked after the dropdown opens or closes.
pub type StateCallback = Rc<dyn Fn()>;

/// Callback invoked when a menu item is clicked, with the item and the
/// originating event.
pub type ItemSelectCallback = Rc<dyn Fn(&Element, &MouseEvent)>;

/// Per-item action registered through
/// [`Dropdown::add_item`](crate::Dropdown::add_item). When present, clicking
/// the item invokes the action instead of following its link.
pub type ItemAction = Rc<dyn Fn(&MouseEvent)>;

/// Options merged onto defaults when attaching a dropdown. Everything is
/// optional; the two locating selectors have safe defaults.
#[derive(Clone)]
pub struct DropdownOptions {
    /// Selector for the trigger element, resolved within the container.
    pub trigger_selector: String,
    /// Selector for the panel element, resolved within the container.
    pub panel_selector: String,
    /// Preferred panel placement.
    pub placement: Placement,
    /// Panel displacement from its anchored position.
    pub offset: Offset,
    /// Close the dropdown after a menu item is clicked.
    pub close_on_select: bool,
    /// Show the trigger icon, when one is present.
    pub icon_visible: bool,
    /// Overwrite the trigger label at construction time.
    pub button_text: Option<String>,
    pub on_show: Option<StateCallback>,
    pub on_hide: Option<StateCallback>,
    pub on_item_select: Option<ItemSelectCallback>,
    /// Positioning collaborator factory. Defaults to
    /// [`AnchorPositioner`](crate::AnchorPositioner).
    pub positioner: Option<PositionerFactory>,
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            trigger_selector: "#dropdown-button".into(),
            panel_selector: "#dropdown-menu".into(),
            placement: Placement::default(),
            offset: Offset::default(),
            close_on_select: true,
            icon_visible: true,
            button_text: None,
            on_show: None,
            on_hide: None,
            on_item_select: None,
            positioner: None,
        }
    }
}

impl DropdownOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_show(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_show = Some(Rc::new(callback));
        self
    }

    pub fn on_hide(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_hide = Some(Rc::new(callback));
        self
    }

    pub fn on_item_select(mut self, callback: impl Fn(&Element, &MouseEvent) + 'static) -> Self {
        self.on_item_select = Some(Rc::new(callback));
        self
    }

    pub fn positioner(
        mut self,
        factory: impl Fn(&HtmlElement, &HtmlElement, &PositionConfig) -> Box<dyn PositioningSession>
            + 'static,
    ) -> Self {
        self.positioner = Some(Rc::new(factory));
        self
    }

    pub(crate) fn position_config(&self) -> PositionConfig {
        PositionConfig {
            placement: self.placement,
            offset: self.offset,
            ..PositionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let options = DropdownOptions::default();
        assert_eq!(options.trigger_selector, "#dropdown-button");
        assert_eq!(options.panel_selector, "#dropdown-menu");
        assert_eq!(options.placement, Placement::BottomStart);
        assert_eq!(options.offset, Offset::default());
        assert!(options.close_on_select);
        assert!(options.icon_visible);
        assert!(options.button_text.is_none());
        assert!(options.on_show.is_none());
    }

    #[test]
    fn builder_setters_install_callbacks() {
        let options = DropdownOptions::new()
            .on_show(|| {})
            .on_hide(|| {})
            .on_item_select(|_, _| {});
        assert!(options.on_show.is_some());
        assert!(options.on_hide.is_some());
        assert!(options.on_item_select.is_some());
    }
}
