//! Placement of the floating panel relative to its trigger.
//!
//! The dropdown controller depends on exactly three operations from this
//! module: create a session for a (trigger, panel) pair, recompute placement
//! via [`PositioningSession::update`], and release the session by dropping
//! it. [`AnchorPositioner`] is the built-in collaborator; hosts can inject
//! their own through [`DropdownOptions::positioner`](crate::DropdownOptions).

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use web_sys::HtmlElement;

/// Preferred side and alignment of the panel relative to the trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Below the trigger, left edges aligned.
    #[default]
    BottomStart,
    /// Below the trigger, centered.
    Bottom,
    /// Below the trigger, right edges aligned.
    BottomEnd,
    /// Above the trigger, left edges aligned.
    TopStart,
    /// Above the trigger, centered.
    Top,
    /// Above the trigger, right edges aligned.
    TopEnd,
}

impl Placement {
    pub(crate) fn is_top(self) -> bool {
        matches!(self, Self::TopStart | Self::Top | Self::TopEnd)
    }

    /// The same alignment on the opposite side.
    pub(crate) fn flipped(self) -> Self {
        match self {
            Self::BottomStart => Self::TopStart,
            Self::Bottom => Self::Top,
            Self::BottomEnd => Self::TopEnd,
            Self::TopStart => Self::BottomStart,
            Self::Top => Self::Bottom,
            Self::TopEnd => Self::BottomEnd,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::BottomStart => "bottom-start",
            Self::Bottom => "bottom",
            Self::BottomEnd => "bottom-end",
            Self::TopStart => "top-start",
            Self::Top => "top",
            Self::TopEnd => "top-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = String;

    /// Parse the CSS-style form used in markup, e.g. `"bottom-start"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom-start" => Ok(Self::BottomStart),
            "bottom" => Ok(Self::Bottom),
            "bottom-end" => Ok(Self::BottomEnd),
            "top-start" => Ok(Self::TopStart),
            "top" => Ok(Self::Top),
            "top-end" => Ok(Self::TopEnd),
            other => Err(format!("unknown placement: {other}")),
        }
    }
}

/// Panel displacement from its anchored position, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    /// Displacement along the trigger edge.
    pub skidding: f64,
    /// Gap between trigger and panel.
    pub distance: f64,
}

impl Default for Offset {
    fn default() -> Self {
        Self {
            skidding: 0.0,
            distance: 8.0,
        }
    }
}

/// Configuration handed to the positioning collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionConfig {
    pub placement: Placement,
    pub offset: Offset,
    /// Minimum clearance kept between the panel and the viewport edge when
    /// deciding whether to flip sides.
    pub padding: f64,
}

impl PositionConfig {
    /// Viewport clearance used when the caller doesn't override it.
    pub const DEFAULT_PADDING: f64 = 8.0;
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            offset: Offset::default(),
            padding: Self::DEFAULT_PADDING,
        }
    }
}

/// A live placement session for one (trigger, panel) pair. Recomputed on
/// demand, released on drop.
pub trait PositioningSession {
    /// Recompute and apply the panel's placement now.
    fn update(&self);
}

/// Factory used to create a session at dropdown construction time.
pub type PositionerFactory =
    Rc<dyn Fn(&HtmlElement, &HtmlElement, &PositionConfig) -> Box<dyn PositioningSession>>;

/// Built-in positioning collaborator. Places the panel absolutely against
/// its offset parent, anchored to the trigger's client rect, and flips to
/// the opposite side when the preferred side would overflow the viewport.
pub struct AnchorPositioner {
    trigger: HtmlElement,
    panel: HtmlElement,
    config: PositionConfig,
}

impl AnchorPositioner {
    pub fn create(
        trigger: &HtmlElement,
        panel: &HtmlElement,
        config: &PositionConfig,
    ) -> Box<dyn PositioningSession> {
        Box::new(Self {
            trigger: trigger.clone(),
            panel: panel.clone(),
            config: *config,
        })
    }

    /// Side selection: keep the preferred side unless it overflows the
    /// viewport and the opposite side has room.
    fn resolve_side(&self, trigger: &web_sys::DomRect, panel_height: f64) -> Placement {
        let preferred = self.config.placement;
        let Some(viewport_height) = web_sys::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
        else {
            return preferred;
        };

        let distance = self.config.offset.distance;
        let padding = self.config.padding;
        let fits_below = trigger.bottom() + distance + panel_height <= viewport_height - padding;
        let fits_above = trigger.top() - distance - panel_height >= padding;

        if preferred.is_top() {
            if !fits_above && fits_below {
                return preferred.flipped();
            }
        } else if !fits_below && fits_above {
            return preferred.flipped();
        }
        preferred
    }
}

impl PositioningSession for AnchorPositioner {
    fn update(&self) {
        let parent_rect = self
            .panel
            .offset_parent()
            .map(|p| p.get_bounding_client_rect());
        let Some(parent_rect) = parent_rect else {
            // Panel isn't laid out yet (display: none); nothing to place.
            return;
        };

        let trigger_rect = self.trigger.get_bounding_client_rect();
        let panel_width = f64::from(self.panel.offset_width());
        let panel_height = f64::from(self.panel.offset_height());

        let placement = self.resolve_side(&trigger_rect, panel_height);
        let offset = self.config.offset;

        let x = match placement {
            Placement::BottomStart | Placement::TopStart => trigger_rect.left(),
            Placement::Bottom | Placement::Top => {
                trigger_rect.left() + (trigger_rect.width() - panel_width) / 2.0
            }
            Placement::BottomEnd | Placement::TopEnd => trigger_rect.right() - panel_width,
        } + offset.skidding;

        let y = if placement.is_top() {
            trigger_rect.top() - offset.distance - panel_height
        } else {
            trigger_rect.bottom() + offset.distance
        };

        let style = self.panel.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{}px", x - parent_rect.left()));
        let _ = style.set_property("top", &format!("{}px", y - parent_rect.top()));
    }
}

impl Drop for AnchorPositioner {
    fn drop(&mut self) {
        // Release the session: remove the inline styles this session wrote.
        let style = self.panel.style();
        let _ = style.remove_property("position");
        let _ = style.remove_property("left");
        let _ = style.remove_property("top");
    }
}
