pub mod click;
pub mod history;
pub mod host;
pub mod key;
pub mod scroll;
pub mod tab;

#[cfg(test)]
pub mod click_test;
#[cfg(test)]
pub mod scroll_test;

use std::{collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::Preferences,
    constants::{BOUNDARY_VIBRATION_DURATION_MS, BOUNDARY_VIBRATION_MAGNITUDE},
    focus::TabOrder,
    input::slot::VirtualSlot,
    platform::{ElementId, Platform, PlatformError, VibrationEffect},
    timer::Millis,
};

use self::scroll::ScrollMotion;

/// Every action a binding can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionName {
    Click,
    ForwardTab,
    ReverseTab,
    ThumbstickTabbing,
    ScrollLeft,
    ScrollRight,
    ScrollUp,
    ScrollDown,
    ScrollHorizontally,
    ScrollVertically,
    PreviousPageInHistory,
    NextPageInHistory,
    ThumbstickHistoryNavigation,
    ZoomIn,
    ZoomOut,
    ThumbstickZoom,
    MaximizeWindow,
    RestoreWindowSize,
    ThumbstickWindowSize,
    OpenNewTab,
    CloseCurrentTab,
    GoToPreviousTab,
    GoToNextTab,
    OpenNewWindow,
    CloseCurrentWindow,
    GoToPreviousWindow,
    GoToNextWindow,
    ReopenTabOrWindow,
    SendKey,
}

impl ActionName {
    pub const ALL: [ActionName; 29] = [
        ActionName::Click,
        ActionName::ForwardTab,
        ActionName::ReverseTab,
        ActionName::ThumbstickTabbing,
        ActionName::ScrollLeft,
        ActionName::ScrollRight,
        ActionName::ScrollUp,
        ActionName::ScrollDown,
        ActionName::ScrollHorizontally,
        ActionName::ScrollVertically,
        ActionName::PreviousPageInHistory,
        ActionName::NextPageInHistory,
        ActionName::ThumbstickHistoryNavigation,
        ActionName::ZoomIn,
        ActionName::ZoomOut,
        ActionName::ThumbstickZoom,
        ActionName::MaximizeWindow,
        ActionName::RestoreWindowSize,
        ActionName::ThumbstickWindowSize,
        ActionName::OpenNewTab,
        ActionName::CloseCurrentTab,
        ActionName::GoToPreviousTab,
        ActionName::GoToNextTab,
        ActionName::OpenNewWindow,
        ActionName::CloseCurrentWindow,
        ActionName::GoToPreviousWindow,
        ActionName::GoToNextWindow,
        ActionName::ReopenTabOrWindow,
        ActionName::SendKey,
    ];

    /// Returns the name used in bindings for this action
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::Click => "click",
            ActionName::ForwardTab => "forwardTab",
            ActionName::ReverseTab => "reverseTab",
            ActionName::ThumbstickTabbing => "thumbstickTabbing",
            ActionName::ScrollLeft => "scrollLeft",
            ActionName::ScrollRight => "scrollRight",
            ActionName::ScrollUp => "scrollUp",
            ActionName::ScrollDown => "scrollDown",
            ActionName::ScrollHorizontally => "scrollHorizontally",
            ActionName::ScrollVertically => "scrollVertically",
            ActionName::PreviousPageInHistory => "previousPageInHistory",
            ActionName::NextPageInHistory => "nextPageInHistory",
            ActionName::ThumbstickHistoryNavigation => "thumbstickHistoryNavigation",
            ActionName::ZoomIn => "zoomIn",
            ActionName::ZoomOut => "zoomOut",
            ActionName::ThumbstickZoom => "thumbstickZoom",
            ActionName::MaximizeWindow => "maximizeWindow",
            ActionName::RestoreWindowSize => "restoreWindowSize",
            ActionName::ThumbstickWindowSize => "thumbstickWindowSize",
            ActionName::OpenNewTab => "openNewTab",
            ActionName::CloseCurrentTab => "closeCurrentTab",
            ActionName::GoToPreviousTab => "goToPreviousTab",
            ActionName::GoToNextTab => "goToNextTab",
            ActionName::OpenNewWindow => "openNewWindow",
            ActionName::CloseCurrentWindow => "closeCurrentWindow",
            ActionName::GoToPreviousWindow => "goToPreviousWindow",
            ActionName::GoToNextWindow => "goToNextWindow",
            ActionName::ReopenTabOrWindow => "reopenTabOrWindow",
            ActionName::SendKey => "sendKey",
        }
    }

    /// Returns the static registry entry for this action
    pub fn definition(&self) -> ActionDefinition {
        use ActionName::*;

        let (description, params, default_repeat_rate) = match self {
            Click => ("Click the focused element", ParamSet::NONE, 0.0),
            ForwardTab => ("Focus the next element", ParamSet::REPEAT, 0.4),
            ReverseTab => ("Focus the previous element", ParamSet::REPEAT, 0.4),
            ThumbstickTabbing => (
                "Focus the next or previous element",
                ParamSet::REPEAT.with_invert(),
                0.4,
            ),
            ScrollLeft => ("Scroll left", ParamSet::SCROLL, 0.0),
            ScrollRight => ("Scroll right", ParamSet::SCROLL, 0.0),
            ScrollUp => ("Scroll up", ParamSet::SCROLL, 0.0),
            ScrollDown => ("Scroll down", ParamSet::SCROLL, 0.0),
            ScrollHorizontally => (
                "Scroll left or right",
                ParamSet::SCROLL.with_invert(),
                0.0,
            ),
            ScrollVertically => ("Scroll up or down", ParamSet::SCROLL.with_invert(), 0.0),
            PreviousPageInHistory => ("Go back in history", ParamSet::NONE, 0.0),
            NextPageInHistory => ("Go forward in history", ParamSet::NONE, 0.0),
            ThumbstickHistoryNavigation => (
                "Go back or forward in history",
                ParamSet::NONE.with_invert(),
                0.0,
            ),
            ZoomIn => ("Zoom in", ParamSet::REPEAT, 0.0),
            ZoomOut => ("Zoom out", ParamSet::REPEAT, 0.0),
            ThumbstickZoom => ("Zoom in or out", ParamSet::REPEAT.with_invert(), 0.0),
            MaximizeWindow => ("Maximize the window", ParamSet::NONE, 0.0),
            RestoreWindowSize => ("Restore the window size", ParamSet::NONE, 0.0),
            ThumbstickWindowSize => (
                "Maximize or restore the window",
                ParamSet::NONE.with_invert(),
                0.0,
            ),
            OpenNewTab => ("Open a new tab", ParamSet::BACKGROUND, 0.0),
            CloseCurrentTab => ("Close the current tab", ParamSet::NONE, 0.0),
            GoToPreviousTab => ("Switch to the previous tab", ParamSet::REPEAT, 0.0),
            GoToNextTab => ("Switch to the next tab", ParamSet::REPEAT, 0.0),
            OpenNewWindow => ("Open a new window", ParamSet::BACKGROUND, 0.0),
            CloseCurrentWindow => ("Close the current window", ParamSet::NONE, 0.0),
            GoToPreviousWindow => ("Switch to the previous window", ParamSet::REPEAT, 0.0),
            GoToNextWindow => ("Switch to the next window", ParamSet::REPEAT, 0.0),
            ReopenTabOrWindow => ("Reopen the last closed tab or window", ParamSet::NONE, 0.0),
            SendKey => (
                "Send a key to the focused element",
                ParamSet::REPEAT.with_key(),
                0.0,
            ),
        };

        let gate = match self {
            Click => Gate::AnyPress,
            _ => Gate::Cutoff,
        };
        let kind = match self {
            ScrollLeft | ScrollRight | ScrollUp | ScrollDown | ScrollHorizontally
            | ScrollVertically => DispatchKind::Continuous,
            _ => DispatchKind::Discrete,
        };

        ActionDefinition {
            name: *self,
            description,
            params,
            default_repeat_rate,
            gate,
            kind,
        }
    }
}

impl Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an action name that is not registered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionName {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .iter()
            .find(|name| name.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// The set of binding parameters an action accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamSet {
    pub repeat_rate: bool,
    pub invert: bool,
    pub scroll_factor: bool,
    pub background: bool,
    pub key: bool,
}

impl ParamSet {
    pub const NONE: ParamSet = ParamSet {
        repeat_rate: false,
        invert: false,
        scroll_factor: false,
        background: false,
        key: false,
    };
    pub const REPEAT: ParamSet = ParamSet {
        repeat_rate: true,
        ..ParamSet::NONE
    };
    pub const SCROLL: ParamSet = ParamSet {
        scroll_factor: true,
        ..ParamSet::NONE
    };
    pub const BACKGROUND: ParamSet = ParamSet {
        background: true,
        ..ParamSet::NONE
    };

    pub const fn with_invert(self) -> Self {
        ParamSet {
            invert: true,
            ..self
        }
    }

    pub const fn with_key(self) -> Self {
        ParamSet { key: true, ..self }
    }

    /// Returns the names of accepted parameters as they appear in bindings
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.repeat_rate {
            names.push("repeatRate");
        }
        if self.invert {
            names.push("invert");
        }
        if self.scroll_factor {
            names.push("scrollFactor");
        }
        if self.background {
            names.push("background");
        }
        if self.key {
            names.push("key");
        }
        names
    }
}

/// Threshold an input must exceed to activate an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Active above the `analogCutoff` preference
    Cutoff,
    /// Active on any non-zero value, even on analog-capable slots
    AnyPress,
}

/// How the dispatcher feeds an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// Fires on press and on repeat
    Discrete,
    /// Owns its own motion; also receives magnitude updates and releases
    Continuous,
}

/// Static registry entry for an action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionDefinition {
    pub name: ActionName,
    pub description: &'static str,
    pub params: ParamSet,
    /// Repeat rate in seconds used when a binding does not set one
    pub default_repeat_rate: f64,
    pub gate: Gate,
    pub kind: DispatchKind,
}

impl ActionDefinition {
    /// Returns the activation threshold for the given analog cutoff
    pub fn threshold(&self, cutoff: f64) -> f64 {
        match self.gate {
            Gate::Cutoff => cutoff,
            Gate::AnyPress => 0.0,
        }
    }
}

/// Resolved parameters passed to an action
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionParams {
    pub repeat_rate: f64,
    pub invert: bool,
    pub scroll_factor: Option<f64>,
    pub background: bool,
    pub key: Option<String>,
}

impl ActionParams {
    /// Returns the value with `invert` applied
    pub fn signed(&self, value: f64) -> f64 {
        if self.invert {
            -value
        } else {
            value
        }
    }
}

/// The reason an action is being invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The input crossed its activation threshold
    Press,
    /// A repeat timer re-fired with the last held value
    Repeat,
    /// The magnitude changed while active (continuous actions only)
    Update,
    /// The input fell back to rest
    Release,
}

/// One dispatched action invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub slot: VirtualSlot,
    pub action: ActionName,
    pub phase: Phase,
    pub value: f64,
    pub previous_value: f64,
    pub params: ActionParams,
}

impl Invocation {
    /// Returns true for phases that should trigger a discrete action
    pub fn fires(&self) -> bool {
        matches!(self.phase, Phase::Press | Phase::Repeat)
    }
}

/// Everything an action can touch while it runs
pub struct ActionContext<'a> {
    pub platform: &'a mut dyn Platform,
    pub tab_order: &'a mut TabOrder,
    pub preferences: &'a Preferences,
    pub page_in_view: bool,
    pub now: Millis,
}

impl ActionContext<'_> {
    /// Signal that a continuous action could not proceed further
    pub fn notify_boundary(&mut self) {
        if !self.preferences.vibrate_on_boundary {
            return;
        }
        let effect = VibrationEffect {
            duration_ms: BOUNDARY_VIBRATION_DURATION_MS,
            strong_magnitude: BOUNDARY_VIBRATION_MAGNITUDE,
            weak_magnitude: BOUNDARY_VIBRATION_MAGNITUDE,
        };
        match self.platform.vibrate(effect) {
            Ok(_) => (),
            Err(PlatformError::Unsupported(what)) => {
                log::debug!("Skipping boundary vibration: {what} not supported");
            }
            Err(e) => log::warn!("Failed to vibrate on boundary: {e}"),
        }
    }
}

/// Signature of every registered action implementation
pub type ActionHandler = fn(&mut NavigationActions, &mut ActionContext<'_>, &Invocation);

/// [NavigationActions] holds the action handler table along with the state
/// actions keep between invocations: scroll motion timers and the original
/// size of expanded select elements.
pub struct NavigationActions {
    handlers: HashMap<ActionName, ActionHandler>,
    scroll: ScrollMotion,
    expanded_selects: HashMap<ElementId, u32>,
}

impl std::fmt::Debug for NavigationActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationActions")
            .field("handlers", &self.handlers.len())
            .field("scroll", &self.scroll)
            .field("expanded_selects", &self.expanded_selects)
            .finish()
    }
}

impl Default for NavigationActions {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationActions {
    /// Build the handler table for every registered action
    pub fn new() -> Self {
        use ActionName::*;

        let mut handlers: HashMap<ActionName, ActionHandler> = HashMap::new();
        handlers.insert(Click, click::click);
        handlers.insert(ForwardTab, tab::forward_tab);
        handlers.insert(ReverseTab, tab::reverse_tab);
        handlers.insert(ThumbstickTabbing, tab::thumbstick_tabbing);
        handlers.insert(ScrollLeft, scroll::scroll_left);
        handlers.insert(ScrollRight, scroll::scroll_right);
        handlers.insert(ScrollUp, scroll::scroll_up);
        handlers.insert(ScrollDown, scroll::scroll_down);
        handlers.insert(ScrollHorizontally, scroll::scroll_horizontally);
        handlers.insert(ScrollVertically, scroll::scroll_vertically);
        handlers.insert(PreviousPageInHistory, history::previous_page);
        handlers.insert(NextPageInHistory, history::next_page);
        handlers.insert(ThumbstickHistoryNavigation, history::thumbstick_history);
        handlers.insert(ZoomIn, host::zoom_in);
        handlers.insert(ZoomOut, host::zoom_out);
        handlers.insert(ThumbstickZoom, host::thumbstick_zoom);
        handlers.insert(MaximizeWindow, host::maximize_window);
        handlers.insert(RestoreWindowSize, host::restore_window_size);
        handlers.insert(ThumbstickWindowSize, host::thumbstick_window_size);
        handlers.insert(OpenNewTab, host::open_new_tab);
        handlers.insert(CloseCurrentTab, host::forward_request);
        handlers.insert(GoToPreviousTab, host::forward_request);
        handlers.insert(GoToNextTab, host::forward_request);
        handlers.insert(OpenNewWindow, host::open_new_window);
        handlers.insert(CloseCurrentWindow, host::forward_request);
        handlers.insert(GoToPreviousWindow, host::forward_request);
        handlers.insert(GoToNextWindow, host::forward_request);
        handlers.insert(ReopenTabOrWindow, host::forward_request);
        handlers.insert(SendKey, key::send_key);

        Self {
            handlers,
            scroll: ScrollMotion::default(),
            expanded_selects: HashMap::new(),
        }
    }

    /// Look up the handler for the given action
    pub fn handler(&self, action: ActionName) -> Option<ActionHandler> {
        self.handlers.get(&action).copied()
    }

    /// Run the given invocation. Every action is a no-op while the page is
    /// not in view.
    pub fn perform(&mut self, ctx: &mut ActionContext<'_>, invocation: &Invocation) {
        if !ctx.page_in_view {
            log::trace!("Page not in view; ignoring {}", invocation.action);
            return;
        }
        let Some(handler) = self.handler(invocation.action) else {
            log::debug!("No handler registered for {}", invocation.action);
            return;
        };
        log::trace!(
            "Performing {} ({:?}) from {} with value {}",
            invocation.action,
            invocation.phase,
            invocation.slot,
            invocation.value
        );
        handler(self, ctx, invocation);
    }

    /// Returns the earliest scroll motion deadline
    pub fn next_deadline(&self) -> Option<Millis> {
        self.scroll.next_deadline()
    }

    /// Fire the next due scroll motion timer, if any. Returns true if a
    /// timer fired.
    pub fn fire_due(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some((direction, _)) = self.scroll.pop_due(ctx.now) else {
            return false;
        };
        if !ctx.page_in_view {
            self.scroll.stop(direction);
            return true;
        }
        self.scroll.nudge(ctx, direction);
        true
    }

    /// Returns true if a scroll motion timer is running
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_active()
    }

    /// Stop all continuous motion
    pub fn halt(&mut self) {
        self.scroll.stop_all();
    }
}
