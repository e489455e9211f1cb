pub mod memory;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{action::ActionName, input::snapshot::RawGamepad};

/// Possible errors reported by the platform capability surface. None of
/// these are fatal to the navigator; they are logged and the operation is
/// retried or skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("capability not supported: {0}")]
    Unsupported(&'static str),
    #[error("platform is temporarily unavailable: {0}")]
    Unavailable(String),
    #[error("platform operation failed: {0}")]
    Failed(String),
}

/// Opaque handle to an element in the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A focus candidate reported by the platform, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    pub id: ElementId,
    /// Effective tabindex. Natively focusable elements without an explicit
    /// tabindex report 0.
    pub tab_index: i32,
    pub disabled: bool,
    pub hidden: bool,
}

/// What the click action needs to know about an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A `<select>` element with its option count and declared size
    Select { options: u32, size: u32 },
    /// Text-input-like elements that get an on-screen keyboard instead of a
    /// native click
    TextInput,
    Other,
}

/// The surface navigation currently applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Document,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDirection {
    Back,
    Forward,
}

/// A rumble effect for the haptic actuator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VibrationEffect {
    pub duration_ms: u64,
    pub strong_magnitude: f64,
    pub weak_magnitude: f64,
}

/// Subscription handle for DOM mutation observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// A request for a privileged browser operation (tab/window switching,
/// zoom, opening URLs). The core only emits these; the host performs them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRequest {
    pub action: ActionName,
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl HostRequest {
    pub fn new(action: ActionName) -> Self {
        Self {
            action,
            payload: serde_json::Map::new(),
        }
    }

    /// Add the given field to the request payload
    pub fn with<V: Into<serde_json::Value>>(mut self, key: &str, value: V) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }
}

/// Decides whether navigation applies to the main document or to a modal
/// surface layered over it (e.g. the on-screen keyboard).
pub trait ModalArbiter {
    fn active_surface(&self) -> Surface;
}

/// The capability surface the navigator drives. Every method must be cheap
/// and non-blocking; implementations report failures instead of panicking.
pub trait Platform: ModalArbiter {
    /// Enumerate all gamepads known to the platform
    fn gamepads(&self) -> Result<Vec<RawGamepad>, PlatformError>;

    /// Focus candidates for the given surface in document order
    fn focusable_elements(&self, surface: Surface) -> Vec<ElementInfo>;
    /// The element that currently has focus, if any
    fn active_element(&self) -> Option<ElementId>;
    /// Request focus on the given element. The platform may refuse silently;
    /// callers check [Platform::active_element] afterwards.
    fn focus(&mut self, id: ElementId) -> Result<(), PlatformError>;
    fn element_kind(&self, id: ElementId) -> Option<ElementKind>;
    fn click(&mut self, id: ElementId) -> Result<(), PlatformError>;
    fn set_select_size(&mut self, id: ElementId, size: u32) -> Result<(), PlatformError>;
    fn open_onscreen_keyboard(&mut self, id: ElementId) -> Result<(), PlatformError>;
    fn dispatch_key(&mut self, id: ElementId, key: &str) -> Result<(), PlatformError>;

    /// Current document scroll offset (x, y)
    fn scroll_position(&self) -> (f64, f64);
    /// Maximum document scroll offset (x, y)
    fn scroll_extent(&self) -> (f64, f64);
    fn scroll_by(&mut self, dx: f64, dy: f64);

    fn current_url(&self) -> Option<String>;
    fn has_history_entry(&self, direction: HistoryDirection) -> bool;
    fn navigate_history(&mut self, direction: HistoryDirection) -> Result<(), PlatformError>;
    /// Remember the focused tab index for the given page
    fn store_focus_index(&mut self, url: &str, index: usize) -> Result<(), PlatformError>;
    /// Consume a previously stored tab index for the given page
    fn take_focus_index(&mut self, url: &str) -> Option<usize>;

    fn vibrate(&mut self, effect: VibrationEffect) -> Result<(), PlatformError>;
    fn send_request(&mut self, request: HostRequest) -> Result<(), PlatformError>;

    /// Start observing DOM mutations. The host reports mutations back with
    /// the returned handle.
    fn observe_mutations(&mut self) -> Result<ObserverHandle, PlatformError>;
    fn disconnect_observer(&mut self, handle: ObserverHandle);
}
