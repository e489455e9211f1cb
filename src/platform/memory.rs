use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::{config::LoadError, input::snapshot::RawGamepad};

use super::{
    ElementId, ElementInfo, ElementKind, HistoryDirection, HostRequest, ModalArbiter,
    ObserverHandle, Platform, PlatformError, Surface, VibrationEffect,
};

/// Number of axes reported by a standard-mapping gamepad
pub const STANDARD_AXES: usize = 4;
/// Number of buttons reported by a standard-mapping gamepad
pub const STANDARD_BUTTONS: usize = 17;

/// The kind of control an in-memory element models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    #[default]
    Button,
    Link,
    Checkbox,
    Select,
    TextInput,
    /// Not natively focusable; tabbable only with an explicit tabindex
    Container,
}

/// An element of an in-memory page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryElement {
    pub id: ElementId,
    pub widget: Widget,
    /// Explicit tabindex attribute
    pub tab_index: Option<i32>,
    pub disabled: bool,
    pub hidden: bool,
    pub surface: Surface,
    /// Refuse focus silently, like an element that redirects focus away
    pub rejects_focus: bool,
    pub checked: bool,
    pub options: u32,
    pub size: u32,
}

impl Default for MemoryElement {
    fn default() -> Self {
        Self {
            id: ElementId(0),
            widget: Widget::Button,
            tab_index: None,
            disabled: false,
            hidden: false,
            surface: Surface::Document,
            rejects_focus: false,
            checked: false,
            options: 0,
            size: 0,
        }
    }
}

impl MemoryElement {
    pub fn new(id: u64, widget: Widget) -> Self {
        Self {
            id: ElementId(id),
            widget,
            ..Default::default()
        }
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn with_options(mut self, options: u32, size: u32) -> Self {
        self.options = options;
        self.size = size;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn on_modal(mut self) -> Self {
        self.surface = Surface::Modal;
        self
    }

    pub fn rejecting_focus(mut self) -> Self {
        self.rejects_focus = true;
        self
    }

    /// Effective tabindex, as a browser reports it
    pub fn effective_tab_index(&self) -> i32 {
        match (self.tab_index, self.widget) {
            (Some(index), _) => index,
            (None, Widget::Container) => -1,
            (None, _) => 0,
        }
    }

    fn info(&self) -> ElementInfo {
        ElementInfo {
            id: self.id,
            tab_index: self.effective_tab_index(),
            disabled: self.disabled,
            hidden: self.hidden,
        }
    }

    fn kind(&self) -> ElementKind {
        match self.widget {
            Widget::Select => ElementKind::Select {
                options: self.options,
                size: self.size,
            },
            Widget::TextInput => ElementKind::TextInput,
            _ => ElementKind::Other,
        }
    }
}

/// Observable side effect performed against a [MemoryPlatform]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Focus { element: ElementId },
    Click { element: ElementId },
    Toggle { element: ElementId, checked: bool },
    SelectSize { element: ElementId, size: u32 },
    OnscreenKeyboard { element: ElementId },
    Key { element: ElementId, key: String },
    Scroll { x: f64, y: f64 },
    Navigate { direction: HistoryDirection, url: Option<String> },
    Vibrate { vibration: VibrationEffect },
    Request { request: HostRequest },
}

/// Serializable description of a page used to seed a [MemoryPlatform]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageFixture {
    pub url: Option<String>,
    pub elements: Vec<MemoryElement>,
    pub focused: Option<ElementId>,
    pub scroll: [f64; 2],
    pub extent: [f64; 2],
    /// History entries behind the current page, oldest first
    pub back: Vec<String>,
    /// History entries ahead of the current page, nearest first
    pub forward: Vec<String>,
    pub modal: bool,
    pub vibration: bool,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            url: None,
            elements: Vec::new(),
            focused: None,
            scroll: [0.0, 0.0],
            extent: [0.0, 0.0],
            back: Vec::new(),
            forward: Vec::new(),
            modal: false,
            vibration: true,
        }
    }
}

impl PageFixture {
    /// Load a [PageFixture] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<PageFixture, LoadError> {
        let fixture: PageFixture = serde_yaml::from_str(content)?;
        Ok(fixture)
    }

    /// Load a [PageFixture] from the given YAML file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<PageFixture, LoadError> {
        let file = std::fs::File::open(path)?;
        let fixture: PageFixture = serde_yaml::from_reader(file)?;
        Ok(fixture)
    }
}

/// State of an in-memory page and its gamepads
#[derive(Debug, Default)]
pub struct MemoryPage {
    pub url: Option<String>,
    pub elements: Vec<MemoryElement>,
    pub focused: Option<ElementId>,
    pub scroll: (f64, f64),
    pub extent: (f64, f64),
    pub back: Vec<String>,
    pub forward: Vec<String>,
    pub modal: bool,
    pub vibration_supported: bool,
    pub gamepads: Vec<RawGamepad>,
    /// Fail gamepad enumeration, as when the gamepad service is unavailable
    pub gamepad_error: bool,
    pub focus_indices: HashMap<String, usize>,
    pub observers: Vec<ObserverHandle>,
    pub effects: Vec<Effect>,
    next_observer: u64,
}

impl From<PageFixture> for MemoryPage {
    fn from(fixture: PageFixture) -> Self {
        Self {
            url: fixture.url,
            elements: fixture.elements,
            focused: fixture.focused,
            scroll: (fixture.scroll[0], fixture.scroll[1]),
            extent: (fixture.extent[0], fixture.extent[1]),
            back: fixture.back,
            forward: fixture.forward,
            modal: fixture.modal,
            vibration_supported: fixture.vibration,
            ..Default::default()
        }
    }
}

impl MemoryPage {
    pub fn element(&self, id: ElementId) -> Option<&MemoryElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut MemoryElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    fn gamepad_mut(&mut self, index: u32) -> Option<&mut RawGamepad> {
        self.gamepads.iter_mut().find(|g| g.index == index)
    }
}

/// A [MemoryPlatform] is a shareable handle to an in-memory page. Cloning the
/// handle shares the page, so a caller can keep inspecting and driving it
/// while a navigator owns another handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlatform {
    page: Arc<Mutex<MemoryPage>>,
}

impl MemoryPlatform {
    pub fn new(page: MemoryPage) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
        }
    }

    pub fn from_fixture(fixture: PageFixture) -> Self {
        Self::new(fixture.into())
    }

    /// Lock the page for inspection or modification
    pub fn page(&self) -> MutexGuard<'_, MemoryPage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a connected standard-mapping gamepad at rest
    pub fn connect_gamepad(&self, index: u32) {
        let mut page = self.page();
        page.gamepads.retain(|g| g.index != index);
        page.gamepads.push(RawGamepad {
            index,
            id: format!("Standard Gamepad {index}"),
            connected: true,
            axes: vec![0.0; STANDARD_AXES],
            buttons: vec![0.0; STANDARD_BUTTONS],
        });
    }

    /// Mark the given gamepad as disconnected
    pub fn disconnect_gamepad(&self, index: u32) {
        if let Some(gamepad) = self.page().gamepad_mut(index) {
            gamepad.connected = false;
        }
    }

    /// Set a button value on the given gamepad
    pub fn set_button(&self, gamepad: u32, index: usize, value: f64) {
        let mut page = self.page();
        let Some(gamepad) = page.gamepad_mut(gamepad) else {
            return;
        };
        if gamepad.buttons.len() <= index {
            gamepad.buttons.resize(index + 1, 0.0);
        }
        gamepad.buttons[index] = value;
    }

    /// Set an axis value on the given gamepad
    pub fn set_axis(&self, gamepad: u32, index: usize, value: f64) {
        let mut page = self.page();
        let Some(gamepad) = page.gamepad_mut(gamepad) else {
            return;
        };
        if gamepad.axes.len() <= index {
            gamepad.axes.resize(index + 1, 0.0);
        }
        gamepad.axes[index] = value;
    }

    pub fn set_gamepad_error(&self, failing: bool) {
        self.page().gamepad_error = failing;
    }

    pub fn set_modal(&self, modal: bool) {
        self.page().modal = modal;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.page().focused
    }

    pub fn element(&self, id: ElementId) -> Option<MemoryElement> {
        self.page().element(id).cloned()
    }

    pub fn url(&self) -> Option<String> {
        self.page().url.clone()
    }

    pub fn scroll(&self) -> (f64, f64) {
        self.page().scroll
    }

    /// Returns the mutation observers currently registered
    pub fn observers(&self) -> Vec<ObserverHandle> {
        self.page().observers.clone()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.page().effects.clone()
    }

    /// Remove and return all recorded effects
    pub fn take_effects(&self) -> Vec<Effect> {
        std::mem::take(&mut self.page().effects)
    }

    pub fn requests(&self) -> Vec<HostRequest> {
        self.page()
            .effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Request { request } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn vibrations(&self) -> usize {
        self.page()
            .effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Vibrate { .. }))
            .count()
    }
}

impl ModalArbiter for MemoryPlatform {
    fn active_surface(&self) -> Surface {
        if self.page().modal {
            Surface::Modal
        } else {
            Surface::Document
        }
    }
}

impl Platform for MemoryPlatform {
    fn gamepads(&self) -> Result<Vec<RawGamepad>, PlatformError> {
        let page = self.page();
        if page.gamepad_error {
            return Err(PlatformError::Unavailable("gamepad service".to_string()));
        }
        Ok(page.gamepads.clone())
    }

    fn focusable_elements(&self, surface: Surface) -> Vec<ElementInfo> {
        self.page()
            .elements
            .iter()
            .filter(|e| e.surface == surface)
            .map(MemoryElement::info)
            .collect()
    }

    fn active_element(&self) -> Option<ElementId> {
        self.page().focused
    }

    fn focus(&mut self, id: ElementId) -> Result<(), PlatformError> {
        let mut page = self.page();
        let Some(element) = page.element(id) else {
            return Err(PlatformError::Failed(format!("no element {id}")));
        };
        if element.rejects_focus || element.disabled || element.hidden {
            return Ok(());
        }
        if page.focused != Some(id) {
            page.focused = Some(id);
            page.effects.push(Effect::Focus { element: id });
        }
        Ok(())
    }

    fn element_kind(&self, id: ElementId) -> Option<ElementKind> {
        self.page().element(id).map(MemoryElement::kind)
    }

    fn click(&mut self, id: ElementId) -> Result<(), PlatformError> {
        let mut page = self.page();
        let Some(element) = page.element_mut(id) else {
            return Err(PlatformError::Failed(format!("no element {id}")));
        };
        let effect = if element.widget == Widget::Checkbox {
            element.checked = !element.checked;
            Effect::Toggle {
                element: id,
                checked: element.checked,
            }
        } else {
            Effect::Click { element: id }
        };
        page.effects.push(effect);
        Ok(())
    }

    fn set_select_size(&mut self, id: ElementId, size: u32) -> Result<(), PlatformError> {
        let mut page = self.page();
        let Some(element) = page.element_mut(id) else {
            return Err(PlatformError::Failed(format!("no element {id}")));
        };
        element.size = size;
        page.effects.push(Effect::SelectSize { element: id, size });
        Ok(())
    }

    fn open_onscreen_keyboard(&mut self, id: ElementId) -> Result<(), PlatformError> {
        self.page().effects.push(Effect::OnscreenKeyboard { element: id });
        Ok(())
    }

    fn dispatch_key(&mut self, id: ElementId, key: &str) -> Result<(), PlatformError> {
        self.page().effects.push(Effect::Key {
            element: id,
            key: key.to_string(),
        });
        Ok(())
    }

    fn scroll_position(&self) -> (f64, f64) {
        self.page().scroll
    }

    fn scroll_extent(&self) -> (f64, f64) {
        self.page().extent
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        let mut page = self.page();
        let (x, y) = page.scroll;
        let (max_x, max_y) = page.extent;
        let next = (
            (x + dx).clamp(0.0, max_x.max(0.0)),
            (y + dy).clamp(0.0, max_y.max(0.0)),
        );
        if next != page.scroll {
            page.scroll = next;
            page.effects.push(Effect::Scroll {
                x: next.0,
                y: next.1,
            });
        }
    }

    fn current_url(&self) -> Option<String> {
        self.page().url.clone()
    }

    fn has_history_entry(&self, direction: HistoryDirection) -> bool {
        let page = self.page();
        match direction {
            HistoryDirection::Back => !page.back.is_empty(),
            HistoryDirection::Forward => !page.forward.is_empty(),
        }
    }

    fn navigate_history(&mut self, direction: HistoryDirection) -> Result<(), PlatformError> {
        let mut page = self.page();
        let target = match direction {
            HistoryDirection::Back => page.back.pop(),
            HistoryDirection::Forward => {
                if page.forward.is_empty() {
                    None
                } else {
                    Some(page.forward.remove(0))
                }
            }
        };
        let Some(target) = target else {
            return Err(PlatformError::Failed(format!(
                "no history entry to go {direction:?}"
            )));
        };

        if let Some(current) = page.url.take() {
            match direction {
                HistoryDirection::Back => page.forward.insert(0, current),
                HistoryDirection::Forward => page.back.push(current),
            }
        }
        page.url = Some(target.clone());
        page.focused = None;
        page.scroll = (0.0, 0.0);
        page.effects.push(Effect::Navigate {
            direction,
            url: Some(target),
        });
        Ok(())
    }

    fn store_focus_index(&mut self, url: &str, index: usize) -> Result<(), PlatformError> {
        self.page().focus_indices.insert(url.to_string(), index);
        Ok(())
    }

    fn take_focus_index(&mut self, url: &str) -> Option<usize> {
        self.page().focus_indices.remove(url)
    }

    fn vibrate(&mut self, effect: VibrationEffect) -> Result<(), PlatformError> {
        let mut page = self.page();
        if !page.vibration_supported {
            return Err(PlatformError::Unsupported("vibration"));
        }
        page.effects.push(Effect::Vibrate { vibration: effect });
        Ok(())
    }

    fn send_request(&mut self, request: HostRequest) -> Result<(), PlatformError> {
        self.page().effects.push(Effect::Request { request });
        Ok(())
    }

    fn observe_mutations(&mut self) -> Result<ObserverHandle, PlatformError> {
        let mut page = self.page();
        page.next_observer += 1;
        let handle = ObserverHandle(page.next_observer);
        page.observers.push(handle);
        Ok(handle)
    }

    fn disconnect_observer(&mut self, handle: ObserverHandle) {
        self.page().observers.retain(|h| *h != handle);
    }
}
