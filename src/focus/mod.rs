
use std::collections::HashMap;

use crate::platform::{ElementId, ElementInfo, ObserverHandle, Platform, PlatformError, Surface};

/// Compute the strict tab order of the given candidates: elements with a
/// positive tabindex first in ascending order (document order on ties), then
/// elements with a zero tabindex in document order. Negative, disabled and
/// hidden elements are not tabbable.
pub fn strict_order(candidates: &[ElementInfo]) -> Vec<ElementId> {
    let tabbable = candidates
        .iter()
        .filter(|info| info.tab_index >= 0 && !info.disabled && !info.hidden);

    let mut positive: Vec<&ElementInfo> = tabbable
        .clone()
        .filter(|info| info.tab_index > 0)
        .collect();
    // Stable sort keeps document order for equal tabindex values
    positive.sort_by_key(|info| info.tab_index);

    positive
        .into_iter()
        .chain(tabbable.filter(|info| info.tab_index == 0))
        .map(|info| info.id)
        .collect()
}

/// Direction of tab navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

/// [TabOrder] maintains the ordered set of tabbable elements and the index
/// of the element navigation last moved to. The remembered index is kept
/// separately from the platform's active element because focus can escape
/// the set (e.g. to the document body).
#[derive(Debug, Default)]
pub struct TabOrder {
    elements: Vec<ElementId>,
    current: Option<usize>,
    surface: Surface,
    observer: Option<ObserverHandle>,
    parked: HashMap<Surface, Parked>,
}

/// Position remembered on a surface navigation has moved away from
#[derive(Debug, Clone, Copy)]
struct Parked {
    element: Option<ElementId>,
    index: Option<usize>,
}

impl TabOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to DOM mutations and compute the initial order
    pub fn attach(&mut self, platform: &mut dyn Platform) -> Result<(), PlatformError> {
        if let Some(handle) = self.observer.take() {
            platform.disconnect_observer(handle);
        }
        let handle = platform.observe_mutations()?;
        log::debug!("Observing DOM mutations with {handle:?}");
        self.observer = Some(handle);
        self.recompute(platform);
        Ok(())
    }

    /// Tear down the DOM mutation subscription
    pub fn detach(&mut self, platform: &mut dyn Platform) {
        if let Some(handle) = self.observer.take() {
            log::debug!("Disconnecting DOM observer {handle:?}");
            platform.disconnect_observer(handle);
        }
        self.parked.clear();
    }

    /// Returns the active mutation subscription
    pub fn observer(&self) -> Option<ObserverHandle> {
        self.observer
    }

    /// Called by the host when observed DOM nodes change. Mutations reported
    /// for a handle other than ours are ignored.
    pub fn on_dom_changed(&mut self, platform: &dyn Platform, handle: ObserverHandle) {
        if self.observer != Some(handle) {
            log::trace!("Ignoring mutation for unknown observer {handle:?}");
            return;
        }
        self.recompute(platform);
    }

    /// Re-derive the tabbable set for the active surface. The remembered
    /// element keeps its position if it is still present; otherwise the
    /// index is clamped to the new set. Each surface remembers its own
    /// position, so closing a modal returns to where the document was left.
    pub fn recompute(&mut self, platform: &dyn Platform) {
        let surface = platform.active_surface();
        let (previous, index) = if surface == self.surface {
            (self.current_element(), self.current)
        } else {
            let left = Parked {
                element: self.current_element(),
                index: self.current,
            };
            self.parked.insert(self.surface, left);
            self.parked
                .remove(&surface)
                .map_or((None, None), |parked| (parked.element, parked.index))
        };
        let elements = strict_order(&platform.focusable_elements(surface));

        self.current = match previous.and_then(|id| elements.iter().position(|e| *e == id)) {
            Some(index) => Some(index),
            None if elements.is_empty() => None,
            None => index.map(|index| index.min(elements.len() - 1)),
        };
        self.elements = elements;
        self.surface = surface;
        log::trace!(
            "Recomputed tab order on {surface:?}: {} elements, current {:?}",
            self.elements.len(),
            self.current
        );
    }

    /// Recompute if the active surface changed since the last computation
    pub fn sync_surface(&mut self, platform: &dyn Platform) {
        if platform.active_surface() != self.surface {
            self.recompute(platform);
        }
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Returns the remembered index
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Returns the element at the remembered index
    pub fn current_element(&self) -> Option<ElementId> {
        self.current.and_then(|index| self.elements.get(index).copied())
    }

    /// Returns the index of the given element in the set
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| *e == id)
    }

    /// Remember the given index. Out of range indices are ignored.
    pub fn set_current(&mut self, index: usize) {
        if index < self.elements.len() {
            self.current = Some(index);
        }
    }

    /// Returns the index one step from `from` in the given direction,
    /// wrapping around the ends. With no starting point, forward begins at
    /// the first element and backward at the last.
    pub fn step_from(&self, from: Option<usize>, direction: TabDirection) -> Option<usize> {
        let len = self.elements.len();
        if len == 0 {
            return None;
        }
        let next = match (from, direction) {
            (Some(index), TabDirection::Forward) => (index + 1) % len,
            (Some(index), TabDirection::Backward) => (index + len - 1) % len,
            (None, TabDirection::Forward) => 0,
            (None, TabDirection::Backward) => len - 1,
        };
        Some(next)
    }
}
