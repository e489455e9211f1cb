use std::collections::BTreeMap;

use super::slot::{Slot, SlotKind};

/// Raw state of one physical gamepad as reported by the platform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGamepad {
    pub index: u32,
    pub id: String,
    pub connected: bool,
    pub axes: Vec<f64>,
    pub buttons: Vec<f64>,
}

/// Combined state of every connected gamepad captured during one poll tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadSnapshot {
    pub connected: bool,
    pub axes: BTreeMap<u32, f64>,
    pub buttons: BTreeMap<u32, f64>,
}

impl GamepadSnapshot {
    /// Returns an empty, disconnected snapshot
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Merge all connected gamepads into one snapshot. Values for the same
    /// index are summed across devices; multiple controllers contribute
    /// additively rather than by precedence.
    pub fn merge<'a, I>(gamepads: I) -> Self
    where
        I: IntoIterator<Item = &'a RawGamepad>,
    {
        let mut snapshot = Self::default();
        for gamepad in gamepads.into_iter().filter(|g| g.connected) {
            snapshot.connected = true;
            for (index, value) in gamepad.axes.iter().enumerate() {
                *snapshot.axes.entry(index as u32).or_insert(0.0) += value;
            }
            for (index, value) in gamepad.buttons.iter().enumerate() {
                *snapshot.buttons.entry(index as u32).or_insert(0.0) += value;
            }
        }
        snapshot
    }

    /// Returns the value of the given slot, treating missing slots as at rest
    pub fn value(&self, slot: &Slot) -> f64 {
        let values = match slot.kind {
            SlotKind::Axis => &self.axes,
            SlotKind::Button => &self.buttons,
        };
        values.get(&slot.index).copied().unwrap_or(0.0)
    }

    /// Returns every slot present in the snapshot, axes first
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.axes
            .keys()
            .map(|index| Slot::axis(*index))
            .chain(self.buttons.keys().map(|index| Slot::button(*index)))
    }
}
