use std::fmt::Display;

/// The kind of physical input channel on a gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKind {
    Axis,
    Button,
}

/// A [Slot] is a single axis or button input channel identified by its kind
/// and index on the combined gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub kind: SlotKind,
    pub index: u32,
}

impl Slot {
    pub fn axis(index: u32) -> Self {
        Self {
            kind: SlotKind::Axis,
            index,
        }
    }

    pub fn button(index: u32) -> Self {
        Self {
            kind: SlotKind::Button,
            index,
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SlotKind::Axis => write!(f, "axis{}", self.index),
            SlotKind::Button => write!(f, "button{}", self.index),
        }
    }
}

/// Which half of a physical slot is active. Buttons only ever report
/// [Direction::Positive]; axes are split into two virtual slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Returns the direction of the given signed value
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }
}

/// Key for per-direction timers on a physical slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualSlot {
    pub slot: Slot,
    pub direction: Direction,
}

impl Display for VirtualSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            Direction::Positive => write!(f, "{}+", self.slot),
            Direction::Negative => write!(f, "{}-", self.slot),
        }
    }
}
