use std::collections::{BTreeMap, BTreeSet};

use crate::{
    action::{DispatchKind, Invocation, Phase},
    config::Bindings,
    timer::{Millis, TimerSet},
};

use super::{
    binding::{resolve, ResolvedBinding},
    slot::{Direction, Slot, VirtualSlot},
    snapshot::GamepadSnapshot,
};

/// Bookkeeping for a slot whose repeating action is active
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatState {
    /// Time of the most recent fire
    pub last_fire: Millis,
    /// Value re-fired on every repeat; the axis is not re-sampled in between
    pub held_value: f64,
}

/// Dispatch state of one physical slot
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SlotState {
    /// At rest, or bound to nothing
    #[default]
    Idle,
    /// A non-repeating action fired and waits for release
    ArmedOnce {
        direction: Direction,
        binding: ResolvedBinding,
    },
    /// A repeating action fired and its timer is running
    Repeating {
        direction: Direction,
        binding: ResolvedBinding,
        repeat: RepeatState,
    },
}

impl SlotState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SlotState::Idle)
    }

    fn active(&self) -> Option<(Direction, &ResolvedBinding)> {
        match self {
            SlotState::Idle => None,
            SlotState::ArmedOnce { direction, binding } => Some((*direction, binding)),
            SlotState::Repeating {
                direction, binding, ..
            } => Some((*direction, binding)),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SlotRecord {
    /// Last value seen for the slot
    value: f64,
    /// Value passed with the last dispatched invocation
    dispatched: f64,
    state: SlotState,
}

/// The [RepeatDispatcher] decides for every slot whether a value change
/// fires its action once, starts repeating it, or is filtered out.
///
/// Only the transition from at rest to above the activation threshold fires
/// an action. Changes in magnitude while active never re-trigger; continuous
/// actions receive them as [Phase::Update]. Axes are split into a positive
/// and a negative virtual slot, and only one of them can be active at a time.
#[derive(Debug, Default)]
pub struct RepeatDispatcher {
    slots: BTreeMap<Slot, SlotRecord>,
    timers: TimerSet<VirtualSlot>,
}

impl RepeatDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every slot of the given snapshot. All invocations are
    /// collected before any of them is performed, so actions never observe a
    /// partially evaluated snapshot.
    pub fn process(
        &mut self,
        snapshot: &GamepadSnapshot,
        bindings: &Bindings,
        cutoff: f64,
        now: Millis,
    ) -> Vec<Invocation> {
        let slots: BTreeSet<Slot> = snapshot
            .slots()
            .chain(self.slots.keys().copied())
            .collect();

        let mut invocations = Vec::new();
        for slot in slots {
            let value = snapshot.value(&slot);
            self.update(slot, value, bindings, cutoff, now, &mut invocations);
        }
        invocations
    }

    /// Apply a new value for a single slot
    pub fn update(
        &mut self,
        slot: Slot,
        value: f64,
        bindings: &Bindings,
        cutoff: f64,
        now: Millis,
        out: &mut Vec<Invocation>,
    ) {
        let record = self.slots.entry(slot).or_default();
        let previous = record.value;
        if previous == value {
            return;
        }
        record.value = value;

        let Some((direction, binding)) = record.state.active() else {
            // Idle: only a rising edge fires
            let Some(binding) = resolve(&slot, bindings) else {
                return;
            };
            let threshold = binding.definition.threshold(cutoff);
            if value.abs() > threshold && previous.abs() <= threshold {
                self.press(slot, Direction::of(value), binding, value, now, out);
            }
            return;
        };

        let binding = binding.clone();
        let threshold = binding.definition.threshold(cutoff);
        let is_continuous = binding.definition.kind == DispatchKind::Continuous;
        if value.abs() <= threshold {
            self.release(slot, direction, value, out);
            return;
        }

        let new_direction = Direction::of(value);
        if new_direction != direction {
            // Crossing through zero: release the old half, press the new one
            self.release(slot, direction, value, out);
            self.press(slot, new_direction, binding, value, now, out);
            return;
        }

        if let SlotState::Repeating { repeat, .. } = &mut record.state {
            repeat.held_value = value;
        }
        if is_continuous {
            out.push(Invocation {
                slot: VirtualSlot { slot, direction },
                action: binding.action(),
                phase: Phase::Update,
                value,
                previous_value: record.dispatched,
                params: binding.params,
            });
            record.dispatched = value;
        }
    }

    fn press(
        &mut self,
        slot: Slot,
        direction: Direction,
        binding: ResolvedBinding,
        value: f64,
        now: Millis,
        out: &mut Vec<Invocation>,
    ) {
        let record = self.slots.entry(slot).or_default();
        let virtual_slot = VirtualSlot { slot, direction };
        out.push(Invocation {
            slot: virtual_slot,
            action: binding.action(),
            phase: Phase::Press,
            value,
            previous_value: record.dispatched,
            params: binding.params.clone(),
        });
        record.dispatched = value;

        let rate = binding.params.repeat_rate;
        if rate > 0.0 {
            let period = (rate * 1000.0).round() as Millis;
            log::debug!("{virtual_slot}: {} repeating every {period}ms", binding.action());
            self.timers.set_interval(virtual_slot, now, period);
            record.state = SlotState::Repeating {
                direction,
                binding,
                repeat: RepeatState {
                    last_fire: now,
                    held_value: value,
                },
            };
        } else {
            log::debug!("{virtual_slot}: {} armed", binding.action());
            record.state = SlotState::ArmedOnce { direction, binding };
        }
    }

    fn release(&mut self, slot: Slot, direction: Direction, value: f64, out: &mut Vec<Invocation>) {
        let virtual_slot = VirtualSlot { slot, direction };
        self.timers.clear(&virtual_slot);

        let Some(record) = self.slots.get_mut(&slot) else {
            return;
        };
        let state = std::mem::take(&mut record.state);
        let Some((_, binding)) = state.active() else {
            return;
        };
        log::debug!("{virtual_slot}: {} released", binding.action());
        out.push(Invocation {
            slot: virtual_slot,
            action: binding.action(),
            phase: Phase::Release,
            value,
            previous_value: record.dispatched,
            params: binding.params.clone(),
        });
        record.dispatched = value;
    }

    /// Returns the earliest repeat deadline
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Fire the next due repeat timer. Returns the repeat invocation, or
    /// `None` if nothing was due or the timer no longer matched its slot.
    pub fn fire_due(&mut self, now: Millis) -> Option<Invocation> {
        let (virtual_slot, deadline) = self.timers.pop_due(now)?;
        let record = self.slots.get_mut(&virtual_slot.slot);
        let Some(SlotRecord {
            dispatched,
            state:
                SlotState::Repeating {
                    direction,
                    binding,
                    repeat,
                },
            ..
        }) = record
        else {
            self.timers.clear(&virtual_slot);
            return None;
        };
        if *direction != virtual_slot.direction {
            self.timers.clear(&virtual_slot);
            return None;
        }

        repeat.last_fire = deadline;
        let invocation = Invocation {
            slot: virtual_slot,
            action: binding.action(),
            phase: Phase::Repeat,
            value: repeat.held_value,
            previous_value: *dispatched,
            params: binding.params.clone(),
        };
        *dispatched = repeat.held_value;
        Some(invocation)
    }

    /// Force every slot back to idle and clear all repeat timers. Slots that
    /// are still held fire again as a fresh press on the next evaluation.
    pub fn reset(&mut self) {
        if !self.slots.is_empty() {
            log::debug!("Resetting all input slots");
        }
        self.slots.clear();
        self.timers.clear_all();
    }

    /// Returns the dispatch state of the given slot
    pub fn state(&self, slot: &Slot) -> SlotState {
        self.slots
            .get(slot)
            .map(|record| record.state.clone())
            .unwrap_or_default()
    }

    /// Returns the number of running repeat timers
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }
}
