use std::collections::HashMap;

use crate::{
    constants::{
        SCROLL_FACTOR_MAX, SCROLL_FACTOR_MIN, SCROLL_FREQUENCY_MS, SCROLL_INPUT_MULTIPLIER,
    },
    input::slot::Slot,
    platform::Surface,
    timer::{Millis, TimerSet},
};

use super::{ActionContext, Invocation, NavigationActions, Phase};

/// Direction of document scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScrollDirection {
    Left,
    Right,
    Up,
    Down,
}

impl ScrollDirection {
    /// Returns the (dx, dy) unit vector for this direction
    fn unit(&self) -> (f64, f64) {
        match self {
            ScrollDirection::Left => (-1.0, 0.0),
            ScrollDirection::Right => (1.0, 0.0),
            ScrollDirection::Up => (0.0, -1.0),
            ScrollDirection::Down => (0.0, 1.0),
        }
    }
}

/// Axis a two-directional scroll action moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollAxis {
    Horizontal,
    Vertical,
}

impl ScrollAxis {
    fn direction(&self, value: f64) -> ScrollDirection {
        match (self, value < 0.0) {
            (ScrollAxis::Horizontal, true) => ScrollDirection::Left,
            (ScrollAxis::Horizontal, false) => ScrollDirection::Right,
            (ScrollAxis::Vertical, true) => ScrollDirection::Up,
            (ScrollAxis::Vertical, false) => ScrollDirection::Down,
        }
    }
}

/// State of one running scroll direction
#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    /// Physical slot driving the motion
    source: Slot,
    /// Input magnitude used for every nudge
    magnitude: f64,
    scroll_factor: f64,
}

/// Per-direction continuous scroll motion. Each direction owns its own
/// timer in a dedicated timer domain.
#[derive(Debug, Default)]
pub struct ScrollMotion {
    timers: TimerSet<ScrollDirection>,
    motions: HashMap<ScrollDirection, Motion>,
}

impl ScrollMotion {
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn pop_due(&mut self, now: Millis) -> Option<(ScrollDirection, Millis)> {
        self.timers.pop_due(now)
    }

    pub fn is_active(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn is_moving(&self, direction: ScrollDirection) -> bool {
        self.timers.is_active(&direction)
    }

    /// Start or continue scrolling in the given direction. A new source
    /// restarts the motion; the same source only updates the magnitude.
    fn run(&mut self, ctx: &mut ActionContext<'_>, direction: ScrollDirection, motion: Motion) {
        if let Some(current) = self.motions.get_mut(&direction) {
            if current.source == motion.source && self.timers.is_active(&direction) {
                *current = motion;
                return;
            }
        }

        log::debug!("Starting scroll {direction:?} from {}", motion.source);
        self.motions.insert(direction, motion);
        if self.nudge(ctx, direction) {
            self.timers
                .set_interval(direction, ctx.now, SCROLL_FREQUENCY_MS);
        }
    }

    /// Scroll one step in the given direction. Stops the motion and signals
    /// the boundary when the document edge has been reached. Returns true
    /// if the document moved.
    pub fn nudge(&mut self, ctx: &mut ActionContext<'_>, direction: ScrollDirection) -> bool {
        let Some(motion) = self.motions.get(&direction).copied() else {
            self.timers.clear(&direction);
            return false;
        };

        let before = ctx.platform.scroll_position();
        let (max_x, max_y) = ctx.platform.scroll_extent();
        let at_edge = match direction {
            ScrollDirection::Left => before.0 <= 0.0,
            ScrollDirection::Right => before.0 >= max_x,
            ScrollDirection::Up => before.1 <= 0.0,
            ScrollDirection::Down => before.1 >= max_y,
        };

        if !at_edge {
            let distance = motion.magnitude * SCROLL_INPUT_MULTIPLIER * motion.scroll_factor;
            let (ux, uy) = direction.unit();
            ctx.platform.scroll_by(ux * distance, uy * distance);
            if ctx.platform.scroll_position() != before {
                return true;
            }
        }

        log::debug!("Scroll {direction:?} reached the document edge");
        self.stop(direction);
        ctx.notify_boundary();
        false
    }

    /// Stop scrolling in the given direction
    pub fn stop(&mut self, direction: ScrollDirection) {
        if self.timers.clear(&direction) {
            log::debug!("Stopped scroll {direction:?}");
        }
        self.motions.remove(&direction);
    }

    /// Stop every direction driven by the given slot
    fn stop_source(&mut self, source: Slot) {
        let directions: Vec<ScrollDirection> = self
            .motions
            .iter()
            .filter(|(_, motion)| motion.source == source)
            .map(|(direction, _)| *direction)
            .collect();
        for direction in directions {
            self.stop(direction);
        }
    }

    pub fn stop_all(&mut self) {
        self.timers.clear_all();
        self.motions.clear();
    }
}

fn scroll_factor(invocation: &Invocation) -> f64 {
    invocation
        .params
        .scroll_factor
        .unwrap_or(1.0)
        .clamp(SCROLL_FACTOR_MIN, SCROLL_FACTOR_MAX)
}

/// Shared implementation for every scroll action. `value` is the signed
/// input value with invert already applied.
fn scroll(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    invocation: &Invocation,
    direction: ScrollDirection,
    magnitude: f64,
) {
    let source = invocation.slot.slot;
    if invocation.phase == Phase::Release || magnitude <= ctx.preferences.analog_cutoff {
        actions.scroll.stop_source(source);
        return;
    }
    // A motion that stopped at the edge stays stopped until the next press
    if invocation.phase == Phase::Update && !actions.scroll.is_moving(direction) {
        return;
    }
    if ctx.platform.active_surface() != Surface::Document {
        log::trace!("Modal surface active; not scrolling the document");
        return;
    }

    // Only one direction per axis can be driven by a slot
    let opposite = match direction {
        ScrollDirection::Left => ScrollDirection::Right,
        ScrollDirection::Right => ScrollDirection::Left,
        ScrollDirection::Up => ScrollDirection::Down,
        ScrollDirection::Down => ScrollDirection::Up,
    };
    if actions
        .scroll
        .motions
        .get(&opposite)
        .is_some_and(|motion| motion.source == source)
    {
        actions.scroll.stop(opposite);
    }

    let motion = Motion {
        source,
        magnitude,
        scroll_factor: scroll_factor(invocation),
    };
    actions.scroll.run(ctx, direction, motion);
}

fn scroll_fixed(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    invocation: &Invocation,
    direction: ScrollDirection,
) {
    scroll(actions, ctx, invocation, direction, invocation.value.abs());
}

fn scroll_axis(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    invocation: &Invocation,
    axis: ScrollAxis,
) {
    let value = invocation.params.signed(invocation.value);
    scroll(actions, ctx, invocation, axis.direction(value), value.abs());
}

pub fn scroll_left(actions: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    scroll_fixed(actions, ctx, inv, ScrollDirection::Left);
}

pub fn scroll_right(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    scroll_fixed(actions, ctx, inv, ScrollDirection::Right);
}

pub fn scroll_up(actions: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    scroll_fixed(actions, ctx, inv, ScrollDirection::Up);
}

pub fn scroll_down(actions: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    scroll_fixed(actions, ctx, inv, ScrollDirection::Down);
}

pub fn scroll_horizontally(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    scroll_axis(actions, ctx, inv, ScrollAxis::Horizontal);
}

pub fn scroll_vertically(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    scroll_axis(actions, ctx, inv, ScrollAxis::Vertical);
}

impl NavigationActions {
    /// Returns true if the document is scrolling in the given direction
    pub fn is_scrolling_toward(&self, direction: ScrollDirection) -> bool {
        self.scroll.is_moving(direction)
    }
}
