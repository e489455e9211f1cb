pub mod client;
pub mod command;
pub mod service;

#[cfg(test)]
pub mod navigator_test;

use serde::{Deserialize, Serialize};

use crate::{
    action::{tab, ActionContext, Invocation, NavigationActions},
    config::{Bindings, Preferences},
    focus::TabOrder,
    input::{
        dispatcher::RepeatDispatcher,
        poller::{GamepadPoller, PollOutcome},
    },
    platform::{ObserverHandle, Platform, Surface},
    timer::Millis,
};

/// Page lifecycle notifications from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageEvent {
    /// The window gained focus
    Focus,
    /// The window lost focus
    Blur,
    /// The page became visible
    Show,
    /// The page was hidden
    Hide,
}

/// Read-only status of a [Navigator]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorState {
    pub running: bool,
    pub page_in_view: bool,
    pub polling: bool,
    pub gamepads: usize,
    pub repeat_timers: usize,
    pub scrolling: bool,
    pub tabbable: usize,
    pub tab_index: Option<usize>,
    pub surface: Surface,
    pub now: Millis,
}

/// Timer domains ordered by priority for equal deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    Poll,
    Repeat,
    Motion,
}

/// The [Navigator] owns every piece of navigation state: the gamepad poller,
/// the repeat dispatcher, the action state and the tab order. It never
/// sleeps or spawns; the caller drives it with [Navigator::advance] on a
/// millisecond clock and schedules wakeups from [Navigator::next_deadline].
#[derive(Debug)]
pub struct Navigator<P: Platform> {
    platform: P,
    bindings: Bindings,
    preferences: Preferences,
    poller: GamepadPoller,
    dispatcher: RepeatDispatcher,
    actions: NavigationActions,
    tab_order: TabOrder,
    page_in_view: bool,
    running: bool,
    now: Millis,
}

impl<P: Platform> Navigator<P> {
    pub fn new(platform: P, bindings: Bindings, preferences: Preferences) -> Self {
        let poller = GamepadPoller::new(preferences.polling_frequency_ms);
        Self {
            platform,
            bindings,
            preferences,
            poller,
            dispatcher: RepeatDispatcher::new(),
            actions: NavigationActions::new(),
            tab_order: TabOrder::new(),
            page_in_view: true,
            running: false,
            now: 0,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn tab_order(&self) -> &TabOrder {
        &self.tab_order
    }

    pub fn dispatcher(&self) -> &RepeatDispatcher {
        &self.dispatcher
    }

    /// Returns the current time on the navigator clock
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Start navigating: subscribe to DOM mutations, restore any focus
    /// stored for the current page and begin polling if a gamepad is
    /// already connected.
    pub fn start(&mut self, now: Millis) {
        self.tick_to(now);
        if self.running {
            log::debug!("Navigator already running");
            return;
        }
        log::info!("Starting navigator");
        self.running = true;

        if let Err(e) = self.tab_order.attach(&mut self.platform) {
            log::warn!("Unable to observe DOM mutations: {e}");
            self.tab_order.recompute(&self.platform);
        }
        let mut ctx = ActionContext {
            platform: &mut self.platform,
            tab_order: &mut self.tab_order,
            preferences: &self.preferences,
            page_in_view: self.page_in_view,
            now: self.now,
        };
        tab::restore_focus(&mut ctx);

        match self.platform.gamepads() {
            Ok(gamepads) if gamepads.iter().any(|g| g.connected) => {
                self.poller.on_gamepad_connected(&self.platform, self.now);
            }
            Ok(_) => log::info!("Waiting for a gamepad to connect"),
            Err(e) => log::warn!("Unable to enumerate gamepads: {e}"),
        }
    }

    /// Stop navigating and tear down all timers and subscriptions
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        log::info!("Stopping navigator");
        self.running = false;
        self.teardown();
        self.tab_order.detach(&mut self.platform);
    }

    fn teardown(&mut self) {
        self.poller.reset();
        self.dispatcher.reset();
        self.actions.halt();
    }

    /// Replace the bindings. Every slot is forced back to idle; slots that
    /// are still held fire against the new bindings on the next poll.
    pub fn set_bindings(&mut self, bindings: Bindings) {
        log::debug!("Replacing bindings");
        self.bindings = bindings;
        self.dispatcher.reset();
        self.actions.halt();
    }

    /// Replace the preferences. A polling frequency change restarts the
    /// sampling timer.
    pub fn set_preferences(&mut self, preferences: Preferences, now: Millis) {
        self.tick_to(now);
        log::debug!("Replacing preferences: {preferences:?}");
        self.poller
            .set_interval(self.now, preferences.polling_frequency_ms);
        self.preferences = preferences;
    }

    pub fn gamepad_connected(&mut self, now: Millis) {
        self.tick_to(now);
        if !self.running {
            return;
        }
        self.poller.on_gamepad_connected(&self.platform, self.now);
    }

    pub fn gamepad_disconnected(&mut self, now: Millis) {
        self.tick_to(now);
        if self.poller.on_gamepad_disconnected(&self.platform) {
            self.teardown();
        }
    }

    /// Track whether the page is in view. Leaving the page halts any motion.
    pub fn page_event(&mut self, event: PageEvent) {
        let in_view = matches!(event, PageEvent::Focus | PageEvent::Show);
        if in_view == self.page_in_view {
            return;
        }
        log::debug!("Page {event:?}; in view: {in_view}");
        self.page_in_view = in_view;
        if !in_view {
            self.actions.halt();
        }
    }

    /// Called by the host when observed DOM nodes change
    pub fn dom_changed(&mut self, handle: ObserverHandle) {
        self.tab_order.on_dom_changed(&self.platform, handle);
    }

    /// Returns the earliest deadline across all timer domains
    pub fn next_deadline(&self) -> Option<Millis> {
        self.next_due().map(|(deadline, _)| deadline)
    }

    fn next_due(&self) -> Option<(Millis, Domain)> {
        [
            (self.poller.next_deadline(), Domain::Poll),
            (self.dispatcher.next_deadline(), Domain::Repeat),
            (self.actions.next_deadline(), Domain::Motion),
        ]
        .into_iter()
        .filter_map(|(deadline, domain)| deadline.map(|d| (d, domain)))
        .min_by_key(|(deadline, _)| *deadline)
    }

    /// Move the clock forward to `now`, firing every timer that comes due on
    /// the way in deadline order.
    pub fn advance(&mut self, now: Millis) {
        while let Some((deadline, domain)) = self.next_due() {
            if deadline > now {
                break;
            }
            self.tick_to(deadline);
            match domain {
                Domain::Poll => {
                    if self.poller.pop_due(self.now) {
                        self.poll_tick();
                    }
                }
                Domain::Repeat => {
                    if let Some(invocation) = self.dispatcher.fire_due(self.now) {
                        self.perform(&invocation);
                    }
                }
                Domain::Motion => {
                    let mut ctx = ActionContext {
                        platform: &mut self.platform,
                        tab_order: &mut self.tab_order,
                        preferences: &self.preferences,
                        page_in_view: self.page_in_view,
                        now: self.now,
                    };
                    self.actions.fire_due(&mut ctx);
                }
            }
        }
        self.tick_to(now);
    }

    fn tick_to(&mut self, now: Millis) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Sample the gamepads and dispatch the resulting invocations. The whole
    /// snapshot is evaluated before any action runs.
    fn poll_tick(&mut self) {
        match self.poller.sample(&self.platform) {
            PollOutcome::Skipped => (),
            PollOutcome::Disconnected => {
                log::info!("No gamepad connected; stopping input processing");
                self.teardown();
            }
            PollOutcome::Sampled => {
                let invocations = self.dispatcher.process(
                    self.poller.snapshot(),
                    &self.bindings,
                    self.preferences.analog_cutoff,
                    self.now,
                );
                for invocation in invocations {
                    self.perform(&invocation);
                }
            }
        }
    }

    fn perform(&mut self, invocation: &Invocation) {
        let mut ctx = ActionContext {
            platform: &mut self.platform,
            tab_order: &mut self.tab_order,
            preferences: &self.preferences,
            page_in_view: self.page_in_view,
            now: self.now,
        };
        self.actions.perform(&mut ctx, invocation);
    }

    /// Returns a summary of the navigator's current state
    pub fn state(&self) -> NavigatorState {
        NavigatorState {
            running: self.running,
            page_in_view: self.page_in_view,
            polling: self.poller.is_running(),
            gamepads: self.poller.devices(),
            repeat_timers: self.dispatcher.active_timers(),
            scrolling: self.actions.is_scrolling(),
            tabbable: self.tab_order.len(),
            tab_index: self.tab_order.current_index(),
            surface: self.tab_order.surface(),
            now: self.now,
        }
    }
}
