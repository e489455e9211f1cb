use crate::{
    platform::{Platform, PlatformError},
    timer::{Millis, TimerSet},
};

use super::snapshot::GamepadSnapshot;

/// Key of the single sampling timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PollTimer;

/// Result of one sampling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The platform could not be read; the previous snapshot is kept
    Skipped,
    /// At least one connected gamepad was sampled
    Sampled,
    /// No gamepad is connected; the snapshot was reset
    Disconnected,
}

/// The [GamepadPoller] samples the platform's gamepads on a fixed interval
/// and merges every connected device into one [GamepadSnapshot].
#[derive(Debug)]
pub struct GamepadPoller {
    timer: TimerSet<PollTimer>,
    interval: Millis,
    snapshot: GamepadSnapshot,
    devices: usize,
}

impl GamepadPoller {
    pub fn new(interval: Millis) -> Self {
        Self {
            timer: TimerSet::new(),
            interval: interval.max(1),
            snapshot: GamepadSnapshot::disconnected(),
            devices: 0,
        }
    }

    /// Start sampling every `interval` milliseconds. Any running sampling
    /// timer is replaced.
    pub fn start(&mut self, now: Millis, interval: Millis) {
        self.interval = interval.max(1);
        log::debug!("Polling gamepads every {}ms", self.interval);
        self.timer.set_interval(PollTimer, now, self.interval);
    }

    /// Stop sampling
    pub fn stop(&mut self) {
        if self.timer.clear(&PollTimer) {
            log::debug!("Stopped polling gamepads");
        }
    }

    /// Returns true if the sampling timer is running
    pub fn is_running(&self) -> bool {
        self.timer.is_active(&PollTimer)
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// Change the sampling interval. A running timer is restarted with the
    /// new interval; a stopped poller stays stopped.
    pub fn set_interval(&mut self, now: Millis, interval: Millis) {
        let interval = interval.max(1);
        if interval == self.interval {
            return;
        }
        self.interval = interval;
        if self.is_running() {
            self.start(now, interval);
        }
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timer.next_deadline()
    }

    /// Consume the sampling timer if it is due. Returns true if a sample
    /// should be taken.
    pub fn pop_due(&mut self, now: Millis) -> bool {
        self.timer.pop_due(now).is_some()
    }

    /// Returns the most recently sampled snapshot
    pub fn snapshot(&self) -> &GamepadSnapshot {
        &self.snapshot
    }

    /// Returns the number of connected devices seen on the last scan
    pub fn devices(&self) -> usize {
        self.devices
    }

    /// Read and merge all gamepads from the platform
    pub fn sample(&mut self, platform: &dyn Platform) -> PollOutcome {
        let gamepads = match platform.gamepads() {
            Ok(gamepads) => gamepads,
            Err(e) => {
                log::debug!("Skipping poll tick: {e}");
                return PollOutcome::Skipped;
            }
        };
        self.devices = gamepads.iter().filter(|g| g.connected).count();
        self.snapshot = GamepadSnapshot::merge(&gamepads);
        log::trace!("Sampled {} gamepad(s): {:?}", self.devices, self.snapshot);

        if self.snapshot.connected {
            PollOutcome::Sampled
        } else {
            PollOutcome::Disconnected
        }
    }

    fn scan(&mut self, platform: &dyn Platform) -> Result<usize, PlatformError> {
        let gamepads = platform.gamepads()?;
        self.devices = gamepads.iter().filter(|g| g.connected).count();
        Ok(self.devices)
    }

    /// Handle a gamepad connection. Sampling (re)starts on every connection.
    pub fn on_gamepad_connected(&mut self, platform: &dyn Platform, now: Millis) {
        match self.scan(platform) {
            Ok(count) => log::info!("Gamepad connected; {count} device(s) present"),
            Err(e) => log::warn!("Unable to enumerate gamepads after connect: {e}"),
        }
        self.start(now, self.interval);
    }

    /// Handle a gamepad disconnection. Returns true if no device remains, in
    /// which case the snapshot is cleared and sampling halts.
    pub fn on_gamepad_disconnected(&mut self, platform: &dyn Platform) -> bool {
        let count = match self.scan(platform) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("Unable to enumerate gamepads after disconnect: {e}");
                return false;
            }
        };
        if count > 0 {
            log::info!("Gamepad disconnected; {count} device(s) remain");
            return false;
        }

        log::info!("Last gamepad disconnected");
        self.reset();
        true
    }

    /// Clear the snapshot and stop sampling
    pub fn reset(&mut self) {
        self.snapshot = GamepadSnapshot::disconnected();
        self.devices = 0;
        self.stop();
    }
}
