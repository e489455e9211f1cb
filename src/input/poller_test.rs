use crate::{
    input::{
        poller::{GamepadPoller, PollOutcome},
        slot::Slot,
    },
    platform::memory::MemoryPlatform,
};

#[test]
fn test_start_and_stop() {
    let mut poller = GamepadPoller::new(50);
    assert!(!poller.is_running());

    poller.start(100, 20);
    assert_eq!(poller.next_deadline(), Some(120));
    assert!(!poller.pop_due(119));
    assert!(poller.pop_due(120));
    assert_eq!(poller.next_deadline(), Some(140));

    // Restarting never leaves two timers behind
    poller.start(130, 50);
    assert_eq!(poller.next_deadline(), Some(180));

    poller.stop();
    assert!(!poller.is_running());
    assert_eq!(poller.next_deadline(), None);
}

#[test]
fn test_interval_change_restarts_timer() {
    let mut poller = GamepadPoller::new(50);
    poller.set_interval(0, 25);
    assert!(!poller.is_running(), "a stopped poller stays stopped");
    assert_eq!(poller.interval(), 25);

    poller.start(0, 25);
    poller.set_interval(10, 100);
    assert_eq!(poller.next_deadline(), Some(110));
}

#[test]
fn test_sample_merges_gamepads() {
    let platform = MemoryPlatform::default();
    platform.connect_gamepad(0);
    platform.connect_gamepad(1);
    platform.set_button(0, 0, 1.0);
    platform.set_button(1, 0, 1.0);
    platform.set_axis(1, 1, -0.5);

    let mut poller = GamepadPoller::new(50);
    assert_eq!(poller.sample(&platform), PollOutcome::Sampled);
    assert_eq!(poller.devices(), 2);
    assert_eq!(poller.snapshot().value(&Slot::button(0)), 2.0);
    assert_eq!(poller.snapshot().value(&Slot::axis(1)), -0.5);
}

#[test]
fn test_sample_error_keeps_snapshot() {
    let platform = MemoryPlatform::default();
    platform.connect_gamepad(0);
    platform.set_button(0, 3, 1.0);

    let mut poller = GamepadPoller::new(50);
    poller.sample(&platform);
    platform.set_gamepad_error(true);
    platform.set_button(0, 3, 0.0);

    assert_eq!(poller.sample(&platform), PollOutcome::Skipped);
    assert_eq!(poller.snapshot().value(&Slot::button(3)), 1.0);
}

#[test]
fn test_disconnect_keeps_polling_while_devices_remain() {
    let platform = MemoryPlatform::default();
    platform.connect_gamepad(0);
    platform.connect_gamepad(1);
    platform.set_button(0, 0, 1.0);

    let mut poller = GamepadPoller::new(50);
    poller.on_gamepad_connected(&platform, 0);
    assert!(poller.is_running());
    poller.sample(&platform);

    platform.disconnect_gamepad(1);
    assert!(!poller.on_gamepad_disconnected(&platform));
    assert!(poller.is_running());
    assert_eq!(poller.snapshot().value(&Slot::button(0)), 1.0);

    platform.disconnect_gamepad(0);
    assert!(poller.on_gamepad_disconnected(&platform));
    assert!(!poller.is_running());
    assert!(!poller.snapshot().connected);
    assert_eq!(poller.snapshot().value(&Slot::button(0)), 0.0);
    assert_eq!(poller.sample(&platform), PollOutcome::Disconnected);
}
