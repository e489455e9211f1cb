use super::TimerSet;

#[test]
fn test_interval_rearms() {
    let mut timers = TimerSet::new();
    timers.set_interval("poll", 0, 50);

    assert_eq!(timers.next_deadline(), Some(50));
    assert_eq!(timers.pop_due(49), None, "should not fire early");
    assert_eq!(timers.pop_due(50), Some(("poll", 50)));
    assert_eq!(timers.next_deadline(), Some(100), "should re-arm one period later");
    assert!(timers.is_active(&"poll"));
}

#[test]
fn test_timeout_fires_once() {
    let mut timers = TimerSet::new();
    timers.set_timeout(1u32, 10, 5);

    assert_eq!(timers.pop_due(100), Some((1, 15)));
    assert_eq!(timers.pop_due(100), None);
    assert!(timers.is_empty());
}

#[test]
fn test_reschedule_replaces_existing_timer() {
    let mut timers = TimerSet::new();
    timers.set_interval("scroll", 0, 50);
    timers.set_interval("scroll", 20, 50);

    assert_eq!(timers.len(), 1, "should never hold two timers for one key");
    assert_eq!(timers.next_deadline(), Some(70));
}

#[test]
fn test_clear_only_affects_key() {
    let mut timers = TimerSet::new();
    timers.set_interval("left", 0, 50);
    timers.set_interval("right", 0, 50);

    assert!(timers.clear(&"left"));
    assert!(!timers.clear(&"left"), "second clear should be a no-op");
    assert!(timers.is_active(&"right"));
}

#[test]
fn test_due_order_follows_deadline_then_insertion() {
    let mut timers = TimerSet::new();
    timers.set_timeout("b", 0, 10);
    timers.set_timeout("a", 0, 10);
    timers.set_timeout("c", 0, 5);

    assert_eq!(timers.pop_due(10).map(|(k, _)| k), Some("c"));
    assert_eq!(timers.pop_due(10).map(|(k, _)| k), Some("b"));
    assert_eq!(timers.pop_due(10).map(|(k, _)| k), Some("a"));
}
