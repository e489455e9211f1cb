use crate::{
    action::ActionName,
    config::{BindingRecord, Bindings, Preferences},
    input::slot::Slot,
    navigator::{Navigator, PageEvent},
    platform::{
        memory::{Effect, MemoryElement, MemoryPlatform, PageFixture, Widget},
        ElementId, Platform, Surface,
    },
};

const URL: &str = "https://example.com/";

fn page(count: u64) -> MemoryPlatform {
    MemoryPlatform::from_fixture(PageFixture {
        url: Some(URL.to_string()),
        elements: (1..=count)
            .map(|id| MemoryElement::new(id, Widget::Button))
            .collect(),
        extent: [0.0, 5000.0],
        ..Default::default()
    })
}

fn bind(slot: Slot, record: BindingRecord) -> Bindings {
    let mut bindings = Bindings::default();
    bindings.insert(slot, record);
    bindings
}

fn focus_count(platform: &MemoryPlatform) -> usize {
    platform
        .effects()
        .iter()
        .filter(|effect| matches!(effect, Effect::Focus { .. }))
        .count()
}

#[test]
fn test_start_restores_focus_and_polls() {
    let mut platform = page(3);
    platform
        .store_focus_index(URL, 1)
        .expect("store should succeed");
    platform.connect_gamepad(0);
    let observer = platform.clone();
    let mut navigator = Navigator::new(platform, Bindings::standard(), Preferences::default());

    navigator.start(0);
    let state = navigator.state();
    assert!(state.running);
    assert!(state.polling);
    assert_eq!(state.gamepads, 1);
    assert_eq!(state.tabbable, 3);
    assert_eq!(state.tab_index, Some(1));
    assert_eq!(observer.focused(), Some(ElementId(2)));
    assert_eq!(observer.observers().len(), 1);
    assert_eq!(navigator.next_deadline(), Some(50));

    navigator.stop();
    let state = navigator.state();
    assert!(!state.running);
    assert!(!state.polling);
    assert!(observer.observers().is_empty());
}

#[test]
fn test_start_without_gamepad_waits() {
    let observer = page(2);
    let mut navigator = Navigator::new(observer.clone(), Bindings::standard(), Preferences::default());

    navigator.start(0);
    assert!(!navigator.state().polling);
    assert_eq!(navigator.next_deadline(), None);

    observer.connect_gamepad(0);
    navigator.gamepad_connected(10);
    assert!(navigator.state().polling);
    assert_eq!(navigator.next_deadline(), Some(60));
}

#[test]
fn test_connect_before_start_is_ignored() {
    let observer = page(2);
    observer.connect_gamepad(0);
    let mut navigator = Navigator::new(observer.clone(), Bindings::standard(), Preferences::default());

    navigator.gamepad_connected(0);
    assert!(!navigator.state().polling);
}

#[test]
fn test_held_button_repeats() {
    let observer = page(3);
    observer.connect_gamepad(0);
    let bindings = bind(
        Slot::button(5),
        BindingRecord::new(ActionName::ForwardTab).with_repeat_rate(0.4),
    );
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);

    observer.set_button(0, 5, 1.0);
    navigator.advance(50);
    assert_eq!(observer.focused(), Some(ElementId(1)));
    assert_eq!(navigator.state().repeat_timers, 1);

    navigator.advance(1000);
    assert_eq!(observer.focused(), Some(ElementId(3)));
    assert_eq!(focus_count(&observer), 3);
    assert_eq!(navigator.now(), 1000);

    observer.set_button(0, 5, 0.0);
    navigator.advance(1050);
    assert_eq!(navigator.state().repeat_timers, 0);
    navigator.advance(3000);
    assert_eq!(focus_count(&observer), 3);
}

#[test]
fn test_disconnect_keeps_polling_while_devices_remain() {
    let observer = page(3);
    observer.connect_gamepad(0);
    observer.connect_gamepad(1);
    let bindings = bind(
        Slot::button(5),
        BindingRecord::new(ActionName::ForwardTab).with_repeat_rate(0.4),
    );
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);
    assert_eq!(navigator.state().gamepads, 2);

    observer.set_button(1, 5, 1.0);
    navigator.advance(50);
    assert_eq!(navigator.state().repeat_timers, 1);

    observer.disconnect_gamepad(0);
    navigator.gamepad_disconnected(60);
    let state = navigator.state();
    assert!(state.polling);
    assert_eq!(state.gamepads, 1);
    assert_eq!(state.repeat_timers, 1);

    observer.disconnect_gamepad(1);
    navigator.gamepad_disconnected(70);
    let state = navigator.state();
    assert!(!state.polling);
    assert_eq!(state.gamepads, 0);
    assert_eq!(state.repeat_timers, 0);
    assert_eq!(navigator.next_deadline(), None);
}

#[test]
fn test_disconnected_sample_tears_down() {
    let observer = page(3);
    observer.connect_gamepad(0);
    let bindings = bind(
        Slot::button(5),
        BindingRecord::new(ActionName::ForwardTab).with_repeat_rate(0.4),
    );
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);
    observer.set_button(0, 5, 1.0);
    navigator.advance(50);

    // The device vanishes without a disconnect notification
    observer.disconnect_gamepad(0);
    navigator.advance(100);
    let state = navigator.state();
    assert!(!state.polling);
    assert_eq!(state.repeat_timers, 0);
    assert!(state.running);
}

#[test]
fn test_gamepad_error_skips_tick() {
    let observer = page(3);
    observer.connect_gamepad(0);
    let bindings = bind(Slot::button(0), BindingRecord::new(ActionName::ForwardTab));
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);

    observer.set_gamepad_error(true);
    observer.set_button(0, 0, 1.0);
    navigator.advance(200);
    assert!(navigator.state().polling);
    assert_eq!(observer.focused(), None);

    observer.set_gamepad_error(false);
    navigator.advance(250);
    assert_eq!(observer.focused(), Some(ElementId(1)));
}

#[test]
fn test_blur_halts_scrolling() {
    let observer = page(0);
    observer.connect_gamepad(0);
    let bindings = bind(
        Slot::button(13),
        BindingRecord::new(ActionName::ScrollDown).with_scroll_factor(1.0),
    );
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);

    observer.set_button(0, 13, 1.0);
    navigator.advance(50);
    assert!(navigator.state().scrolling);
    navigator.advance(120);
    let position = observer.scroll();
    assert!(position.1 > 0.0);

    navigator.page_event(PageEvent::Blur);
    assert!(!navigator.state().scrolling);
    assert!(!navigator.state().page_in_view);
    navigator.advance(500);
    assert_eq!(observer.scroll(), position);

    // Coming back does not resume a motion that is still held
    navigator.page_event(PageEvent::Focus);
    navigator.advance(600);
    assert!(!navigator.state().scrolling);
    assert_eq!(observer.scroll(), position);
}

#[test]
fn test_set_bindings_refires_held_slots() {
    let observer = page(3);
    observer.connect_gamepad(0);
    let bindings = bind(
        Slot::button(0),
        BindingRecord::new(ActionName::ForwardTab).with_repeat_rate(0.0),
    );
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);

    observer.set_button(0, 0, 1.0);
    navigator.advance(50);
    assert_eq!(observer.focused(), Some(ElementId(1)));
    navigator.advance(500);
    assert_eq!(observer.focused(), Some(ElementId(1)));

    navigator.set_bindings(bind(Slot::button(0), BindingRecord::new(ActionName::ReverseTab)));
    navigator.advance(550);
    assert_eq!(observer.focused(), Some(ElementId(3)));
}

#[test]
fn test_set_preferences_restarts_poller() {
    let observer = page(1);
    observer.connect_gamepad(0);
    let mut navigator = Navigator::new(observer.clone(), Bindings::standard(), Preferences::default());
    navigator.start(0);
    assert_eq!(navigator.next_deadline(), Some(50));

    let preferences = Preferences {
        polling_frequency_ms: 16,
        ..Default::default()
    };
    navigator.set_preferences(preferences, 20);
    assert_eq!(navigator.next_deadline(), Some(36));
    assert_eq!(navigator.preferences().polling_frequency_ms, 16);

    // Same interval again leaves the timer alone
    navigator.advance(40);
    navigator.set_preferences(navigator.preferences().clone(), 40);
    assert_eq!(navigator.next_deadline(), Some(52));
}

#[test]
fn test_analog_cutoff_preference() {
    let observer = page(3);
    observer.connect_gamepad(0);
    let bindings = bind(Slot::axis(3), BindingRecord::new(ActionName::ThumbstickTabbing));
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);

    observer.set_axis(0, 3, 0.2);
    navigator.advance(50);
    assert_eq!(observer.focused(), None);

    observer.set_axis(0, 3, 0.0);
    navigator.advance(100);
    navigator.set_preferences(
        Preferences {
            analog_cutoff: 0.1,
            ..Default::default()
        },
        100,
    );
    observer.set_axis(0, 3, 0.2);
    navigator.advance(150);
    assert_eq!(observer.focused(), Some(ElementId(1)));
}

#[test]
fn test_dom_changes_update_tab_order() {
    let observer = page(2);
    let mut navigator = Navigator::new(observer.clone(), Bindings::standard(), Preferences::default());
    navigator.start(0);
    assert_eq!(navigator.state().tabbable, 2);

    observer
        .page()
        .elements
        .push(MemoryElement::new(3, Widget::Link));
    observer
        .page()
        .elements
        .push(MemoryElement::new(10, Widget::TextInput).on_modal());
    let handle = navigator
        .tab_order()
        .observer()
        .expect("navigator should observe the DOM");
    navigator.dom_changed(handle);
    assert_eq!(navigator.state().tabbable, 3);

    observer.set_modal(true);
    navigator.dom_changed(handle);
    let state = navigator.state();
    assert_eq!(state.surface, Surface::Modal);
    assert_eq!(state.tabbable, 1);
}

#[test]
fn test_actions_ignored_while_hidden() {
    let observer = page(3);
    observer.connect_gamepad(0);
    let bindings = bind(Slot::button(0), BindingRecord::new(ActionName::ForwardTab));
    let mut navigator = Navigator::new(observer.clone(), bindings, Preferences::default());
    navigator.start(0);

    navigator.page_event(PageEvent::Hide);
    observer.set_button(0, 0, 1.0);
    navigator.advance(50);
    assert_eq!(observer.focused(), None);

    navigator.page_event(PageEvent::Show);
    observer.set_button(0, 0, 0.0);
    navigator.advance(100);
    observer.set_button(0, 0, 1.0);
    navigator.advance(150);
    assert_eq!(observer.focused(), Some(ElementId(1)));
}
