use crate::{
    action::{
        scroll::ScrollDirection, ActionContext, ActionName, ActionParams, Invocation,
        NavigationActions, Phase,
    },
    config::Preferences,
    focus::TabOrder,
    input::slot::{Direction, Slot, VirtualSlot},
    platform::memory::{MemoryPlatform, PageFixture},
};

fn page(extent: [f64; 2]) -> MemoryPlatform {
    MemoryPlatform::from_fixture(PageFixture {
        extent,
        ..Default::default()
    })
}

fn invocation(action: ActionName, slot: Slot, phase: Phase, value: f64) -> Invocation {
    Invocation {
        slot: VirtualSlot {
            slot,
            direction: Direction::of(value),
        },
        action,
        phase,
        value,
        previous_value: 0.0,
        params: ActionParams {
            scroll_factor: Some(1.0),
            ..Default::default()
        },
    }
}

#[test]
fn test_scroll_until_edge() {
    let mut platform = page([0.0, 400.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    let down = invocation(ActionName::ScrollDown, Slot::button(13), Phase::Press, 1.0);
    actions.perform(&mut ctx, &down);
    assert_eq!(observer.scroll(), (0.0, 50.0), "first nudge is immediate");
    assert!(actions.is_scrolling_toward(ScrollDirection::Down));

    // The motion keeps going on its own until the edge stops it
    let mut fired = 0;
    while let Some(deadline) = actions.next_deadline() {
        ctx.now = deadline;
        assert!(actions.fire_due(&mut ctx));
        fired += 1;
        assert!(fired < 100, "scrolling never stopped");
    }
    assert_eq!(observer.scroll(), (0.0, 400.0));
    assert_eq!(fired, 8, "seven nudges and one that finds the edge");
    assert!(!actions.is_scrolling());
    assert_eq!(observer.vibrations(), 1);
}

#[test]
fn test_release_stops_scroll() {
    let mut platform = page([0.0, 1000.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    let slot = Slot::button(13);
    actions.perform(&mut ctx, &invocation(ActionName::ScrollDown, slot, Phase::Press, 1.0));
    ctx.now = 50;
    actions.fire_due(&mut ctx);
    assert_eq!(observer.scroll(), (0.0, 100.0));

    actions.perform(&mut ctx, &invocation(ActionName::ScrollDown, slot, Phase::Release, 0.0));
    assert!(!actions.is_scrolling());
    assert_eq!(actions.next_deadline(), None);
    assert_eq!(observer.scroll(), (0.0, 100.0));
    assert_eq!(observer.vibrations(), 0);
}

#[test]
fn test_scroll_factor_is_clamped() {
    let mut platform = page([0.0, 1000.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    let mut fast = invocation(ActionName::ScrollDown, Slot::button(13), Phase::Press, 1.0);
    fast.params.scroll_factor = Some(50.0);
    actions.perform(&mut ctx, &fast);
    assert_eq!(observer.scroll(), (0.0, 125.0));
}

#[test]
fn test_axis_scroll_direction_and_invert() {
    let mut platform = page([300.0, 300.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    // Pushing up at the top of the page hits the edge right away
    let up = invocation(ActionName::ScrollVertically, Slot::axis(1), Phase::Press, -0.8);
    actions.perform(&mut ctx, &up);
    assert_eq!(observer.scroll(), (0.0, 0.0));
    assert!(!actions.is_scrolling());
    assert_eq!(observer.vibrations(), 1);

    let mut inverted = invocation(ActionName::ScrollVertically, Slot::axis(1), Phase::Press, -0.5);
    inverted.params.invert = true;
    actions.perform(&mut ctx, &inverted);
    assert_eq!(observer.scroll(), (0.0, 25.0));
    assert!(actions.is_scrolling_toward(ScrollDirection::Down));

    let right = invocation(ActionName::ScrollHorizontally, Slot::axis(0), Phase::Press, 0.5);
    actions.perform(&mut ctx, &right);
    assert_eq!(observer.scroll(), (25.0, 25.0));
    assert!(actions.is_scrolling_toward(ScrollDirection::Right));
}

#[test]
fn test_axis_crossing_switches_direction() {
    let mut platform = page([0.0, 1000.0]);
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };
    ctx.platform.scroll_by(0.0, 500.0);

    let slot = Slot::axis(1);
    actions.perform(&mut ctx, &invocation(ActionName::ScrollVertically, slot, Phase::Press, 0.6));
    assert!(actions.is_scrolling_toward(ScrollDirection::Down));

    actions.perform(&mut ctx, &invocation(ActionName::ScrollVertically, slot, Phase::Release, -0.6));
    actions.perform(&mut ctx, &invocation(ActionName::ScrollVertically, slot, Phase::Press, -0.6));
    assert!(actions.is_scrolling_toward(ScrollDirection::Up));
    assert!(!actions.is_scrolling_toward(ScrollDirection::Down));
}

#[test]
fn test_update_changes_speed_but_not_after_edge() {
    let mut platform = page([0.0, 120.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    let slot = Slot::axis(1);
    actions.perform(&mut ctx, &invocation(ActionName::ScrollVertically, slot, Phase::Press, 0.5));
    assert_eq!(observer.scroll(), (0.0, 25.0));
    actions.perform(&mut ctx, &invocation(ActionName::ScrollVertically, slot, Phase::Update, 1.0));
    ctx.now = 50;
    actions.fire_due(&mut ctx);
    assert_eq!(observer.scroll(), (0.0, 75.0));

    ctx.now = 100;
    actions.fire_due(&mut ctx);
    ctx.now = 150;
    actions.fire_due(&mut ctx);
    assert_eq!(observer.scroll(), (0.0, 120.0));
    assert!(!actions.is_scrolling());

    // Still deflected at the edge: updates do not start a new motion
    actions.perform(&mut ctx, &invocation(ActionName::ScrollVertically, slot, Phase::Update, 0.9));
    assert!(!actions.is_scrolling());
    assert_eq!(observer.vibrations(), 1);
}

#[test]
fn test_scroll_ignored_on_modal_surface() {
    let mut platform = page([0.0, 1000.0]);
    let observer = platform.clone();
    observer.set_modal(true);
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    actions.perform(
        &mut ctx,
        &invocation(ActionName::ScrollDown, Slot::button(13), Phase::Press, 1.0),
    );
    assert!(!actions.is_scrolling());
    assert_eq!(observer.scroll(), (0.0, 0.0));
}

#[test]
fn test_boundary_vibration_preference() {
    let mut platform = page([0.0, 0.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences {
        vibrate_on_boundary: false,
        ..Default::default()
    };
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    actions.perform(
        &mut ctx,
        &invocation(ActionName::ScrollUp, Slot::button(12), Phase::Press, 1.0),
    );
    assert_eq!(observer.vibrations(), 0);
    assert!(!actions.is_scrolling());
}

#[test]
fn test_motion_stops_when_page_leaves_view() {
    let mut platform = page([0.0, 1000.0]);
    let observer = platform.clone();
    let mut tab_order = TabOrder::new();
    let preferences = Preferences::default();
    let mut actions = NavigationActions::new();
    let mut ctx = ActionContext {
        platform: &mut platform,
        tab_order: &mut tab_order,
        preferences: &preferences,
        page_in_view: true,
        now: 0,
    };

    actions.perform(
        &mut ctx,
        &invocation(ActionName::ScrollDown, Slot::button(13), Phase::Press, 1.0),
    );
    ctx.page_in_view = false;
    ctx.now = 50;
    assert!(actions.fire_due(&mut ctx));
    assert!(!actions.is_scrolling());
    assert_eq!(observer.scroll(), (0.0, 50.0));
}
