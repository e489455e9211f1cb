use crate::{
    action::{ActionContext, ActionName, ActionParams, Invocation, NavigationActions, Phase},
    config::Preferences,
    focus::TabOrder,
    input::slot::{Direction, Slot, VirtualSlot},
    platform::{
        memory::{Effect, MemoryElement, MemoryPlatform, PageFixture, Widget},
        ElementId,
    },
};

fn page(elements: Vec<MemoryElement>, focused: Option<u64>) -> MemoryPlatform {
    MemoryPlatform::from_fixture(PageFixture {
        elements,
        focused: focused.map(ElementId),
        ..Default::default()
    })
}

fn click(phase: Phase, value: f64) -> Invocation {
    Invocation {
        slot: VirtualSlot {
            slot: Slot::button(0),
            direction: Direction::Positive,
        },
        action: ActionName::Click,
        phase,
        value,
        previous_value: 0.0,
        params: ActionParams::default(),
    }
}

#[test]
fn test_click_toggles_checkbox() {
    let mut platform = page(vec![MemoryElement::new(1, Widget::Checkbox)], Some(1));
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

    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert!(observer.element(ElementId(1)).is_some_and(|e| e.checked));

    // Releasing does not click again
    actions.perform(&mut ctx, &click(Phase::Release, 0.0));
    assert!(observer.element(ElementId(1)).is_some_and(|e| e.checked));

    // Any press counts, even a light one
    actions.perform(&mut ctx, &click(Phase::Press, 0.1));
    assert!(observer.element(ElementId(1)).is_some_and(|e| !e.checked));
}

#[test]
fn test_click_toggles_select_size() {
    let mut platform = page(
        vec![
            MemoryElement::new(1, Widget::Select).with_options(30, 1),
            MemoryElement::new(2, Widget::Select).with_options(4, 0),
        ],
        Some(1),
    );
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

    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(observer.element(ElementId(1)).map(|e| e.size), Some(15));
    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(observer.element(ElementId(1)).map(|e| e.size), Some(1));

    observer.page().focused = Some(ElementId(2));
    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(observer.element(ElementId(2)).map(|e| e.size), Some(4));
    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(observer.element(ElementId(2)).map(|e| e.size), Some(0));
}

#[test]
fn test_click_text_input_opens_keyboard() {
    let mut platform = page(vec![MemoryElement::new(1, Widget::TextInput)], Some(1));
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

    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(
        observer.effects(),
        vec![Effect::OnscreenKeyboard {
            element: ElementId(1)
        }]
    );
}

#[test]
fn test_click_link_and_nothing_focused() {
    let mut platform = page(vec![MemoryElement::new(1, Widget::Link)], None);
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

    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert!(observer.effects().is_empty());

    observer.page().focused = Some(ElementId(1));
    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(
        observer.effects(),
        vec![Effect::Click {
            element: ElementId(1)
        }]
    );
}

#[test]
fn test_removed_select_is_forgotten() {
    let mut platform = page(
        vec![
            MemoryElement::new(1, Widget::Select).with_options(30, 1),
            MemoryElement::new(2, Widget::Checkbox),
        ],
        Some(1),
    );
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

    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert_eq!(actions.expanded_selects.len(), 1);

    // The expanded select is removed from the page
    {
        let mut page = observer.page();
        page.elements.retain(|e| e.id != ElementId(1));
        page.focused = Some(ElementId(2));
    }
    actions.perform(&mut ctx, &click(Phase::Press, 1.0));
    assert!(actions.expanded_selects.is_empty());
    assert!(observer.element(ElementId(2)).is_some_and(|e| e.checked));
}
