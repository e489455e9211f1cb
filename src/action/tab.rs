use crate::{focus::TabDirection, platform::ElementId};

use super::{ActionContext, Invocation, NavigationActions};

/// Move focus one step through the tab order.
///
/// The starting point is the active element when it belongs to the tab
/// order, otherwise the remembered index. If the platform does not move
/// focus to the chosen element (e.g. a focus trap refuses it), one more step
/// is taken in the same direction before giving up for this invocation.
pub fn step_focus(ctx: &mut ActionContext<'_>, direction: TabDirection) -> Option<ElementId> {
    ctx.tab_order.sync_surface(&*ctx.platform);
    if ctx.tab_order.is_empty() {
        log::debug!("No tabbable elements to move focus to");
        return None;
    }

    let start = ctx
        .platform
        .active_element()
        .and_then(|id| ctx.tab_order.position(id))
        .or(ctx.tab_order.current_index());

    let mut index = start;
    for attempt in 0..2 {
        let next = ctx.tab_order.step_from(index, direction)?;
        let Some(target) = ctx.tab_order.elements().get(next).copied() else {
            return None;
        };
        ctx.tab_order.set_current(next);
        index = Some(next);

        if let Err(e) = ctx.platform.focus(target) {
            log::warn!("Failed to focus {target}: {e}");
        }
        if ctx.platform.active_element() == Some(target) {
            log::debug!("Focused {target} at tab index {next}");
            return Some(target);
        }
        if attempt == 0 {
            log::debug!("Focus did not move to {target}; trying the next element");
        }
    }

    log::debug!("Focus did not move after retry; giving up");
    None
}

/// Focus the element stored for the current page, if the host remembered one
pub fn restore_focus(ctx: &mut ActionContext<'_>) -> Option<ElementId> {
    let url = ctx.platform.current_url()?;
    let index = ctx.platform.take_focus_index(&url)?;
    let target = ctx.tab_order.elements().get(index).copied()?;
    if let Err(e) = ctx.platform.focus(target) {
        log::warn!("Failed to restore focus to {target}: {e}");
        return None;
    }
    ctx.tab_order.set_current(index);
    log::debug!("Restored focus to {target} at tab index {index} for {url}");
    Some(target)
}

pub fn forward_tab(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        step_focus(ctx, TabDirection::Forward);
    }
}

pub fn reverse_tab(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        step_focus(ctx, TabDirection::Backward);
    }
}

/// Two-directional tabbing on a thumbstick
pub fn thumbstick_tabbing(
    _: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    if !inv.fires() {
        return;
    }
    let value = inv.params.signed(inv.value);
    let direction = if value < 0.0 {
        TabDirection::Backward
    } else {
        TabDirection::Forward
    };
    step_focus(ctx, direction);
}
