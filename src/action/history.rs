use crate::platform::HistoryDirection;

use super::{ActionContext, Invocation, NavigationActions};

/// Navigate through the session history. The focused element's position in
/// the tab order is stored for the current page first, so focus can be put
/// back when the user returns. With no history entry in the requested
/// direction, a boundary notification is emitted instead.
pub fn navigate(ctx: &mut ActionContext<'_>, direction: HistoryDirection) {
    if !ctx.platform.has_history_entry(direction) {
        log::debug!("No history entry to go {direction:?}");
        ctx.notify_boundary();
        return;
    }

    if let Some(url) = ctx.platform.current_url() {
        let index = ctx
            .platform
            .active_element()
            .and_then(|id| ctx.tab_order.position(id));
        if let Some(index) = index {
            if let Err(e) = ctx.platform.store_focus_index(&url, index) {
                log::warn!("Unable to remember focus for {url}: {e}");
            }
        }
    }

    if let Err(e) = ctx.platform.navigate_history(direction) {
        log::warn!("Failed to navigate history {direction:?}: {e}");
    }
}

pub fn previous_page(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        navigate(ctx, HistoryDirection::Back);
    }
}

pub fn next_page(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        navigate(ctx, HistoryDirection::Forward);
    }
}

/// Two-directional history navigation on a thumbstick: left goes back,
/// right goes forward.
pub fn thumbstick_history(
    _: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    if !inv.fires() {
        return;
    }
    let direction = if inv.params.signed(inv.value) < 0.0 {
        HistoryDirection::Back
    } else {
        HistoryDirection::Forward
    };
    navigate(ctx, direction);
}
