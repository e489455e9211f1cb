use crate::{constants::SELECT_MAX_VISIBLE_OPTIONS, platform::ElementKind};

use super::{ActionContext, Invocation, NavigationActions, Phase};

/// Activate the focused element. Fires on any non-zero press.
///
/// Select elements are expanded to show up to 15 options and collapsed back
/// to their declared size on the next click. Text inputs open the on-screen
/// keyboard rather than receiving a native click.
pub fn click(actions: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.phase != Phase::Press || inv.value <= 0.0 {
        return;
    }
    // Forget selects that left the DOM while expanded
    let platform = &*ctx.platform;
    actions
        .expanded_selects
        .retain(|id, _| matches!(platform.element_kind(*id), Some(ElementKind::Select { .. })));

    let Some(target) = ctx.platform.active_element() else {
        log::debug!("Nothing focused to click");
        return;
    };

    let result = match ctx.platform.element_kind(target) {
        Some(ElementKind::Select { options, size }) => {
            match actions.expanded_selects.remove(&target) {
                Some(original) => {
                    log::debug!("Collapsing select {target} to size {original}");
                    ctx.platform.set_select_size(target, original)
                }
                None => {
                    let expanded = options.min(SELECT_MAX_VISIBLE_OPTIONS).max(1);
                    log::debug!("Expanding select {target} to size {expanded}");
                    actions.expanded_selects.insert(target, size);
                    ctx.platform.set_select_size(target, expanded)
                }
            }
        }
        Some(ElementKind::TextInput) => {
            log::debug!("Opening on-screen keyboard for {target}");
            ctx.platform.open_onscreen_keyboard(target)
        }
        Some(ElementKind::Other) | None => ctx.platform.click(target),
    };

    if let Err(e) = result {
        log::warn!("Failed to click {target}: {e}");
    }
}
