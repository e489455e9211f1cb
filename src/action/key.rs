use super::{ActionContext, Invocation, NavigationActions};

/// Send the binding's key to the focused element
pub fn send_key(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if !inv.fires() {
        return;
    }
    let Some(key) = inv.params.key.as_deref() else {
        log::debug!("sendKey bound on {} without a key", inv.slot);
        return;
    };
    let Some(target) = ctx.platform.active_element() else {
        return;
    };
    if let Err(e) = ctx.platform.dispatch_key(target, key) {
        log::warn!("Failed to send {key} to {target}: {e}");
    }
}
