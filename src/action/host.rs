use crate::platform::HostRequest;

use super::{ActionContext, ActionName, Invocation, NavigationActions};

/// Send a privileged request for the given action to the host
pub fn send(ctx: &mut ActionContext<'_>, request: HostRequest) {
    let action = request.action;
    log::debug!("Requesting {action} from host");
    if let Err(e) = ctx.platform.send_request(request) {
        log::warn!("Host request {action} failed: {e}");
    }
}

/// Forward an action without payload to the host
pub fn forward_request(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        send(ctx, HostRequest::new(inv.action));
    }
}

fn open(ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if !inv.fires() {
        return;
    }
    let mut request = HostRequest::new(inv.action).with("background", inv.params.background);
    if let Some(url) = ctx.preferences.new_tab_or_window_url.as_ref() {
        request = request.with("url", url.as_str());
    }
    send(ctx, request);
}

pub fn open_new_tab(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    open(ctx, inv);
}

pub fn open_new_window(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    open(ctx, inv);
}

pub fn zoom_in(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        send(ctx, HostRequest::new(ActionName::ZoomIn));
    }
}

pub fn zoom_out(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        send(ctx, HostRequest::new(ActionName::ZoomOut));
    }
}

pub fn maximize_window(_: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    if inv.fires() {
        send(ctx, HostRequest::new(ActionName::MaximizeWindow));
    }
}

pub fn restore_window_size(
    _: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    if inv.fires() {
        send(ctx, HostRequest::new(ActionName::RestoreWindowSize));
    }
}

/// Pick one of two discrete actions from the sign of the inverted value
fn delegate(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
    negative: ActionName,
    positive: ActionName,
) {
    let value = inv.params.signed(inv.value);
    let action = if value < 0.0 { negative } else { positive };
    let Some(handler) = actions.handler(action) else {
        return;
    };
    let delegated = Invocation {
        action,
        value: value.abs(),
        ..inv.clone()
    };
    handler(actions, ctx, &delegated);
}

/// Thumbstick up zooms in, down zooms out
pub fn thumbstick_zoom(actions: &mut NavigationActions, ctx: &mut ActionContext<'_>, inv: &Invocation) {
    delegate(actions, ctx, inv, ActionName::ZoomIn, ActionName::ZoomOut);
}

/// Thumbstick up maximizes, down restores the window size
pub fn thumbstick_window_size(
    actions: &mut NavigationActions,
    ctx: &mut ActionContext<'_>,
    inv: &Invocation,
) {
    delegate(
        actions,
        ctx,
        inv,
        ActionName::MaximizeWindow,
        ActionName::RestoreWindowSize,
    );
}
