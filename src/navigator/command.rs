use tokio::sync::mpsc;

use crate::{
    config::{Bindings, Preferences},
    platform::ObserverHandle,
};

use super::{NavigatorState, PageEvent};

/// Navigator commands define all the different ways to interact with a
/// running [super::service::NavigatorService] over a channel. Commands are
/// processed in order on the service task.
#[derive(Debug, Clone)]
pub enum NavigatorCommand {
    SetBindings(Bindings),
    SetPreferences(Preferences),
    GamepadConnected,
    GamepadDisconnected,
    Page(PageEvent),
    DomChanged(ObserverHandle),
    GetState(mpsc::Sender<NavigatorState>),
    Stop,
}
