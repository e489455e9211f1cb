use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{sleep_until, Instant},
};

use crate::{platform::Platform, timer::Millis};

use super::{client::NavigatorClient, command::NavigatorCommand, Navigator};

/// Size of the command channel buffer
const BUFFER_SIZE: usize = 2048;

/// The [NavigatorService] runs a [Navigator] on a tokio task. Real time is
/// mapped onto the navigator's millisecond clock, starting at zero when the
/// service is created.
#[derive(Debug)]
pub struct NavigatorService<P: Platform> {
    navigator: Navigator<P>,
    tx: mpsc::Sender<NavigatorCommand>,
    rx: mpsc::Receiver<NavigatorCommand>,
    epoch: Instant,
}

impl<P: Platform> NavigatorService<P> {
    pub fn new(navigator: Navigator<P>) -> Self {
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        Self {
            navigator,
            tx,
            rx,
            epoch: Instant::now(),
        }
    }

    /// Return a client for sending commands to the service
    pub fn client(&self) -> NavigatorClient {
        self.tx.clone().into()
    }

    /// Run the navigator until a stop command is received or every client
    /// is dropped. Returns the stopped navigator.
    pub async fn run(self) -> Navigator<P> {
        let Self {
            mut navigator,
            tx,
            mut rx,
            epoch,
        } = self;
        // Only clients hold senders from here on
        drop(tx);

        log::debug!("Starting navigator service");
        navigator.start(elapsed(epoch));
        loop {
            let wakeup = navigator
                .next_deadline()
                .map(|at| epoch + Duration::from_millis(at));
            let sleep = async move {
                match wakeup {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                cmd = rx.recv() => {
                    let Some(cmd) = cmd else {
                        log::debug!("All navigator clients dropped");
                        break;
                    };
                    let now = elapsed(epoch);
                    navigator.advance(now);
                    if !Self::handle(&mut navigator, cmd, now).await {
                        break;
                    }
                }
                _ = sleep => {
                    navigator.advance(elapsed(epoch));
                }
            }
        }

        navigator.stop();
        log::debug!("Navigator service stopped");
        navigator
    }

    /// Process a single command. Returns false if the service should stop.
    async fn handle(navigator: &mut Navigator<P>, cmd: NavigatorCommand, now: Millis) -> bool {
        log::trace!("Received command: {cmd:?}");
        match cmd {
            NavigatorCommand::SetBindings(bindings) => navigator.set_bindings(bindings),
            NavigatorCommand::SetPreferences(preferences) => {
                navigator.set_preferences(preferences, now)
            }
            NavigatorCommand::GamepadConnected => navigator.gamepad_connected(now),
            NavigatorCommand::GamepadDisconnected => navigator.gamepad_disconnected(now),
            NavigatorCommand::Page(event) => navigator.page_event(event),
            NavigatorCommand::DomChanged(handle) => navigator.dom_changed(handle),
            NavigatorCommand::GetState(sender) => {
                if let Err(e) = sender.send(navigator.state()).await {
                    log::error!("Failed to send navigator state: {e:?}");
                }
            }
            NavigatorCommand::Stop => return false,
        }
        true
    }
}

/// Milliseconds elapsed since the given epoch
fn elapsed(epoch: Instant) -> Millis {
    epoch.elapsed().as_millis() as Millis
}
