use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{
    channel,
    error::{SendError, SendTimeoutError},
    Receiver, Sender,
};

use crate::{
    config::{Bindings, Preferences},
    platform::ObserverHandle,
};

use super::{command::NavigatorCommand, NavigatorState, PageEvent};

/// Maximum duration to wait for a response from a command. If this timeout
/// is reached, that typically indicates a deadlock somewhere in the code.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Possible errors for a navigator client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to send command to navigator: {0}")]
    SendError(SendError<NavigatorCommand>),
    #[error("service encountered an error processing the request: {0}")]
    ServiceError(Box<dyn std::error::Error>),
    #[error("navigator no longer exists")]
    ChannelClosed,
}

impl From<SendError<NavigatorCommand>> for ClientError {
    fn from(err: SendError<NavigatorCommand>) -> Self {
        Self::SendError(err)
    }
}

/// A client for a running navigator service
#[derive(Debug, Clone)]
pub struct NavigatorClient {
    tx: Sender<NavigatorCommand>,
}

impl From<Sender<NavigatorCommand>> for NavigatorClient {
    fn from(tx: Sender<NavigatorCommand>) -> Self {
        NavigatorClient::new(tx)
    }
}

impl NavigatorClient {
    pub fn new(tx: Sender<NavigatorCommand>) -> Self {
        Self { tx }
    }

    /// Send the given command to the navigator. This method uses a timeout
    /// to detect potential deadlocks.
    async fn send(&self, cmd: NavigatorCommand) -> Result<(), ClientError> {
        let result = self.tx.send_timeout(cmd, DEFAULT_TIMEOUT).await;
        let Err(err) = result else {
            return Ok(());
        };
        match err {
            SendTimeoutError::Timeout(ref cmd) => {
                log::error!("POSSIBLE DEADLOCK: timed out after {DEFAULT_TIMEOUT:?} sending command to navigator: {cmd:?}");
                Err(ClientError::ServiceError(err.into()))
            }
            SendTimeoutError::Closed(_) => Err(ClientError::ChannelClosed),
        }
    }

    /// Use the given receiver to wait for a response from the navigator.
    /// This method uses a timeout to detect potential deadlocks.
    async fn recv<T>(mut rx: Receiver<T>) -> Option<T> {
        match tokio::time::timeout(DEFAULT_TIMEOUT, rx.recv()).await {
            Ok(value) => value,
            Err(_) => {
                log::error!("POSSIBLE DEADLOCK: timed out after {DEFAULT_TIMEOUT:?} waiting for response from navigator");
                None
            }
        }
    }

    /// Replace the active bindings
    pub async fn set_bindings(&self, bindings: Bindings) -> Result<(), ClientError> {
        self.send(NavigatorCommand::SetBindings(bindings)).await
    }

    /// Replace the active preferences
    pub async fn set_preferences(&self, preferences: Preferences) -> Result<(), ClientError> {
        self.send(NavigatorCommand::SetPreferences(preferences))
            .await
    }

    pub async fn gamepad_connected(&self) -> Result<(), ClientError> {
        self.send(NavigatorCommand::GamepadConnected).await
    }

    pub async fn gamepad_disconnected(&self) -> Result<(), ClientError> {
        self.send(NavigatorCommand::GamepadDisconnected).await
    }

    pub async fn page_event(&self, event: PageEvent) -> Result<(), ClientError> {
        self.send(NavigatorCommand::Page(event)).await
    }

    /// Report DOM mutations seen by the given observer
    pub async fn dom_changed(&self, handle: ObserverHandle) -> Result<(), ClientError> {
        self.send(NavigatorCommand::DomChanged(handle)).await
    }

    /// Get the current state of the navigator
    pub async fn get_state(&self) -> Result<NavigatorState, ClientError> {
        let (tx, rx) = channel(1);
        self.send(NavigatorCommand::GetState(tx)).await?;
        if let Some(state) = Self::recv(rx).await {
            return Ok(state);
        }
        Err(ClientError::ChannelClosed)
    }

    /// Stop the navigator service
    pub async fn stop(&self) -> Result<(), ClientError> {
        self.send(NavigatorCommand::Stop).await
    }
}
