//! Simulation driver implementing the Driver trait.
//!
//! [`SimDriver`] provides the same interface as the MQTT and keyboard drivers
//! but for deterministic testing. It implements [`Driver`] so the same
//! [`rpsboard_app::Runtime`] and [`rpsboard_app::Supervisor`] code runs in
//! both production and simulation.
//!
//! Tests keep a [`SimDevice`] handle to script board input, inject transport
//! faults and inspect every call the runtime made.

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rpsboard_app::Driver;
use rpsboard_proto::{Channel, DeviceInput};
use tokio::sync::Notify;

use crate::{SimError, changes::Changes};

/// Driver operation, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverOp {
    /// [`Driver::connect`]
    Connect,
    /// [`Driver::subscribe`]
    Subscribe,
    /// [`Driver::unsubscribe`]
    Unsubscribe,
    /// [`Driver::publish`]
    Publish,
    /// [`Driver::next_input`]
    Receive,
    /// [`Driver::disconnect`]
    Disconnect,
}

impl fmt::Display for DriverOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A call the runtime made on the driver, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    /// Connection opened.
    Connect,
    /// Channel subscribed.
    Subscribe(Channel),
    /// Channel unsubscribed.
    Unsubscribe(Channel),
    /// Payload published.
    Publish {
        /// Outgoing channel
        channel: Channel,
        /// Payload text
        payload: String,
    },
    /// Connection closed.
    Disconnect,
}

#[derive(Debug, Default)]
struct DeviceState {
    connected: bool,
    subscriptions: Vec<Channel>,
    inputs: VecDeque<DeviceInput>,
    input_closed: bool,
    faults: Vec<DriverOp>,
    calls: Vec<DriverCall>,
}

impl DeviceState {
    /// Consume a scripted fault for `op`, if one is pending.
    fn take_fault(&mut self, op: DriverOp) -> Result<(), SimError> {
        match self.faults.iter().position(|fault| *fault == op) {
            Some(index) => {
                self.faults.remove(index);
                Err(SimError::Injected(op))
            },
            None => Ok(()),
        }
    }

    fn require_connected(&self) -> Result<(), SimError> {
        if self.connected { Ok(()) } else { Err(SimError::NotConnected) }
    }
}

/// Test-side handle to the simulated board.
///
/// Cheap to clone; every clone observes the same board.
#[derive(Debug, Clone, Default)]
pub struct SimDevice {
    state: Arc<Mutex<DeviceState>>,
    input_ready: Arc<Notify>,
    changes: Changes,
}

impl SimDevice {
    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a board message for the runtime.
    pub fn push_input(&self, input: DeviceInput) {
        self.lock().inputs.push_back(input);
        self.input_ready.notify_one();
    }

    /// Queue several board messages in order.
    pub fn push_inputs(&self, inputs: impl IntoIterator<Item = DeviceInput>) {
        self.lock().inputs.extend(inputs);
        self.input_ready.notify_one();
    }

    /// End the input stream. `next_input` returns `None` once the queue drains.
    pub fn close_input(&self) {
        self.lock().input_closed = true;
        self.input_ready.notify_one();
    }

    /// Make the next call of `op` fail.
    pub fn fail_next(&self, op: DriverOp) {
        self.lock().faults.push(op);
        if op == DriverOp::Receive {
            self.input_ready.notify_one();
        }
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.lock().calls.clone()
    }

    /// Payloads published on `channel`, oldest first.
    pub fn published(&self, channel: Channel) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                DriverCall::Publish { channel: c, payload } if *c == channel => {
                    Some(payload.clone())
                },
                _ => None,
            })
            .collect()
    }

    /// Most recent display message.
    pub fn last_display(&self) -> Option<String> {
        self.published(Channel::DisplayMessage).pop()
    }

    /// Currently subscribed channels.
    pub fn subscriptions(&self) -> Vec<Channel> {
        self.lock().subscriptions.clone()
    }

    /// Whether a connection is open.
    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Number of board messages not yet consumed.
    pub fn pending_inputs(&self) -> usize {
        self.lock().inputs.len()
    }

    /// Wait until `condition` holds for the recorded calls.
    pub async fn wait_until(
        &self,
        what: &str,
        mut condition: impl FnMut(&[DriverCall]) -> bool,
    ) -> Result<(), SimError> {
        self.changes.wait_until(what, || condition(&self.lock().calls)).await
    }

    /// Wait until the display shows `expected`.
    pub async fn wait_for_display(&self, expected: &str) -> Result<(), SimError> {
        let what = format!("display {expected:?}");
        self.wait_until(&what, |calls| {
            calls.iter().rev().find_map(|call| match call {
                DriverCall::Publish { channel: Channel::DisplayMessage, payload } => Some(payload),
                _ => None,
            }) == Some(&expected.to_string())
        })
        .await
    }

    fn record(&self, call: DriverCall, apply: impl FnOnce(&mut DeviceState)) {
        {
            let mut state = self.lock();
            apply(&mut state);
            state.calls.push(call);
        }
        self.changes.bump();
    }
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] against a [`SimDevice`]. Every call is recorded
/// before any injected fault fires, so tests see attempted operations too.
#[derive(Debug, Default)]
pub struct SimDriver {
    device: SimDevice,
}

impl SimDriver {
    /// Create a driver with an idle board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for scripting and inspecting the board.
    pub fn device(&self) -> SimDevice {
        self.device.clone()
    }
}

impl Driver for SimDriver {
    type Error = SimError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        let mut result = Ok(());
        self.device.record(DriverCall::Connect, |state| {
            result = state.take_fault(DriverOp::Connect);
            state.connected = result.is_ok();
        });
        result
    }

    async fn subscribe(&mut self, channel: Channel) -> Result<(), Self::Error> {
        let mut result = Ok(());
        self.device.record(DriverCall::Subscribe(channel), |state| {
            result = state.require_connected().and_then(|()| state.take_fault(DriverOp::Subscribe));
            if result.is_ok() && !state.subscriptions.contains(&channel) {
                state.subscriptions.push(channel);
            }
        });
        result
    }

    async fn unsubscribe(&mut self, channel: Channel) -> Result<(), Self::Error> {
        let mut result = Ok(());
        self.device.record(DriverCall::Unsubscribe(channel), |state| {
            result = state.take_fault(DriverOp::Unsubscribe);
            state.subscriptions.retain(|c| *c != channel);
        });
        result
    }

    async fn publish(&mut self, channel: Channel, payload: String) -> Result<(), Self::Error> {
        let mut result = Ok(());
        self.device.record(DriverCall::Publish { channel, payload }, |state| {
            result = state.require_connected().and_then(|()| state.take_fault(DriverOp::Publish));
        });
        result
    }

    async fn next_input(&mut self) -> Result<Option<DeviceInput>, Self::Error> {
        loop {
            {
                let mut state = self.device.lock();
                state.take_fault(DriverOp::Receive)?;
                if let Some(input) = state.inputs.pop_front() {
                    tracing::trace!(?input, "delivering simulated input");
                    return Ok(Some(input));
                }
                if state.input_closed {
                    return Ok(None);
                }
            }
            self.device.input_ready.notified().await;
        }
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        let mut result = Ok(());
        self.device.record(DriverCall::Disconnect, |state| {
            result = state.take_fault(DriverOp::Disconnect);
            state.connected = false;
            state.subscriptions.clear();
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use rpsboard_proto::ButtonEdge;

    use super::*;

    #[tokio::test]
    async fn queued_input_is_delivered_in_order() {
        let mut driver = SimDriver::new();
        let device = driver.device();
        device.push_inputs([DeviceInput::Selector(1), DeviceInput::Button(ButtonEdge::Clicked)]);

        assert_eq!(driver.next_input().await, Ok(Some(DeviceInput::Selector(1))));
        assert_eq!(driver.next_input().await, Ok(Some(DeviceInput::Button(ButtonEdge::Clicked))));

        device.close_input();
        assert_eq!(driver.next_input().await, Ok(None));
    }

    #[tokio::test]
    async fn injected_fault_fires_once_and_is_recorded() {
        let mut driver = SimDriver::new();
        let device = driver.device();
        device.fail_next(DriverOp::Connect);

        assert_eq!(driver.connect().await, Err(SimError::Injected(DriverOp::Connect)));
        assert!(!device.is_connected());
        assert_eq!(driver.connect().await, Ok(()));
        assert_eq!(device.calls(), vec![DriverCall::Connect, DriverCall::Connect]);
    }

    #[tokio::test]
    async fn publish_requires_connection() {
        let mut driver = SimDriver::new();
        assert_eq!(
            driver.publish(Channel::DisplayMode, "4".into()).await,
            Err(SimError::NotConnected)
        );
    }

    #[tokio::test]
    async fn disconnect_drops_subscriptions() {
        let mut driver = SimDriver::new();
        let device = driver.device();
        driver.connect().await.unwrap();
        driver.subscribe(Channel::Selector).await.unwrap();
        driver.subscribe(Channel::PlayButton).await.unwrap();
        assert_eq!(device.subscriptions(), vec![Channel::Selector, Channel::PlayButton]);

        driver.disconnect().await.unwrap();
        assert!(device.subscriptions().is_empty());
        assert!(!device.is_connected());
    }
}
