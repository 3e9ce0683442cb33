//! Driver trait for abstracting device I/O.
//!
//! The [`Driver`] trait decouples the session runtime from the way the device
//! is reached. Each frontend implements the trait, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use rpsboard_proto::{Channel, DeviceInput};

/// Abstracts the device side of a session.
///
/// Every call that talks to the broker suspends until the broker has
/// acknowledged it or the transport reports failure. Any error is fatal to
/// the current session attempt.
///
/// # Implementations
///
/// - **MQTT**: `rpsboard_client::mqtt::MqttDriver` talks to a real broker
/// - **Keyboard**: the device binary reads `L`/`R`/`P` lines from stdin
/// - **Simulation**: `rpsboard_harness::SimDriver` scripts input and records
///   every call
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the transport connection.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Subscribe to an incoming channel.
    fn subscribe(&mut self, channel: Channel)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Unsubscribe from an incoming channel.
    fn unsubscribe(
        &mut self,
        channel: Channel,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Publish a payload on an outgoing channel.
    fn publish(
        &mut self,
        channel: Channel,
        payload: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Wait for the next decoded device input.
    ///
    /// Malformed messages are logged and skipped by the implementation, never
    /// returned. Returns `None` if the input stream ended.
    ///
    /// Must be cancel-safe: the runtime races it against shutdown.
    fn next_input(
        &mut self,
    ) -> impl Future<Output = Result<Option<DeviceInput>, Self::Error>> + Send;

    /// Close the transport connection.
    fn disconnect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
