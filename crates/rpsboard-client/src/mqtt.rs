//! MQTT transport for the device side.
//!
//! Provides [`MqttDriver`], which reaches the board through an MQTT broker.
//! This is a thin layer that only moves messages. Protocol logic remains in
//! the Sans-IO [`rpsboard_app::Session`].
//!
//! A background task polls the `rumqttc` event loop and forwards packets over
//! a channel. Subscribe, unsubscribe and publish wait for the matching
//! acknowledgment. Board messages that arrive while waiting are buffered and
//! handed out by [`Driver::next_input`] in arrival order.

use std::{collections::VecDeque, time::Duration};

use rpsboard_app::Driver;
use rpsboard_proto::{Channel, DeviceInput, Topics};
use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS,
    SubscribeReasonCode,
};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

/// Request queue capacity of the `rumqttc` client.
const REQUEST_CAPACITY: usize = 16;

/// MQTT transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConfig {
    /// Broker address, `host:port`.
    pub broker: String,
    /// MQTT client identifier.
    pub client_id: String,
    /// Keep-alive interval.
    pub keep_alive: Duration,
    /// Bound on waiting for the broker's connect acknowledgment.
    pub connack_timeout: Duration,
    /// Bound on waiting for subscribe, unsubscribe and publish acknowledgments.
    pub ack_timeout: Duration,
}

impl MqttConfig {
    /// Defaults for a board: client id derived from the board id.
    pub fn for_board(broker: impl Into<String>, board_id: &str) -> Self {
        Self {
            broker: broker.into(),
            client_id: format!("rpsboard-{board_id}"),
            keep_alive: Duration::from_secs(2),
            connack_timeout: Duration::from_secs(5),
            ack_timeout: Duration::from_secs(5),
        }
    }
}

/// MQTT transport errors.
#[derive(Debug, Error)]
pub enum MqttError {
    /// Broker address is not `host:port`.
    #[error("invalid broker address: {0:?}")]
    InvalidBroker(String),

    /// Operation attempted without an open connection.
    #[error("not connected")]
    NotConnected,

    /// Broker refused the connection.
    #[error("broker refused connection: {0:?}")]
    Refused(ConnectReturnCode),

    /// Broker rejected a subscription.
    #[error("broker rejected subscription to {topic}")]
    SubscriptionRejected {
        /// Topic that was rejected
        topic: String,
    },

    /// Client request could not be queued.
    #[error("client request failed: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// Connection to the broker failed or dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Acknowledgment did not arrive in time.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

/// Packets forwarded from the event loop task.
#[derive(Debug)]
enum Incoming {
    ConnAck(ConnectReturnCode),
    SubAck(Vec<SubscribeReasonCode>),
    UnsubAck,
    PubAck,
    Message { topic: String, payload: Vec<u8> },
    DisconnectSent,
    Closed(String),
}

/// Acknowledgment a caller is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ack {
    ConnAck,
    SubAck,
    UnsubAck,
    PubAck,
    DisconnectSent,
}

impl Ack {
    fn name(self) -> &'static str {
        match self {
            Self::ConnAck => "connack",
            Self::SubAck => "suback",
            Self::UnsubAck => "unsuback",
            Self::PubAck => "puback",
            Self::DisconnectSent => "disconnect",
        }
    }
}

/// Open connection state.
struct Connection {
    client: AsyncClient,
    incoming: mpsc::UnboundedReceiver<Incoming>,
    task: JoinHandle<()>,
}

/// [`Driver`] over an MQTT broker.
pub struct MqttDriver {
    config: MqttConfig,
    topics: Topics,
    connection: Option<Connection>,
    buffered: VecDeque<(String, Vec<u8>)>,
}

impl MqttDriver {
    /// Create a disconnected driver.
    pub fn new(config: MqttConfig, topics: Topics) -> Self {
        Self { config, topics, connection: None, buffered: VecDeque::new() }
    }

    /// Topic scheme in use.
    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    fn options(&self) -> Result<MqttOptions, MqttError> {
        let (host, port) = self
            .config
            .broker
            .rsplit_once(':')
            .and_then(|(host, port)| Some((host, port.parse::<u16>().ok()?)))
            .filter(|(host, _)| !host.is_empty())
            .ok_or_else(|| MqttError::InvalidBroker(self.config.broker.clone()))?;

        let mut options = MqttOptions::new(self.config.client_id.clone(), host, port);
        options.set_keep_alive(self.config.keep_alive);
        options.set_clean_session(true);
        Ok(options)
    }

    /// Wait for `ack`, buffering board messages that arrive first.
    async fn wait_for(&mut self, ack: Ack, limit: Duration) -> Result<Incoming, MqttError> {
        let connection = self.connection.as_mut().ok_or(MqttError::NotConnected)?;
        let buffered = &mut self.buffered;

        let wait = async {
            loop {
                let Some(packet) = connection.incoming.recv().await else {
                    return Err(MqttError::Connection("event loop stopped".to_string()));
                };
                match (ack, packet) {
                    (_, Incoming::Message { topic, payload }) => {
                        buffered.push_back((topic, payload));
                    },
                    (_, Incoming::Closed(reason)) => return Err(MqttError::Connection(reason)),
                    (Ack::ConnAck, packet @ Incoming::ConnAck(_))
                    | (Ack::SubAck, packet @ Incoming::SubAck(_))
                    | (Ack::UnsubAck, packet @ Incoming::UnsubAck)
                    | (Ack::PubAck, packet @ Incoming::PubAck)
                    | (Ack::DisconnectSent, packet @ Incoming::DisconnectSent) => {
                        return Ok(packet);
                    },
                    (_, other) => tracing::debug!(?other, waiting = ack.name(), "skipping packet"),
                }
            }
        };

        tokio::time::timeout(limit, wait).await.map_err(|_| MqttError::Timeout(ack.name()))?
    }

    fn client(&self) -> Result<&AsyncClient, MqttError> {
        self.connection.as_ref().map(|c| &c.client).ok_or(MqttError::NotConnected)
    }

    fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.task.abort();
        }
        self.buffered.clear();
    }
}

impl Drop for MqttDriver {
    fn drop(&mut self) {
        self.close();
    }
}

/// Poll the event loop and forward what the driver cares about.
///
/// Stops at the first connection error instead of letting `rumqttc`
/// reconnect; recovery is a fresh session attempt.
async fn pump(mut eventloop: EventLoop, tx: mpsc::UnboundedSender<Incoming>) {
    loop {
        let forwarded = match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => Incoming::ConnAck(ack.code),
            Ok(Event::Incoming(Packet::SubAck(ack))) => Incoming::SubAck(ack.return_codes),
            Ok(Event::Incoming(Packet::UnsubAck(_))) => Incoming::UnsubAck,
            Ok(Event::Incoming(Packet::PubAck(_))) => Incoming::PubAck,
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                Incoming::Message { topic: publish.topic, payload: publish.payload.to_vec() }
            },
            Ok(Event::Outgoing(Outgoing::Disconnect)) => Incoming::DisconnectSent,
            Ok(_) => continue,
            Err(e) => {
                let _ = tx.send(Incoming::Closed(e.to_string()));
                return;
            },
        };
        if tx.send(forwarded).is_err() {
            return;
        }
    }
}

impl Driver for MqttDriver {
    type Error = MqttError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.close();
        let options = self.options()?;
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let (tx, incoming) = mpsc::unbounded_channel();
        let task = tokio::spawn(pump(eventloop, tx));
        self.connection = Some(Connection { client, incoming, task });

        match self.wait_for(Ack::ConnAck, self.config.connack_timeout).await? {
            Incoming::ConnAck(ConnectReturnCode::Success) => {
                tracing::info!(
                    broker = %self.config.broker,
                    client_id = %self.config.client_id,
                    "connected to broker"
                );
                Ok(())
            },
            Incoming::ConnAck(code) => {
                self.close();
                Err(MqttError::Refused(code))
            },
            other => Err(MqttError::Connection(format!("unexpected packet {other:?}"))),
        }
    }

    async fn subscribe(&mut self, channel: Channel) -> Result<(), Self::Error> {
        let topic = self.topics.topic(channel);
        self.client()?.subscribe(topic.clone(), QoS::AtLeastOnce).await?;

        match self.wait_for(Ack::SubAck, self.config.ack_timeout).await? {
            Incoming::SubAck(codes) if codes.iter().all(|c| *c != SubscribeReasonCode::Failure) => {
                tracing::debug!(%topic, "subscribed");
                Ok(())
            },
            _ => Err(MqttError::SubscriptionRejected { topic }),
        }
    }

    async fn unsubscribe(&mut self, channel: Channel) -> Result<(), Self::Error> {
        let topic = self.topics.topic(channel);
        self.client()?.unsubscribe(topic.clone()).await?;
        self.wait_for(Ack::UnsubAck, self.config.ack_timeout).await?;
        tracing::debug!(%topic, "unsubscribed");
        Ok(())
    }

    async fn publish(&mut self, channel: Channel, payload: String) -> Result<(), Self::Error> {
        let topic = self.topics.topic(channel);
        self.client()?.publish(topic, QoS::AtLeastOnce, false, payload.into_bytes()).await?;
        self.wait_for(Ack::PubAck, self.config.ack_timeout).await?;
        Ok(())
    }

    async fn next_input(&mut self) -> Result<Option<DeviceInput>, Self::Error> {
        loop {
            let (topic, payload) = if let Some(message) = self.buffered.pop_front() {
                message
            } else {
                let connection = self.connection.as_mut().ok_or(MqttError::NotConnected)?;
                match connection.incoming.recv().await {
                    Some(Incoming::Message { topic, payload }) => (topic, payload),
                    Some(Incoming::Closed(reason)) => return Err(MqttError::Connection(reason)),
                    Some(other) => {
                        tracing::debug!(?other, "skipping packet");
                        continue;
                    },
                    None => return Ok(None),
                }
            };

            match self.topics.decode(&topic, &payload) {
                Ok(input) => return Ok(Some(input)),
                Err(e) => tracing::warn!(%topic, error = %e, "discarding malformed device message"),
            }
        }
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        let result = match self.client() {
            Ok(client) => client.disconnect().await.map_err(MqttError::from),
            Err(e) => Err(e),
        };
        let result = match result {
            Ok(()) => self.wait_for(Ack::DisconnectSent, self.config.ack_timeout).await.map(|_| ()),
            Err(e) => Err(e),
        };
        self.close();
        tracing::info!("disconnected from broker");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(broker: &str) -> MqttDriver {
        MqttDriver::new(MqttConfig::for_board(broker, "b03"), Topics::for_board("b03"))
    }

    #[test]
    fn config_derives_client_id_and_keep_alive() {
        let config = MqttConfig::for_board("broker:1883", "b03");
        assert_eq!(config.client_id, "rpsboard-b03");
        assert_eq!(config.keep_alive, Duration::from_secs(2));
    }

    #[test]
    fn broker_address_must_be_host_and_port() {
        assert!(driver("192.168.201.99:1883").options().is_ok());
        assert!(matches!(driver("broker").options(), Err(MqttError::InvalidBroker(_))));
        assert!(matches!(driver(":1883").options(), Err(MqttError::InvalidBroker(_))));
        assert!(matches!(driver("broker:port").options(), Err(MqttError::InvalidBroker(_))));
    }

    #[tokio::test]
    async fn operations_before_connect_fail() {
        let mut driver = driver("broker:1883");
        assert!(matches!(
            driver.publish(Channel::DisplayMode, "4".into()).await,
            Err(MqttError::NotConnected)
        ));
        assert!(matches!(driver.next_input().await, Err(MqttError::NotConnected)));
    }
}
