//! Command-line configuration.

use std::time::Duration;

use clap::Parser;
use rpsboard_app::{SessionConfig, SupervisorConfig};
use rpsboard_client::{RefereeConfig, mqtt::MqttConfig};
use rpsboard_proto::{Board, DEFAULT_NAMESPACE, Topics};

/// Board controller for the rock-paper-scissors referee
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "rpsboard-device")]
#[command(about = "Connects a rock-paper-scissors board to the match referee")]
#[command(version)]
pub struct Args {
    /// Board identity used for registration and topic names
    #[arg(long, default_value = "b03")]
    pub id: String,

    /// Referee address (`host:port` or URL)
    #[arg(long, default_value = "192.168.201.99:8080")]
    pub referee: String,

    /// MQTT broker address (`host:port`)
    #[arg(long, default_value = "192.168.201.99:1883")]
    pub broker: String,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Read L/R/P commands from stdin instead of talking to a board
    #[arg(long)]
    pub sim: bool,

    /// Wait for the board to announce itself online before accepting input
    #[arg(long)]
    pub handshake: bool,

    /// Pause before restarting after a fault, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub restart_backoff_ms: u64,

    /// Bound on each referee request, in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Topic namespace in front of the board id
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}

impl Args {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Board identity.
    pub fn board(&self) -> Board {
        Board::new(self.id.clone())
    }

    /// Topic scheme for this board.
    pub fn topics(&self) -> Topics {
        Topics::new(&self.namespace, &self.id)
    }

    /// Referee client settings.
    pub fn referee_config(&self) -> RefereeConfig {
        RefereeConfig {
            address: self.referee.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Broker settings.
    pub fn mqtt_config(&self) -> MqttConfig {
        MqttConfig::for_board(self.broker.clone(), &self.id)
    }

    /// Supervisor settings.
    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            session: SessionConfig { handshake: self.handshake },
            restart_backoff: Duration::from_millis(self.restart_backoff_ms),
        }
    }
}
