//! Board controller binary.
//!
//! # Usage
//!
//! ```bash
//! # Drive board b03 through the broker
//! rpsboard-device --id b03 --broker 192.168.201.99:1883 --referee 192.168.201.99:8080
//!
//! # No hardware: type L, R or P and watch the display on stdout
//! rpsboard-device --sim
//! ```

use clap::Parser;
use rpsboard_app::{Supervisor, shutdown_channel};
use rpsboard_client::{HttpReferee, mqtt::MqttDriver};
use rpsboard_device::{Args, DeviceError, KeyboardDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), DeviceError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let referee = HttpReferee::new(&args.referee_config())?;
    tracing::info!(
        board = %args.id,
        referee = %referee.origin(),
        sim = args.sim,
        handshake = args.handshake,
        "board controller starting"
    );

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested");
                trigger.trigger();
            },
            Err(e) => tracing::warn!(error = %e, "cannot listen for ctrl-c"),
        }
    });

    let termination = if args.sim {
        let mut supervisor = Supervisor::new(
            KeyboardDriver::stdio(),
            referee,
            args.board(),
            args.supervisor_config(),
        );
        supervisor.run(shutdown).await
    } else {
        tracing::info!(broker = %args.broker, "using MQTT board");
        let driver = MqttDriver::new(args.mqtt_config(), args.topics());
        let mut supervisor =
            Supervisor::new(driver, referee, args.board(), args.supervisor_config());
        supervisor.run(shutdown).await
    };

    tracing::info!(?termination, "board controller stopped");
    Ok(())
}
