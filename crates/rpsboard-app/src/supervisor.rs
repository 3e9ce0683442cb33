//! Fault recovery supervisor.
//!
//! The [`Supervisor`] owns the driver and referee across attempts. Each
//! attempt gets a fresh [`Session`], so scores, symbols and the match endpoint
//! never survive a fault.
//!
//! # Invariants
//!
//! - A fault always runs teardown before anything else happens.
//! - Once shutdown is requested no new attempt is started.

use std::time::Duration;

use rpsboard_proto::Board;
use tracing::Instrument;

use crate::{Driver, Referee, Runtime, Session, SessionConfig, Shutdown, Termination};

/// Supervisor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Protocol options passed to every session.
    pub session: SessionConfig,
    /// Pause between a fault and the next attempt. Zero restarts immediately.
    pub restart_backoff: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self { session: SessionConfig::default(), restart_backoff: Duration::from_secs(1) }
    }
}

/// Restarts sessions until one terminates cleanly.
pub struct Supervisor<D, R>
where
    D: Driver,
    R: Referee,
{
    driver: D,
    referee: R,
    board: Board,
    config: SupervisorConfig,
}

impl<D, R> Supervisor<D, R>
where
    D: Driver,
    R: Referee,
{
    /// Create a supervisor for `board`.
    pub fn new(driver: D, referee: R, board: Board, config: SupervisorConfig) -> Self {
        Self { driver, referee, board, config }
    }

    /// Device transport.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Referee client.
    pub fn referee(&self) -> &R {
        &self.referee
    }

    /// Run attempts until shutdown or remote shutdown.
    ///
    /// Faults never escape: each is logged, torn down and followed by a new
    /// attempt after the configured backoff. Shutdown cuts the backoff short.
    pub async fn run(&mut self, mut shutdown: Shutdown) -> Termination {
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            let session = Session::new(self.board.clone(), self.config.session);
            let mut runtime = Runtime::new(&mut self.driver, &self.referee, session);

            let result = async {
                match runtime.run(&mut shutdown).await {
                    Ok(termination) => Ok(termination),
                    Err(fault) => {
                        tracing::warn!(%fault, "session attempt failed");
                        runtime.teardown().await;
                        Err(fault)
                    },
                }
            }
            .instrument(tracing::info_span!("attempt", attempt))
            .await;

            match result {
                Ok(termination) => {
                    tracing::info!(attempt, ?termination, "session ended");
                    return termination;
                },
                Err(_) if shutdown.is_requested() => {
                    tracing::info!(attempt, "shutdown requested, not restarting");
                    return Termination::Shutdown;
                },
                Err(_) => {},
            }

            if !self.config.restart_backoff.is_zero() {
                tracing::debug!(backoff = ?self.config.restart_backoff, "waiting before restart");
                tokio::select! {
                    biased;
                    () = shutdown.wait() => {
                        tracing::info!(attempt, "shutdown requested during backoff");
                        return Termination::Shutdown;
                    },
                    () = tokio::time::sleep(self.config.restart_backoff) => {},
                }
            }

            tracing::info!(next = attempt + 1, "restarting session");
        }
    }
}
