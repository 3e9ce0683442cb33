//! Generic runtime for one session attempt.
//!
//! The Runtime drives a single attempt, coordinating between:
//! - [`Session`]: protocol state machine
//! - [`Driver`]: device transport
//! - [`Referee`]: match calls
//!
//! Inputs are consumed one at a time. Referee calls are awaited inline, so no
//! device input is processed while a call is outstanding.

use std::collections::VecDeque;

use rpsboard_proto::Channel;

use crate::{
    Driver, Referee, RefereeCall, Session, SessionAction, SessionEvent, SessionFault, Shutdown,
    Termination, TransportOp,
};

/// Orchestrates one [`Session`] against a driver and a referee.
///
/// # Type Parameters
///
/// - `D`: device transport
/// - `R`: referee client
pub struct Runtime<'a, D, R>
where
    D: Driver,
    R: Referee,
{
    driver: &'a mut D,
    referee: &'a R,
    session: Session,
}

impl<'a, D, R> Runtime<'a, D, R>
where
    D: Driver,
    R: Referee,
{
    /// Create a runtime for a fresh session.
    pub fn new(driver: &'a mut D, referee: &'a R, session: Session) -> Self {
        Self { driver, referee, session }
    }

    /// Session driven by this runtime.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the attempt until it terminates or faults.
    ///
    /// Shutdown is checked before start-up and between inputs. A referee call
    /// or transport operation already in progress is not interrupted.
    ///
    /// # Errors
    ///
    /// Returns the first [`SessionFault`]. The caller is expected to run
    /// [`Runtime::teardown`] afterwards.
    pub async fn run(&mut self, shutdown: &mut Shutdown) -> Result<Termination, SessionFault> {
        let first = if shutdown.is_requested() {
            SessionEvent::ShutdownRequested
        } else {
            SessionEvent::Start
        };
        if let Some(termination) = self.dispatch(first).await? {
            return Ok(termination);
        }

        loop {
            let event = tokio::select! {
                biased;
                () = shutdown.wait() => SessionEvent::ShutdownRequested,
                input = self.driver.next_input() => {
                    match input.map_err(|e| SessionFault::transport(TransportOp::Receive, &e))? {
                        Some(input) => SessionEvent::Device(input),
                        None => return Err(SessionFault::SourceClosed),
                    }
                },
            };

            if let Some(termination) = self.dispatch(event).await? {
                return Ok(termination);
            }
        }
    }

    /// Best-effort cleanup after a fault.
    ///
    /// Unsubscribes every channel the session subscribed and disconnects.
    /// Failures are logged and do not stop the remaining steps.
    pub async fn teardown(&mut self) {
        let channels = self.session.subscriptions().to_vec();
        for channel in channels {
            self.unsubscribe(channel).await;
        }
        self.disconnect().await;
        self.session.terminate();
    }

    /// Feed an event to the session and execute the resulting actions.
    ///
    /// Referee results are fed back in as events and their actions run after
    /// the ones already queued. Returns the termination if one was reached.
    async fn dispatch(&mut self, event: SessionEvent) -> Result<Option<Termination>, SessionFault> {
        let mut pending: VecDeque<SessionAction> = self.session.handle(event).into();

        while let Some(action) = pending.pop_front() {
            match action {
                SessionAction::Connect => {
                    self.driver
                        .connect()
                        .await
                        .map_err(|e| SessionFault::transport(TransportOp::Connect, &e))?;
                    tracing::info!("connected to device transport");
                },
                SessionAction::Subscribe(channel) => {
                    self.driver
                        .subscribe(channel)
                        .await
                        .map_err(|e| SessionFault::transport(TransportOp::Subscribe, &e))?;
                },
                SessionAction::Unsubscribe(channel) => self.unsubscribe(channel).await,
                SessionAction::Publish { channel, payload } => {
                    self.publish(channel, payload).await?;
                },
                SessionAction::Render(buffer) => {
                    tracing::debug!(display = %buffer, "rendering");
                    self.publish(Channel::DisplayMessage, buffer.message()).await?;
                },
                SessionAction::Register(board) => {
                    let match_endpoint = self
                        .referee
                        .register(&board)
                        .await
                        .map_err(|e| SessionFault::referee(RefereeCall::Register, &e))?;
                    pending
                        .extend(self.session.handle(SessionEvent::Registered { match_endpoint }));
                },
                SessionAction::Play { endpoint, symbol } => {
                    let response = self
                        .referee
                        .play(&endpoint, symbol)
                        .await
                        .map_err(|e| SessionFault::referee(RefereeCall::Play, &e))?;
                    pending.extend(self.session.handle(SessionEvent::PlayCompleted(response)));
                },
                SessionAction::Disconnect => self.disconnect().await,
                SessionAction::Terminate(termination) => {
                    self.session.terminate();
                    return Ok(Some(termination));
                },
            }
        }

        Ok(None)
    }

    async fn publish(&mut self, channel: Channel, payload: String) -> Result<(), SessionFault> {
        self.driver
            .publish(channel, payload)
            .await
            .map_err(|e| SessionFault::transport(TransportOp::Publish, &e))
    }

    async fn unsubscribe(&mut self, channel: Channel) {
        if let Err(e) = self.driver.unsubscribe(channel).await {
            tracing::warn!(?channel, error = %e, "unsubscribe failed");
        }
    }

    async fn disconnect(&mut self) {
        if let Err(e) = self.driver.disconnect().await {
            tracing::warn!(error = %e, "disconnect failed");
        }
    }
}
