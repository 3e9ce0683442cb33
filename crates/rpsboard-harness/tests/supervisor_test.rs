//! Supervisor scenarios against the simulated board and scripted referee.

use std::time::Duration;

use rpsboard_app::{
    SessionConfig, Supervisor, SupervisorConfig, Termination, shutdown_channel,
};
use rpsboard_harness::{DriverCall, DriverOp, SimDevice, SimDriver, SimReferee};
use rpsboard_proto::{Board, BoardStatus, ButtonEdge, Channel, DeviceInput, Symbol};
use tokio::task::JoinHandle;

const ENDPOINT: &str = "http://ref/match/7";

fn display(own: &str, opponent: &str, own_score: u32, opponent_score: u32) -> String {
    format!(
        "Own:      {own}\nOpponent: {opponent}\nOwn:      {own_score}\nOpponent: {opponent_score}"
    )
}

fn immediate_restart() -> SupervisorConfig {
    SupervisorConfig { restart_backoff: Duration::ZERO, ..SupervisorConfig::default() }
}

fn spawn(
    referee: &SimReferee,
    config: SupervisorConfig,
) -> (SimDevice, rpsboard_app::ShutdownTrigger, JoinHandle<Termination>) {
    let driver = SimDriver::new();
    let device = driver.device();
    let (trigger, shutdown) = shutdown_channel();
    let mut supervisor = Supervisor::new(driver, referee.clone(), Board::new("b03"), config);
    let task = tokio::spawn(async move { supervisor.run(shutdown).await });
    (device, trigger, task)
}

#[tokio::test]
async fn failed_play_tears_down_and_resets_scores() {
    let referee = SimReferee::new(ENDPOINT);
    referee.respond(1, 0, "Rock");
    referee.fail_play("referee restarted");
    let (device, trigger, task) = spawn(&referee, immediate_restart());

    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();
    device.push_input(DeviceInput::Button(ButtonEdge::Clicked));
    device.wait_for_display(&display("Rock", "Rock", 1, 0)).await.unwrap();

    device.push_input(DeviceInput::Button(ButtonEdge::Clicked));
    referee.wait_for_registrations(2).await.unwrap();
    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();

    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);

    assert_eq!(referee.registrations(), vec![Board::new("b03"), Board::new("b03")]);
    assert_eq!(referee.plays(), vec![
        (ENDPOINT.to_string(), Symbol::Rock),
        (ENDPOINT.to_string(), Symbol::Rock),
    ]);

    // Teardown after the fault, then a fresh start.
    let calls = device.calls();
    let restart = calls.iter().rposition(|c| *c == DriverCall::Connect).unwrap();
    assert_eq!(&calls[restart - 3..restart], &[
        DriverCall::Unsubscribe(Channel::Selector),
        DriverCall::Unsubscribe(Channel::PlayButton),
        DriverCall::Disconnect,
    ]);
}

#[tokio::test]
async fn transport_fault_during_startup_restarts() {
    let referee = SimReferee::new(ENDPOINT);
    let driver = SimDriver::new();
    let device = driver.device();
    device.fail_next(DriverOp::Subscribe);

    let (trigger, shutdown) = shutdown_channel();
    let mut supervisor =
        Supervisor::new(driver, referee.clone(), Board::new("b03"), immediate_restart());
    let task = tokio::spawn(async move { supervisor.run(shutdown).await });

    referee.wait_for_registrations(1).await.unwrap();
    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();
    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);

    let calls = device.calls();
    assert_eq!(&calls[..5], &[
        DriverCall::Connect,
        DriverCall::Subscribe(Channel::Selector),
        DriverCall::Unsubscribe(Channel::Selector),
        DriverCall::Unsubscribe(Channel::PlayButton),
        DriverCall::Disconnect,
    ]);
    assert_eq!(calls[5], DriverCall::Connect);
}

#[tokio::test]
async fn closed_input_stream_is_a_fault() {
    let referee = SimReferee::new(ENDPOINT);
    let config = SupervisorConfig {
        restart_backoff: Duration::from_millis(5),
        ..SupervisorConfig::default()
    };
    let (device, trigger, task) = spawn(&referee, config);

    referee.wait_for_registrations(1).await.unwrap();
    device.close_input();
    referee.wait_for_registrations(3).await.unwrap();

    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);
    assert!(device.calls().contains(&DriverCall::Disconnect));
}

#[tokio::test]
async fn shutdown_cuts_backoff_short() {
    let referee = SimReferee::new(ENDPOINT);
    referee.fail_registrations(usize::MAX);
    let config = SupervisorConfig {
        restart_backoff: Duration::from_secs(3600),
        ..SupervisorConfig::default()
    };
    let (_device, trigger, task) = spawn(&referee, config);

    referee.wait_for_registrations(1).await.unwrap();
    trigger.trigger();

    let termination = tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    assert_eq!(termination, Termination::Shutdown);
    assert_eq!(referee.registrations().len(), 1);
}

#[tokio::test]
async fn shutdown_before_start_touches_nothing() {
    let referee = SimReferee::new(ENDPOINT);
    let driver = SimDriver::new();
    let device = driver.device();
    let (trigger, shutdown) = shutdown_channel();
    trigger.trigger();

    let mut supervisor =
        Supervisor::new(driver, referee.clone(), Board::new("b03"), SupervisorConfig::default());
    assert_eq!(supervisor.run(shutdown).await, Termination::Shutdown);

    assert!(device.calls().is_empty());
    assert!(referee.registrations().is_empty());
}

#[tokio::test]
async fn handshake_waits_for_online_and_second_online_ends_process() {
    let referee = SimReferee::new(ENDPOINT);
    let config = SupervisorConfig {
        session: SessionConfig { handshake: true },
        ..immediate_restart()
    };
    let (device, _trigger, task) = spawn(&referee, config);

    referee.wait_for_registrations(1).await.unwrap();
    assert_eq!(device.subscriptions(), vec![
        Channel::Selector,
        Channel::PlayButton,
        Channel::BoardStatus,
    ]);

    // Ignored until the board is online.
    device.push_input(DeviceInput::Selector(3));
    device.push_input(DeviceInput::BoardStatus(BoardStatus::Online));
    device.push_input(DeviceInput::Selector(9));
    device.wait_for_display(&display("Paper", "Rock", 0, 0)).await.unwrap();

    device.push_input(DeviceInput::BoardStatus(BoardStatus::Online));
    assert_eq!(task.await.unwrap(), Termination::RemoteShutdown);

    assert_eq!(referee.registrations().len(), 1);
    assert!(!device.calls().iter().any(|c| matches!(c, DriverCall::Unsubscribe(_))));
}

#[tokio::test]
async fn unknown_opponent_symbol_is_not_fatal() {
    let referee = SimReferee::new(ENDPOINT);
    referee.respond(5, 5, "Lizard");
    referee.respond(1, 2, "Paper");
    let (device, trigger, task) = spawn(&referee, immediate_restart());

    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();
    device.push_input(DeviceInput::Button(ButtonEdge::Clicked));
    referee.wait_for_plays(1).await.unwrap();
    device.push_input(DeviceInput::Button(ButtonEdge::Clicked));
    device.wait_for_display(&display("Rock", "Paper", 1, 2)).await.unwrap();

    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);
    assert_eq!(referee.registrations().len(), 1);
    assert!(!device.published(Channel::DisplayMessage).contains(&display("Rock", "Lizard", 5, 5)));
}

#[tokio::test]
async fn release_without_press_does_not_play() {
    let referee = SimReferee::new(ENDPOINT);
    referee.respond(0, 1, "Paper");
    let (device, trigger, task) = spawn(&referee, immediate_restart());

    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();
    device.push_inputs([
        DeviceInput::Button(ButtonEdge::Released),
        DeviceInput::Selector(-1),
    ]);
    device.wait_for_display(&display("Scissors", "Rock", 0, 0)).await.unwrap();
    assert!(referee.plays().is_empty());

    device.push_inputs([
        DeviceInput::Button(ButtonEdge::Pressed),
        DeviceInput::Button(ButtonEdge::Released),
    ]);
    referee.wait_for_plays(1).await.unwrap();
    assert_eq!(referee.plays(), vec![(ENDPOINT.to_string(), Symbol::Scissors)]);

    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);
}
