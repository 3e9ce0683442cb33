//! End-to-end runs: simulated board, real HTTP referee client, mock referee.

use std::time::Duration;

use rpsboard_app::{Supervisor, SupervisorConfig, Termination, shutdown_channel};
use rpsboard_client::{HttpReferee, RefereeConfig};
use rpsboard_harness::{DriverCall, SimDriver};
use rpsboard_proto::{Board, ButtonEdge, Channel, DeviceInput};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn display(own: &str, opponent: &str, own_score: u32, opponent_score: u32) -> String {
    format!(
        "Own:      {own}\nOpponent: {opponent}\nOwn:      {own_score}\nOpponent: {opponent_score}"
    )
}

#[tokio::test]
async fn board_registers_selects_and_plays_a_round() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .and(body_json(json!({ "boardID": "b03" })))
        .respond_with(ResponseTemplate::new(201).insert_header("Content-Location", "/match/7"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/match/7"))
        .and(body_json(json!({ "symbol": "Scissors" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ownScore": 1,
            "opponentScore": 0,
            "opponentSymbol": "Rock"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let driver = SimDriver::new();
    let device = driver.device();
    let referee = HttpReferee::new(&RefereeConfig {
        address: server.uri(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let (trigger, shutdown) = shutdown_channel();
    let mut supervisor =
        Supervisor::new(driver, referee, Board::new("b03"), SupervisorConfig::default());
    let task = tokio::spawn(async move { supervisor.run(shutdown).await });

    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();

    device.push_inputs([DeviceInput::Selector(0), DeviceInput::Selector(1)]);
    device.wait_for_display(&display("Paper", "Rock", 0, 0)).await.unwrap();
    device.push_input(DeviceInput::Selector(2));
    device.wait_for_display(&display("Scissors", "Rock", 0, 0)).await.unwrap();

    device.push_inputs([
        DeviceInput::Button(ButtonEdge::Pressed),
        DeviceInput::Button(ButtonEdge::Released),
    ]);
    device.wait_for_display(&display("Scissors", "Rock", 1, 0)).await.unwrap();

    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);

    let calls = device.calls();
    assert_eq!(&calls[..4], &[
        DriverCall::Connect,
        DriverCall::Subscribe(Channel::Selector),
        DriverCall::Subscribe(Channel::PlayButton),
        DriverCall::Publish { channel: Channel::DisplayMode, payload: "4".into() },
    ]);
    assert_eq!(calls[4], DriverCall::Publish {
        channel: Channel::DisplayMessage,
        payload: "Initializing...\n\n\n".into(),
    });
    assert_eq!(&calls[calls.len() - 3..], &[
        DriverCall::Unsubscribe(Channel::Selector),
        DriverCall::Unsubscribe(Channel::PlayButton),
        DriverCall::Disconnect,
    ]);
}

#[tokio::test]
async fn referee_outage_restarts_with_fresh_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .respond_with(ResponseTemplate::new(201).insert_header("Content-Location", "/match/7"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/match/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let driver = SimDriver::new();
    let device = driver.device();
    let referee = HttpReferee::new(&RefereeConfig {
        address: server.uri(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let config =
        SupervisorConfig { restart_backoff: Duration::ZERO, ..SupervisorConfig::default() };
    let (trigger, shutdown) = shutdown_channel();
    let mut supervisor = Supervisor::new(driver, referee, Board::new("b03"), config);
    let task = tokio::spawn(async move { supervisor.run(shutdown).await });

    device.wait_for_display(&display("Rock", "Rock", 0, 0)).await.unwrap();
    device.push_input(DeviceInput::Button(ButtonEdge::Clicked));

    let live = DriverCall::Publish {
        channel: Channel::DisplayMessage,
        payload: display("Rock", "Rock", 0, 0),
    };
    device
        .wait_until("live display after restart", |calls| {
            calls.iter().filter(|c| **c == live).count() == 2
        })
        .await
        .unwrap();
    assert_eq!(device.calls().iter().filter(|c| **c == DriverCall::Connect).count(), 2);

    trigger.trigger();
    assert_eq!(task.await.unwrap(), Termination::Shutdown);

    let registrations = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/registry")
        .count();
    assert_eq!(registrations, 2);
}
