//! HTTP referee tests against a mock referee.

use std::time::Duration;

use rpsboard_app::Referee;
use rpsboard_client::{HttpReferee, RefereeConfig, RefereeError};
use rpsboard_proto::{Board, Symbol};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn referee_for(server: &MockServer) -> HttpReferee {
    let config = RefereeConfig { address: server.uri(), timeout: Duration::from_secs(2) };
    HttpReferee::new(&config).unwrap()
}

#[tokio::test]
async fn register_posts_board_and_resolves_relative_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .and(body_json(json!({ "boardID": "b03" })))
        .respond_with(ResponseTemplate::new(201).insert_header("Content-Location", "/match/7"))
        .expect(1)
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let endpoint = referee.register(&Board::new("b03")).await.unwrap();

    assert_eq!(endpoint, format!("{}/match/7", server.uri()));
}

#[tokio::test]
async fn register_accepts_schemeless_location_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .respond_with(ResponseTemplate::new(200).insert_header("Location", "10.1.2.3:8080/match/9"))
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let endpoint = referee.register(&Board::new("b03")).await.unwrap();

    assert_eq!(endpoint, "http://10.1.2.3:8080/match/9");
}

#[tokio::test]
async fn register_without_location_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let err = referee.register(&Board::new("b03")).await.unwrap_err();

    assert!(matches!(err, RefereeError::MissingLocation { .. }));
}

#[tokio::test]
async fn register_rejects_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .respond_with(ResponseTemplate::new(202).insert_header("Content-Location", "/match/1"))
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let err = referee.register(&Board::new("b03")).await.unwrap_err();

    assert!(matches!(err, RefereeError::Status { status, .. } if status.as_u16() == 202));
}

#[tokio::test]
async fn register_does_not_follow_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/registry"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Location", "/match/9"))
        .expect(0)
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let err = referee.register(&Board::new("b03")).await.unwrap_err();

    assert!(matches!(err, RefereeError::Status { status, .. } if status.as_u16() == 302));
}

#[tokio::test]
async fn play_posts_symbol_and_decodes_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/match/7"))
        .and(body_json(json!({ "symbol": "Scissors" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ownScore": 1,
            "opponentScore": 0,
            "opponentSymbol": "Rock",
            "history": [{ "ownSymbol": "Scissors", "opponentSymbol": "Rock" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let response =
        referee.play(&format!("{}/match/7", server.uri()), Symbol::Scissors).await.unwrap();

    assert_eq!(response.own_score, 1);
    assert_eq!(response.opponent_score, 0);
    assert_eq!(response.opponent_symbol, "Rock");
    assert_eq!(response.history.len(), 1);
}

#[tokio::test]
async fn play_accepts_legacy_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/match/7"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "SlaveScore": 2,
            "MasterScore": 3,
            "MasterSymbol": "Paper"
        })))
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let response = referee.play(&format!("{}/match/7", server.uri()), Symbol::Rock).await.unwrap();

    assert_eq!((response.own_score, response.opponent_score), (2, 3));
    assert_eq!(response.opponent_symbol, "Paper");
    assert!(response.history.is_empty());
}

#[tokio::test]
async fn play_with_malformed_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/match/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let referee = referee_for(&server);
    let err = referee.play(&format!("{}/match/7", server.uri()), Symbol::Rock).await.unwrap_err();

    assert!(matches!(err, RefereeError::Body { .. }));
}

#[tokio::test]
async fn play_times_out_on_slow_referee() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/match/7"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = RefereeConfig { address: server.uri(), timeout: Duration::from_millis(200) };
    let referee = HttpReferee::new(&config).unwrap();
    let err = referee.play(&format!("{}/match/7", server.uri()), Symbol::Rock).await.unwrap_err();

    assert!(matches!(err, RefereeError::Request { .. }));
}
