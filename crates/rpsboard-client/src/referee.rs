//! HTTP referee client.
//!
//! Registration posts the board identity to `<origin>/registry` and reads the
//! match location from `Content-Location` (falling back to `Location`). Plays
//! post the symbol to that location. Only `200 OK` and `201 Created` count as
//! success. Nothing is retried.

use std::time::Duration;

use reqwest::{
    StatusCode,
    header::{CONTENT_LOCATION, HeaderMap, LOCATION},
};
use rpsboard_app::Referee;
use rpsboard_proto::{Board, PlayRequest, PlayResponse, Symbol};
use thiserror::Error;

/// Scheme assumed when an address or location carries none.
const DEFAULT_SCHEME: &str = "http";

/// Referee client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefereeConfig {
    /// Referee address, `host:port` or a full `scheme://host:port` URL.
    pub address: String,
    /// Bound on each request, connection included.
    pub timeout: Duration,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self { address: "192.168.201.99:8080".to_string(), timeout: Duration::from_secs(10) }
    }
}

/// Referee call errors.
#[derive(Debug, Error)]
pub enum RefereeError {
    /// Configured address has no host.
    #[error("invalid referee address: {0:?}")]
    InvalidAddress(String),

    /// HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request could not be completed (connection, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        /// Target URL
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// Referee answered with a status other than 200 or 201.
    #[error("{url} answered {status}")]
    Status {
        /// Target URL
        url: String,
        /// Status received
        status: StatusCode,
    },

    /// Registration response carried no usable location header.
    #[error("registration response from {url} carried no location")]
    MissingLocation {
        /// Registry URL
        url: String,
    },

    /// Response body did not decode.
    #[error("malformed response from {url}: {source}")]
    Body {
        /// Target URL
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },
}

/// Normalize a location reference against the referee origin.
///
/// - `scheme://host/path` is returned unchanged.
/// - `/path` is joined to `origin` (`scheme://host[:port]`).
/// - `host:port/path` gets the origin's scheme prefixed.
pub fn resolve_endpoint(origin: &str, location: &str) -> String {
    let location = location.trim();
    if location.contains("://") {
        return location.to_string();
    }
    if location.starts_with('/') {
        return format!("{}{location}", origin.trim_end_matches('/'));
    }
    let scheme = origin.split_once("://").map_or(DEFAULT_SCHEME, |(scheme, _)| scheme);
    format!("{scheme}://{location}")
}

/// Reduce an address to `scheme://authority`.
fn origin_of(address: &str) -> Result<String, RefereeError> {
    let address = address.trim();
    let (scheme, rest) = address.split_once("://").unwrap_or((DEFAULT_SCHEME, address));
    let authority = rest.split('/').next().unwrap_or_default();
    if scheme.is_empty() || authority.is_empty() {
        return Err(RefereeError::InvalidAddress(address.to_string()));
    }
    Ok(format!("{scheme}://{authority}"))
}

fn location_header(headers: &HeaderMap) -> Option<&str> {
    [CONTENT_LOCATION, LOCATION]
        .iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn check_status(url: &str, status: StatusCode) -> Result<(), RefereeError> {
    if status == StatusCode::OK || status == StatusCode::CREATED {
        Ok(())
    } else {
        Err(RefereeError::Status { url: url.to_string(), status })
    }
}

/// [`Referee`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpReferee {
    client: reqwest::Client,
    origin: String,
}

impl HttpReferee {
    /// Build a client for the configured referee.
    pub fn new(config: &RefereeConfig) -> Result<Self, RefereeError> {
        let origin = origin_of(&config.address)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(RefereeError::Client)?;
        Ok(Self { client, origin })
    }

    /// `scheme://host[:port]` all relative locations resolve against.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Referee for HttpReferee {
    type Error = RefereeError;

    async fn register(&self, board: &Board) -> Result<String, Self::Error> {
        let url = format!("{}/registry", self.origin);
        tracing::debug!(%url, board = %board.board_id, "registering board");

        let response = self
            .client
            .post(&url)
            .json(board)
            .send()
            .await
            .map_err(|source| RefereeError::Request { url: url.clone(), source })?;
        check_status(&url, response.status())?;

        let location = location_header(response.headers())
            .ok_or_else(|| RefereeError::MissingLocation { url: url.clone() })?;
        let endpoint = resolve_endpoint(&self.origin, location);
        tracing::debug!(location, %endpoint, "registration accepted");
        Ok(endpoint)
    }

    async fn play(&self, endpoint: &str, symbol: Symbol) -> Result<PlayResponse, Self::Error> {
        tracing::debug!(endpoint, %symbol, "submitting play");

        let response = self
            .client
            .post(endpoint)
            .json(&PlayRequest { symbol })
            .send()
            .await
            .map_err(|source| RefereeError::Request { url: endpoint.to_string(), source })?;
        check_status(endpoint, response.status())?;

        response
            .json::<PlayResponse>()
            .await
            .map_err(|source| RefereeError::Body { url: endpoint.to_string(), source })
    }
}
