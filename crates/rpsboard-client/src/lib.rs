//! Client
//!
//! I/O implementations behind the application traits: [`HttpReferee`] speaks
//! to the match referee over HTTP, and with the `transport` feature
//! [`mqtt::MqttDriver`] reaches the board through an MQTT broker.
//!
//! Protocol logic stays in the Sans-IO [`rpsboard_app::Session`]. These types
//! only move bytes and report failures.
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`mqtt::MqttDriver`]: [`rpsboard_app::Driver`] over `rumqttc`
//! - [`mqtt::MqttConfig`]: broker address and timing

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod referee;

#[cfg(feature = "transport")]
pub mod mqtt;

pub use referee::{HttpReferee, RefereeConfig, RefereeError, resolve_endpoint};
