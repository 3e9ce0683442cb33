//! Fuzz target for referee response decoding
//!
//! Play responses go from JSON through `PlayResponse` into `MatchOutcome`.
//! Neither step may panic on arbitrary bytes; an unknown symbol anywhere in
//! the response rejects the whole outcome.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rpsboard_proto::{MatchOutcome, PlayResponse};

fuzz_target!(|data: &[u8]| {
    let Ok(response) = serde_json::from_slice::<PlayResponse>(data) else {
        return;
    };
    let symbols_known = response.opponent_symbol.parse::<rpsboard_proto::Symbol>().is_ok()
        && response.history.iter().all(|entry| {
            entry.own_symbol.parse::<rpsboard_proto::Symbol>().is_ok()
                && entry.opponent_symbol.parse::<rpsboard_proto::Symbol>().is_ok()
        });

    assert_eq!(MatchOutcome::try_from(response).is_ok(), symbols_known);
});
