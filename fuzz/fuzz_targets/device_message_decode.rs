//! Fuzz target for Topics::decode
//!
//! Broker messages come from hardware we do not control. Decoding arbitrary
//! topic/payload pairs must never panic, and anything accepted must come from
//! an incoming channel of this board.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rpsboard_proto::{Direction, Topics};

#[derive(Debug, Arbitrary)]
enum TopicChoice {
    Known(u8),
    Raw(String),
}

#[derive(Debug, Arbitrary)]
struct Message {
    topic: TopicChoice,
    payload: Vec<u8>,
}

const TOPICS: [&str; 5] = [
    "tw/b03/encoder/1/status",
    "tw/b03/button/1/status",
    "tw/b03/b03//status",
    "tw/b03/display/1/show",
    "tw/b03/display/1/message",
];

fuzz_target!(|message: Message| {
    let topics = Topics::for_board("b03");
    let topic = match message.topic {
        TopicChoice::Known(index) => TOPICS[usize::from(index) % TOPICS.len()].to_string(),
        TopicChoice::Raw(topic) => topic,
    };

    if topics.decode(&topic, &message.payload).is_ok() {
        let channel = topics.channel_of(&topic).expect("decoded topic has a channel");
        assert_eq!(channel.direction(), Direction::Incoming);
    }
});
