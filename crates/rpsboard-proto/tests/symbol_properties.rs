//! Property-based tests for the symbol algebra.
//!
//! The selector walks symbols cyclically, so these properties must hold for
//! every symbol and every walk, not just the three hand-picked cases.

use proptest::prelude::*;
use rpsboard_proto::{Symbol, UnknownSymbol};

fn arbitrary_symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![Just(Symbol::Rock), Just(Symbol::Paper), Just(Symbol::Scissors)]
}

proptest! {
    #[test]
    fn predecessor_undoes_successor(symbol in arbitrary_symbol()) {
        prop_assert_eq!(symbol.successor().predecessor(), symbol);
        prop_assert_eq!(symbol.predecessor().successor(), symbol);
    }

    #[test]
    fn successor_has_period_three(symbol in arbitrary_symbol()) {
        prop_assert_ne!(symbol.successor(), symbol);
        prop_assert_ne!(symbol.successor().successor(), symbol);
        prop_assert_eq!(symbol.successor().successor().successor(), symbol);
    }

    #[test]
    fn text_round_trips(symbol in arbitrary_symbol()) {
        prop_assert_eq!(symbol.as_str().parse::<Symbol>(), Ok(symbol));
        prop_assert_eq!(symbol.to_string(), symbol.as_str());
    }

    #[test]
    fn non_canonical_text_is_unknown(text in "\\PC{0,12}") {
        prop_assume!(!["Rock", "Paper", "Scissors"].contains(&text.as_str()));
        prop_assert_eq!(text.parse::<Symbol>(), Err(UnknownSymbol(text.clone())));
    }

    #[test]
    fn walk_position_is_net_steps_mod_three(steps in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut symbol = Symbol::Rock;
        let mut net: i64 = 0;
        for forward in &steps {
            if *forward {
                symbol = symbol.successor();
                net += 1;
            } else {
                symbol = symbol.predecessor();
                net -= 1;
            }
        }
        prop_assert_eq!(symbol.index() as i64, net.rem_euclid(3));
    }
}
