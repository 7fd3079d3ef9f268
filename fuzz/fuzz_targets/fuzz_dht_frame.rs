//! Fuzz target: `dht::decode`
//!
//! Arbitrary 40-bit frames must either be rejected or decode to values
//! inside the sensor's physical range.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use thingnode::sensors::dht::{DhtKind, decode};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(raw) = <[u8; 5]>::try_from(rest) else {
        return;
    };

    let kind = if selector & 1 == 0 { DhtKind::Dht11 } else { DhtKind::Dht22 };
    if let Ok(frame) = decode(kind, raw) {
        assert!((0.0..=100.0).contains(&frame.humidity));
        assert!((-40.0..=80.0).contains(&frame.temperature));
    }
});
