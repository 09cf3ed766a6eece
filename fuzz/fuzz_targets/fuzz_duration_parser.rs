#![no_main]

use libfuzzer_sys::fuzz_target;
use modalfx_core::{parse_duration, parse_duration_ms};

fuzz_target!(|data: &[u8]| {
    let Ok(descriptor) = std::str::from_utf8(data) else {
        return;
    };
    let wait = parse_duration(descriptor);
    let ms = parse_duration_ms(descriptor);
    assert!(ms >= 0.0);
    assert_eq!(wait.as_micros() as f64 / 1_000.0, ms);
});
