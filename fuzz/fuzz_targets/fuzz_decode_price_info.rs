#![no_main]
use libfuzzer_sys::fuzz_target;
use tibber_timer::schedule::{ScheduleOptions, compute_schedule};
use tibber_timer::tibber::decode_price_timeline;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);
    // Decoding and scheduling must never panic, whatever the feed sends
    if let Ok((timeline, _)) = decode_price_timeline(&body, None) {
        let _ = compute_schedule(&timeline, 45, &ScheduleOptions::default());
    }
});
