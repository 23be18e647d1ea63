#![no_main]
use libfuzzer_sys::fuzz_target;
use tibber_timer::timestamp::{HourArithmetic, Timestamp, hours_between};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Split the input in two so both sides of the arithmetic vary
    let mid = (0..=text.len() / 2)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let (a, b) = text.split_at(mid);
    if let (Ok(a), Ok(b)) = (Timestamp::parse(a), Timestamp::parse(b)) {
        for mode in [HourArithmetic::Calendar, HourArithmetic::FixedWidth] {
            assert_eq!(hours_between(&a, &a, mode), 0);
            assert_eq!(hours_between(&a, &b, mode), -hours_between(&b, &a, mode));
        }
    }
});
