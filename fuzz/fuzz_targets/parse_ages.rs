#![no_main]

use libfuzzer_sys::fuzz_target;
use ordo_make::parse_ages;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_ages(text);
    }
});
