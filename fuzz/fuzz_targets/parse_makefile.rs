#![no_main]

use libfuzzer_sys::fuzz_target;
use ordo_make::parse_makefile;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let makefile = parse_makefile(text);
        for rule in &makefile.rules {
            assert!(!rule.target.is_empty());
            assert!(rule.line >= 1);
        }
        for err in &makefile.errors {
            assert!(err.line >= 1);
        }
    }
});
