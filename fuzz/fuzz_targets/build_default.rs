#![no_main]

use libfuzzer_sys::fuzz_target;
use ordo_make::{Ages, Maker, parse_makefile};

// Arbitrary rule graphs, cycles included, must build without panicking.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let makefile = parse_makefile(text);
        let mut maker = Maker::new(Ages::new(1));
        if maker.load(&makefile).is_ok() {
            let _ = maker.build_default(&mut std::io::sink());
        }
    }
});
