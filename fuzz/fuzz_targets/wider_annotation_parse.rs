//! Fuzz target for WIDER annotation parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 documents to the annotation parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use widerlabel::wider::parser::fuzz_parse_wider_str;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_wider_str(input);
});
