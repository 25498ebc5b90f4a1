#![no_main]

use libfuzzer_sys::fuzz_target;
use tlview_pipeline::{DecodePolicy, LineDecoder};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let decoder = LineDecoder::new();
        if let Ok(decoded) = decoder.decode(text) {
            let records = decoded.records.len();
            let failures = decoded.failures.len();
            assert!(records + failures <= text.lines().count());
            let _ = decoded.finish(DecodePolicy::Lenient);
        }
    }
});
