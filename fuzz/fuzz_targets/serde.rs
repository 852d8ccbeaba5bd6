#![no_main]

use libfuzzer_sys::fuzz_target;
use msf_histogram::Histogram;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut h) = serde_json::from_slice::<Histogram>(data) {
        h.insert(1.0, 1.0);
        assert!(h.read(1.0) != 0.0 || h.len() > 0);
    }
});
