#![no_main]

use libfuzzer_sys::fuzz_target;
use msf_histogram::Histogram;

fuzz_target!(|data: &[u8]| {
    let (partial, err) = Histogram::deserialize_partial(data, 3);
    match Histogram::deserialize(data, 3) {
        Ok(h) => {
            assert!(err.is_none());
            assert_eq!(h.len(), partial.len());
        }
        Err(e) => assert_eq!(Some(e), err),
    }
});
