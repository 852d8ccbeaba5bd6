#![no_main]

use libfuzzer_sys::fuzz_target;
use msf_histogram::Histogram;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let resolution = (data[0] % 18) as usize;
    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut lhs = Histogram::new(resolution);
    for chunk in first_half.chunks_exact(8) {
        let value = f64::from_le_bytes(chunk.try_into().unwrap());
        lhs.insert(value, 1.0);
        assert!(!lhs.is_empty());
        if let Some(decoded) = lhs.project(value).value() {
            assert_eq!(lhs.project(value), lhs.project(decoded));
        }
    }

    let mut rhs = Histogram::new(resolution);
    for chunk in second_half.chunks_exact(8) {
        rhs.insert(f64::from_le_bytes(chunk.try_into().unwrap()), 1.0);
    }

    assert_eq!(lhs.cancel(&lhs).total(), 0.0);
    assert_eq!(lhs.combine(&rhs).total(), lhs.total() + rhs.total());
    // bins rounding past f64::MAX are left out of the interchange form
    if lhs.iter().all(|(key, _)| key.value().is_some()) {
        assert_eq!(Histogram::from_raw_hist(&lhs.to_raw_hist(), resolution), lhs);
        assert_eq!(Histogram::deserialize(&lhs.serialize(), resolution).unwrap(), lhs);
    }

    lhs.merge(&rhs);
    assert!(lhs.min(&rhs).len() <= rhs.len());
});
