#![cfg(feature = "fuzzing")]

use arbitrary::{Arbitrary, Unstructured};
use setriq::prelude::*;

/// Deterministic pseudo-random bytes for driving [`Arbitrary`].
fn noise(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state.to_le_bytes()[0]
        })
        .collect()
}

fn arbitrary_records(seed: u64) -> Vec<Record> {
    let data = noise(seed, 512);
    let mut u = Unstructured::new(&data);
    (0..4).filter_map(|_| Record::arbitrary(&mut u).ok()).collect()
}

fn is_record_error(err: &DistanceError) -> bool {
    matches!(err, DistanceError::Validation(_) | DistanceError::Lookup(_))
}

#[test]
fn arbitrary_records_never_panic() {
    let tcr_dist = TcrDist::new(TcrDistConfig::default().with_default_segments()).unwrap();
    let metrics = [Metric::from(Levenshtein), Metric::from(CdrDist::default()), Metric::from(tcr_dist)];

    for seed in 0..64 {
        let records = arbitrary_records(seed);
        for metric in &metrics {
            for a in &records {
                for b in &records {
                    match (metric.between(a, b), metric.between(b, a)) {
                        (Ok(ab), Ok(ba)) => {
                            assert!(ab.is_finite() && ab >= 0.0, "{metric:?} gave {ab}");
                            assert_eq!(ab.to_bits(), ba.to_bits());
                        }
                        (Err(ab), Err(ba)) => assert!(is_record_error(&ab) && is_record_error(&ba)),
                        (ab, ba) => panic!("only one order failed: {ab:?} and {ba:?}"),
                    }
                }
            }

            match metric.compute(&records) {
                Ok(result) => assert_eq!(result.len(), records.len() * records.len().saturating_sub(1) / 2),
                Err(err) => assert!(is_record_error(&err)),
            }
        }
    }
}

#[test]
fn arbitrary_records_cover_both_shapes() {
    let records: Vec<Record> = (0..64).flat_map(arbitrary_records).collect();
    assert!(records.iter().any(Record::is_segmented));
    assert!(records.iter().any(|r| !r.is_segmented()));
}
