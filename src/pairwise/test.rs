use super::*;
use crate::{
    data::err::{LookupError, ValidationError},
    distance::{CdrDist, Levenshtein},
};

fn records(seqs: &[&str]) -> Vec<Record> {
    seqs.iter().map(|&s| Record::from(s)).collect()
}

#[test]
fn small_batches_are_empty() {
    let engine = PairwiseEngine::new();
    assert!(engine.compute(&Levenshtein, &[]).unwrap().is_empty());

    let single = engine.compute(&Levenshtein, &records(&["GTA"])).unwrap();
    assert!(single.is_empty());
    assert_eq!(single.num_records(), 1);
}

#[test]
fn condensed_order() {
    let result = PairwiseEngine::new()
        .compute(&Levenshtein, &records(&["A", "AA", "AAAA", "AAAAAAAA"]))
        .unwrap();
    assert_eq!(result.values(), &[1.0, 3.0, 7.0, 2.0, 6.0, 4.0]);
    assert_eq!(result.len(), condensed_len(4));
}

#[test]
fn first_error_by_index() {
    let batch = records(&["GTA", "", "HLA", "GJA", ""]);
    let err = PairwiseEngine::new().compute(&CdrDist::default(), &batch).unwrap_err();
    assert_eq!(err, ValidationError::EmptySequence { record: 1 }.into());
}

#[test]
fn validation_report() {
    let batch = records(&["GTA", "", "HLA", "GJA", ""]);
    let report = PairwiseEngine::new().validate(&CdrDist::default(), &batch);
    assert_eq!(
        report,
        vec![
            ValidationError::EmptySequence { record: 1 }.into(),
            LookupError::new(b'J').in_record(3).into(),
            ValidationError::EmptySequence { record: 4 }.into(),
        ]
    );

    assert!(PairwiseEngine::new().validate(&CdrDist::default(), &records(&["GTA"])).is_empty());
}

#[test]
fn cross_distances() {
    let a = records(&["GTA", "HLA"]);
    let b = records(&["GTA", "KKR", "HLA"]);
    let engine = PairwiseEngine::new().with_threads(2);

    let values = engine.compute_cross(&Levenshtein, &a, &b).unwrap();
    assert_eq!(values, vec![0.0, 3.0, 2.0, 2.0, 3.0, 0.0]);

    assert!(engine.compute_cross(&Levenshtein, &a, &[]).unwrap().is_empty());

    let bad = records(&["GTA", ""]);
    assert_eq!(
        engine.compute_cross(&Levenshtein, &a, &bad),
        Err(ValidationError::EmptySequence { record: 3 }.into())
    );
}

#[test]
#[cfg(feature = "rand")]
fn thread_counts_agree() {
    let batch: Vec<Record> = crate::generate::rand_sequences(60, 4, 18, 11)
        .into_iter()
        .map(Record::from)
        .collect();
    let metric = CdrDist::default();

    let global = PairwiseEngine::new().compute(&metric, &batch).unwrap();
    for threads in [1, 3, 8] {
        let pooled = PairwiseEngine::new().with_threads(threads).compute(&metric, &batch).unwrap();
        let same = global
            .values()
            .iter()
            .zip(pooled.values())
            .all(|(a, b)| a.to_bits() == b.to_bits());
        assert!(same, "{threads} threads gave a different result");
    }
}

#[test]
fn cancelled_before_start() {
    let token = CancelToken::new();
    token.cancel();
    assert!(token.is_cancelled());

    let engine = PairwiseEngine::new().with_cancel_token(token);
    let batch = records(&["GTA", "HLA", "KKR"]);
    assert_eq!(engine.compute(&Levenshtein, &batch), Err(DistanceError::Cancelled));
    assert_eq!(engine.compute_cross(&Levenshtein, &batch, &batch), Err(DistanceError::Cancelled));
}

#[test]
#[cfg(feature = "parallel")]
fn dedicated_pool_is_built_once() {
    let engine = PairwiseEngine::new().with_threads(2);
    let Some(Ok(pool)) = &engine.pool else {
        panic!("expected a dedicated pool");
    };
    assert_eq!(engine.install(|| Ok(rayon::current_num_threads())).unwrap(), 2);

    let batch = records(&["GTA", "HLA", "KKR"]);
    for _ in 0..3 {
        assert_eq!(engine.compute(&Levenshtein, &batch).unwrap().values(), &[2.0, 3.0, 3.0]);
        assert_eq!(engine.validate(&Levenshtein, &batch), Vec::new());
    }

    let clone = engine.clone();
    let Some(Ok(shared)) = &clone.pool else {
        panic!("expected a dedicated pool");
    };
    assert!(Arc::ptr_eq(pool, shared));
    assert_eq!(Arc::strong_count(pool), 2);

    assert!(PairwiseEngine::new().with_threads(0).pool.is_none());
}
