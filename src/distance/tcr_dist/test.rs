use super::*;
use crate::data::err::ValidationError;

const SEGMENTS: [&str; 4] = ["cdr_1", "cdr_2", "cdr_2_5", "cdr_3"];

/// A record with every default segment set to `seq`.
fn uniform(seq: &str) -> Record {
    SEGMENTS.iter().map(|&name| (name, seq)).collect()
}

fn confirmed() -> TcrDist {
    TcrDist::new(TcrDistConfig::default().with_default_segments()).unwrap()
}

#[test]
fn tcr_dist_values() {
    let metric = confirmed();

    let record: Record = [
        ("cdr_1", "MNHEY"),
        ("cdr_2", "SVGAGI"),
        ("cdr_2_5", "KED"),
        ("cdr_3", "CASSLGQAYEQYF"),
    ]
    .into_iter()
    .collect();
    assert_eq!(metric.between(&record, &record).unwrap(), 0.0);

    assert_eq!(metric.between(&uniform("AASQ"), &uniform("PASQ")).unwrap(), 24.0);
    assert_eq!(metric.between(&uniform("GTA"), &uniform("HLA")).unwrap(), 48.0);
    assert_eq!(metric.between(&uniform("GTA"), &uniform("KKR")).unwrap(), 72.0);
    assert_eq!(metric.between(&uniform("HLA"), &uniform("KKR")).unwrap(), 72.0);
}

#[test]
fn identical_records_pay_self_substitution_costs() {
    use crate::pairwise::PairwiseEngine;

    let metric = confirmed();

    // BLOSUM62 scores X/X at -1 and */* at 1, so each costs 4 and 3 with a
    // bound of 4, summed over weights 1 + 1 + 1 + 3
    let ambiguous = uniform("CASSXF");
    assert_eq!(metric.between(&ambiguous, &ambiguous).unwrap(), 24.0);
    let stop = uniform("CAS*");
    assert_eq!(metric.between(&stop, &stop).unwrap(), 18.0);

    let batch = vec![ambiguous.clone(), ambiguous, uniform("CASSLF")];
    let result = PairwiseEngine::new().compute(&metric, &batch).unwrap();
    assert_eq!(result.values()[0], 24.0);
    assert_eq!(result.get(0, 1), Some(24.0));
    assert_eq!(result.get(0, 0), None);
}

#[test]
fn tcr_dist_is_symmetric() {
    let metric = confirmed();
    let a = uniform("CASSLGQAYEQYF");
    let b = uniform("CASRQGAYEQF");
    assert_eq!(
        metric.between(&a, &b).unwrap().to_bits(),
        metric.between(&b, &a).unwrap().to_bits()
    );
}

#[test]
fn tcr_dist_segment_errors() {
    let metric = confirmed();

    let missing: Record = [("cdr_1", "GTA"), ("cdr_2_5", "GTA"), ("cdr_3", "GTA")]
        .into_iter()
        .collect();
    assert_eq!(
        metric.between(&uniform("GTA"), &missing),
        Err(ValidationError::MissingSegment {
            record:  1,
            segment: "cdr_2".to_string(),
        }
        .into())
    );

    let mut empty = uniform("GTA");
    if let Record::Segments(segments) = &mut empty {
        segments.insert("cdr_3".to_string(), Vec::new());
    }
    assert_eq!(
        metric.between(&empty, &uniform("GTA")),
        Err(ValidationError::EmptySegment {
            record:  0,
            segment: "cdr_3".to_string(),
        }
        .into())
    );

    assert_eq!(
        metric.between(&"GTA".into(), &uniform("GTA")),
        Err(ValidationError::ExpectedSegments { record: 0 }.into())
    );
}

#[test]
fn tcr_dist_unknown_symbol() {
    let metric = confirmed();
    let mut bad = uniform("GTA");
    if let Record::Segments(segments) = &mut bad {
        segments.insert("cdr_2".to_string(), b"GJA".to_vec());
    }

    let err = metric.between(&uniform("GTA"), &bad).unwrap_err();
    assert_eq!(err, LookupError::new(b'J').in_record(1).in_segment("cdr_2").into());
}

#[test]
fn extra_segments_are_ignored() {
    let metric = confirmed();
    let mut extra = uniform("AASQ");
    if let Record::Segments(segments) = &mut extra {
        segments.insert("cdr_4".to_string(), b"WWW".to_vec());
    }
    assert_eq!(metric.between(&extra, &uniform("AASQ")).unwrap(), 0.0);
}

#[test]
fn default_segment_advisory() {
    let unconfirmed = TcrDist::new(TcrDistConfig::default()).unwrap();
    assert_eq!(
        unconfirmed.advisories(),
        &[Advisory::DefaultSegments {
            names: SEGMENTS.iter().map(ToString::to_string).collect(),
        }]
    );

    // The advisory never changes the result
    let a = uniform("AASQ");
    let b = uniform("PASQ");
    assert_eq!(unconfirmed.between(&a, &b), confirmed().between(&a, &b));

    assert!(confirmed().advisories().is_empty());
    assert_eq!(confirmed().segments(), TcrDistConfig::default_segments().as_slice());
}

#[test]
fn pre_aligned_gaps() {
    let config = TcrDistConfig::default().with_segments(vec![SegmentConfig::new("cdr_3", 1.0, 3.0)]);
    let metric = TcrDist::new(config).unwrap();

    let gapped: Record = [("cdr_3", "CAS-")].into_iter().collect();
    let full: Record = [("cdr_3", "CASS")].into_iter().collect();
    assert_eq!(metric.between(&gapped, &full).unwrap(), 3.0);
    assert_eq!(metric.between(&gapped, &gapped).unwrap(), 0.0);

    let config = TcrDistConfig {
        gap_symbol: None,
        ..TcrDistConfig::default().with_default_segments()
    };
    let metric = TcrDist::new(config).unwrap();
    let err = metric.between(&uniform("CAS-"), &uniform("CASS")).unwrap_err();
    assert_eq!(err, LookupError::new(b'-').in_record(0).in_segment("cdr_1").into());
}

#[test]
fn normalized_segments() {
    let config = TcrDistConfig::default().with_segments(vec![
        SegmentConfig::new("cdr_1", 1.0, 4.0).normalized(),
        SegmentConfig::new("cdr_3", 2.0, 4.0),
    ]);
    let metric = TcrDist::new(config).unwrap();

    let a: Record = [("cdr_1", "AASQ"), ("cdr_3", "GTA")].into_iter().collect();
    let b: Record = [("cdr_1", "PASQ"), ("cdr_3", "HLA")].into_iter().collect();
    assert_eq!(metric.between(&a, &b).unwrap(), 1.0 + 16.0);
}

#[test]
fn tcr_dist_configuration_errors() {
    let build = |config: TcrDistConfig| TcrDist::new(config).unwrap_err();

    assert_eq!(
        build(TcrDistConfig::default().with_segments(Vec::new())),
        ConfigurationError::NoSegments
    );
    assert_eq!(
        build(TcrDistConfig::default().with_segments(vec![
            SegmentConfig::new("cdr_3", 1.0, 4.0),
            SegmentConfig::new("cdr_3", 3.0, 4.0),
        ])),
        ConfigurationError::DuplicateSegment("cdr_3".to_string())
    );
    assert_eq!(
        build(TcrDistConfig::default().with_segments(vec![SegmentConfig::new("cdr_3", -1.0, 4.0)])),
        ConfigurationError::InvalidWeight {
            segment: "cdr_3".to_string(),
            weight:  -1.0,
        }
    );
    assert_eq!(
        build(TcrDistConfig::default().with_segments(vec![SegmentConfig::new("cdr_3", 1.0, f64::INFINITY)])),
        ConfigurationError::InvalidGapPenalty(f64::INFINITY)
    );
    assert_eq!(
        build(TcrDistConfig {
            distance_bound: 0.0,
            ..TcrDistConfig::default()
        }),
        ConfigurationError::InvalidDistanceBound(0.0)
    );
    assert_eq!(
        build(TcrDistConfig {
            gap_symbol: Some('*'),
            ..TcrDistConfig::default()
        }),
        ConfigurationError::GapSymbolInMatrix {
            name:   "BLOSUM62".to_string(),
            symbol: '*',
        }
    );
    assert!(matches!(
        build(TcrDistConfig {
            gap_symbol: Some('é'),
            ..TcrDistConfig::default()
        }),
        ConfigurationError::NonAsciiSymbol { symbol: 'é', .. }
    ));
}
