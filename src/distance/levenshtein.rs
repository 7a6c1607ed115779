use super::Distance;
use crate::{
    alignment::{UnitCost, edit_distance},
    data::{Record, err::DistanceError},
};

/// The Levenshtein distance: the minimum number of single-symbol insertions,
/// deletions, and substitutions turning one sequence into the other.
///
/// Sequences are compared byte for byte, so any alphabet is accepted and
/// case is significant. Records must be single, non-empty sequences.
///
/// ## Example
///
/// ```
/// # use setriq::{data::Record, distance::{Distance, Levenshtein}};
/// let d = Levenshtein.between(&Record::from("AASQ"), &Record::from("PASQ")).unwrap();
/// assert_eq!(d, 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl Distance for Levenshtein {
    type Prepared = Vec<u8>;

    #[inline]
    fn prepare(&self, record: &Record, index: usize) -> Result<Vec<u8>, DistanceError> {
        Ok(record.as_sequence(index)?.to_vec())
    }

    #[inline]
    fn distance(&self, a: &Vec<u8>, b: &Vec<u8>) -> f64 {
        edit_distance(a, b, &UnitCost)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::err::ValidationError;

    #[test]
    fn levenshtein_records() {
        let d = Levenshtein.between(&"SEQVENCES".into(), &"SEQVENCES".into()).unwrap();
        assert_eq!(d, 0.0);

        let d = Levenshtein.between(&"GTA".into(), &"KKR".into()).unwrap();
        assert_eq!(d, 3.0);

        // Case is significant
        let d = Levenshtein.between(&"aasq".into(), &"AASQ".into()).unwrap();
        assert_eq!(d, 4.0);
    }

    #[test]
    fn levenshtein_rejects_bad_records() {
        let err = Levenshtein.between(&"GTA".into(), &"".into()).unwrap_err();
        assert_eq!(err, ValidationError::EmptySequence { record: 1 }.into());

        let segmented: Record = [("cdr_3", "GTA")].into_iter().collect();
        let err = Levenshtein.between(&segmented, &"GTA".into()).unwrap_err();
        assert_eq!(err, ValidationError::ExpectedSequence { record: 0 }.into());
    }
}
