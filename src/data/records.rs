use crate::data::err::ValidationError;
use std::collections::BTreeMap;

/// One comparable unit of input: a single sequence, or a set of named
/// segments (such as the CDR loops of a receptor chain).
///
/// Records are cheap to build from strings, byte vectors, or iterators of
/// `(name, sequence)` pairs:
///
/// ```
/// # use setriq::data::Record;
/// let single = Record::from("CASSLGQAYEQYF");
/// let chain: Record = [("cdr_1", "MNHEY"), ("cdr_2", "SVGAGI"), ("cdr_3", "CASSLGQAYEQYF")]
///     .into_iter()
///     .collect();
///
/// assert!(single.as_sequence(0).is_ok());
/// assert_eq!(chain.segment(1, "cdr_2").unwrap(), b"SVGAGI");
/// ```
///
/// With the `serde` feature, a record deserializes from either a string or
/// an object of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(from = "RecordRepr"))]
pub enum Record {
    Sequence(Vec<u8>),
    Segments(BTreeMap<String, Vec<u8>>),
}

impl Record {
    /// Returns the sequence of a single-sequence record. `record` is the
    /// position of this record in its collection, used for error reporting.
    ///
    /// ## Errors
    ///
    /// Segmented records and empty sequences are rejected with a
    /// [`ValidationError`].
    #[inline]
    pub fn as_sequence(&self, record: usize) -> Result<&[u8], ValidationError> {
        match self {
            Record::Sequence(seq) if seq.is_empty() => Err(ValidationError::EmptySequence { record }),
            Record::Sequence(seq) => Ok(seq),
            Record::Segments(_) => Err(ValidationError::ExpectedSequence { record }),
        }
    }

    /// Returns the named segment of a segmented record. `record` is the
    /// position of this record in its collection, used for error reporting.
    ///
    /// ## Errors
    ///
    /// Single-sequence records and missing or empty segments are rejected
    /// with a [`ValidationError`].
    #[inline]
    pub fn segment(&self, record: usize, name: &str) -> Result<&[u8], ValidationError> {
        let Record::Segments(segments) = self else {
            return Err(ValidationError::ExpectedSegments { record });
        };

        match segments.get(name) {
            None => Err(ValidationError::MissingSegment {
                record,
                segment: name.to_string(),
            }),
            Some(seq) if seq.is_empty() => Err(ValidationError::EmptySegment {
                record,
                segment: name.to_string(),
            }),
            Some(seq) => Ok(seq),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_segmented(&self) -> bool {
        matches!(self, Record::Segments(_))
    }
}

impl From<&str> for Record {
    fn from(value: &str) -> Self {
        Record::Sequence(value.as_bytes().to_vec())
    }
}

impl From<String> for Record {
    fn from(value: String) -> Self {
        Record::Sequence(value.into_bytes())
    }
}

impl From<&[u8]> for Record {
    fn from(value: &[u8]) -> Self {
        Record::Sequence(value.to_vec())
    }
}

impl From<Vec<u8>> for Record {
    fn from(value: Vec<u8>) -> Self {
        Record::Sequence(value)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: AsRef<[u8]>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record::Segments(iter.into_iter().map(|(k, v)| (k.into(), v.as_ref().to_vec())).collect())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RecordRepr {
    Sequence(String),
    Segments(BTreeMap<String, String>),
}

#[cfg(feature = "serde")]
impl From<RecordRepr> for Record {
    fn from(value: RecordRepr) -> Self {
        match value {
            RecordRepr::Sequence(seq) => seq.into(),
            RecordRepr::Segments(segments) => segments.into_iter().collect(),
        }
    }
}
