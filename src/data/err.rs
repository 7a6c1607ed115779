use thiserror::Error;

/// Errors raised while building a metric, a substitution matrix, or a
/// [`PairwiseEngine`]. A metric that fails construction never computes
/// anything.
///
/// [`PairwiseEngine`]: crate::pairwise::PairwiseEngine
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("Unknown substitution matrix '{0}'")]
    UnknownMatrix(String),
    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("The substitution matrix '{name}' has no symbols")]
    EmptyMatrix { name: String },
    #[error("The substitution matrix '{name}' has {found} symbols, but at most {max} are supported")]
    TooManySymbols { name: String, found: usize, max: usize },
    #[error("The symbol {symbol:?} in matrix '{name}' is not an ASCII character")]
    NonAsciiSymbol { name: String, symbol: char },
    #[error("The symbol '{symbol}' is listed more than once in matrix '{name}'")]
    DuplicateSymbol { name: String, symbol: char },
    #[error("The index of matrix '{name}' does not assign a symbol to position {position} of {dim}")]
    MissingIndexPosition { name: String, position: usize, dim: usize },
    #[error("The substitution matrix '{name}' has {found} rows, but its index has {expected} symbols")]
    RowCount { name: String, found: usize, expected: usize },
    #[error("The substitution matrix '{name}' is not square: row {row} has {found} entries, expected {expected}")]
    NotSquare {
        name:     String,
        row:      usize,
        found:    usize,
        expected: usize,
    },
    #[error("The substitution matrix '{name}' has no entry for ('{a}', '{b}')")]
    MissingEntry { name: String, a: char, b: char },
    #[error("The substitution matrix '{name}' has a non-finite entry {score} for ('{a}', '{b}')")]
    NonFiniteScore { name: String, a: char, b: char, score: f64 },
    #[error("The substitution matrix '{name}' is not symmetric: ('{a}', '{b}') is {ab} but ('{b}', '{a}') is {ba}")]
    Asymmetric {
        name: String,
        a:    char,
        b:    char,
        ab:   f64,
        ba:   f64,
    },
    #[error("Invalid gap penalty {0}: penalties must be finite and non-negative")]
    InvalidGapPenalty(f64),
    #[error("The gap extend penalty ({extend}) was greater than the gap open penalty ({open})")]
    BadGapWeights { open: f64, extend: f64 },
    #[error("Segment '{segment}' has an invalid weight {weight}: weights must be finite and non-negative")]
    InvalidWeight { segment: String, weight: f64 },
    #[error("Invalid distance bound {0}: the bound must be finite and positive")]
    InvalidDistanceBound(f64),
    #[error("At least one segment must be configured")]
    NoSegments,
    #[error("Segment '{0}' is configured more than once")]
    DuplicateSegment(String),
    #[error("The gap symbol '{symbol}' is also a symbol of matrix '{name}'")]
    GapSymbolInMatrix { name: String, symbol: char },
    #[error("Failed to build a thread pool: {0}")]
    ThreadPool(String),
}

/// A record does not have the shape the selected metric requires. `record`
/// is the position of the offending record in the input collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Record {record} is an empty sequence")]
    EmptySequence { record: usize },
    #[error("Record {record} is missing the required segment '{segment}'")]
    MissingSegment { record: usize, segment: String },
    #[error("Record {record} has an empty '{segment}' segment")]
    EmptySegment { record: usize, segment: String },
    #[error("Record {record} has named segments, but the metric compares single sequences")]
    ExpectedSequence { record: usize },
    #[error("Record {record} is a single sequence, but the metric compares named segments")]
    ExpectedSegments { record: usize },
}

/// A symbol that the active substitution matrix cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Symbol {} is not in the substitution matrix{}", symbol_repr(.symbol), location(.record, .segment))]
pub struct LookupError {
    pub symbol:  u8,
    pub record:  Option<usize>,
    pub segment: Option<String>,
}

impl LookupError {
    #[inline]
    #[must_use]
    pub fn new(symbol: u8) -> Self {
        LookupError {
            symbol,
            record: None,
            segment: None,
        }
    }

    /// Attaches the index of the record the symbol came from.
    #[inline]
    #[must_use]
    pub fn in_record(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    /// Attaches the name of the segment the symbol came from.
    #[inline]
    #[must_use]
    pub fn in_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }
}

fn symbol_repr(symbol: &u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", char::from(*symbol))
    } else {
        format!("0x{symbol:02X}")
    }
}

fn location(record: &Option<usize>, segment: &Option<String>) -> String {
    match (record, segment) {
        (Some(r), Some(s)) => format!(" (record {r}, segment '{s}')"),
        (Some(r), None) => format!(" (record {r})"),
        (None, Some(s)) => format!(" (segment '{s}')"),
        (None, None) => String::new(),
    }
}

/// Any failure surfaced by a distance computation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DistanceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("The computation was cancelled before all pairs were computed")]
    Cancelled,
}
