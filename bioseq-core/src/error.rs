use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioError {
    #[error("cannot use {left} and {right} together with `{method}`")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
        method: &'static str,
    },

    #[error("quality scores have {ndim} dimension(s); quality scores must be 1-D")]
    Dimension { ndim: usize },

    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("quality scores must be greater than or equal to zero (found {val} at position {pos})")]
    NegativeValue { val: i64, pos: usize },

    #[error("quality score out of range: {val} at position {pos} (expected 0..={max})", max = u32::MAX)]
    QualityOutOfRange { val: i64, pos: usize },

    #[error("cannot encode character '{ch}' at position {pos} as a single-byte symbol")]
    Encoding { ch: char, pos: usize },

    #[error("invalid symbol '{ch}' at position {pos} for {kind}")]
    InvalidSymbol {
        ch: char,
        pos: usize,
        kind: &'static str,
    },

    #[error("cannot index with {msg}")]
    InvalidIndex { msg: String },

    #[error("index {index} is out of bounds for sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("`count` is not defined for empty subsequences")]
    EmptyQuery,

    #[error("'{needle}' is not present in the sequence")]
    NotFound { needle: String },

    #[error("invalid argument: {msg}")]
    InvalidArgument { msg: String },

    #[error("invalid regular expression: {0}")]
    Pattern(#[from] regex::Error),
}

pub type BioResult<T> = Result<T, BioError>;
