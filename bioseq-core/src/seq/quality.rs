use crate::error::{BioError, BioResult};

use std::ops::Range;
use std::sync::Arc;

/// Frozen per-position quality scores.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quality {
    scores: Arc<[u32]>,
}

impl Quality {
    pub fn as_slice(&self) -> &[u32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        Self {
            scores: Arc::from(&self.scores[range]),
        }
    }

    pub(crate) fn gather(&self, positions: &[usize]) -> Self {
        Self {
            scores: positions.iter().map(|&i| self.scores[i]).collect(),
        }
    }
}

/// Quality scores as supplied to a constructor, before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum QualityInput {
    Scalar(i64),
    Vector(Vec<i64>),
    /// Row-major nested scores; never one-dimensional.
    Nested(Vec<Vec<i64>>),
    Frozen(Quality),
}

impl QualityInput {
    pub(crate) fn normalize(self, expected: usize) -> BioResult<Quality> {
        let values = match self {
            QualityInput::Frozen(quality) => {
                check_len(quality.len(), expected)?;
                return Ok(quality);
            }
            QualityInput::Scalar(val) => vec![val],
            QualityInput::Vector(values) => values,
            QualityInput::Nested(_) => return Err(BioError::Dimension { ndim: 2 }),
        };

        check_len(values.len(), expected)?;

        let scores = values
            .iter()
            .enumerate()
            .map(|(pos, &val)| {
                if val < 0 {
                    return Err(BioError::NegativeValue { val, pos });
                }
                u32::try_from(val).map_err(|_| BioError::QualityOutOfRange { val, pos })
            })
            .collect::<BioResult<Arc<[u32]>>>()?;

        Ok(Quality { scores })
    }
}

#[inline]
fn check_len(actual: usize, expected: usize) -> BioResult<()> {
    if actual != expected {
        return Err(BioError::LengthMismatch {
            what: "number of quality scores",
            expected,
            actual,
        });
    }
    Ok(())
}

impl From<i64> for QualityInput {
    fn from(val: i64) -> Self {
        QualityInput::Scalar(val)
    }
}

impl From<Vec<i64>> for QualityInput {
    fn from(values: Vec<i64>) -> Self {
        QualityInput::Vector(values)
    }
}

impl From<&[i64]> for QualityInput {
    fn from(values: &[i64]) -> Self {
        QualityInput::Vector(values.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for QualityInput {
    fn from(values: [i64; N]) -> Self {
        QualityInput::Vector(values.to_vec())
    }
}

impl From<Vec<u32>> for QualityInput {
    fn from(values: Vec<u32>) -> Self {
        QualityInput::Vector(values.into_iter().map(i64::from).collect())
    }
}

impl From<&[u32]> for QualityInput {
    fn from(values: &[u32]) -> Self {
        QualityInput::Vector(values.iter().map(|&v| i64::from(v)).collect())
    }
}

/// Raw phred bytes (already offset-decoded).
impl From<&[u8]> for QualityInput {
    fn from(values: &[u8]) -> Self {
        QualityInput::Vector(values.iter().map(|&v| i64::from(v)).collect())
    }
}

impl From<Vec<Vec<i64>>> for QualityInput {
    fn from(rows: Vec<Vec<i64>>) -> Self {
        QualityInput::Nested(rows)
    }
}

impl From<Quality> for QualityInput {
    fn from(quality: Quality) -> Self {
        QualityInput::Frozen(quality)
    }
}
