use crate::error::{BioError, BioResult};
use crate::seq::bytes::{self, IntoOperand, Operand};
use crate::seq::kind::SeqKind;
use crate::seq::sequence::Seq;

use std::any::TypeId;

/// Parts of a sequence that [`Seq::equals`] can be told to skip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    Type,
    Id,
    Description,
    Quality,
    Sequence,
}

/// Fraction of positions at which `a` and `b` differ.
///
/// Both slices must have the same length; two empty slices are at distance
/// 0.0.
pub fn hamming(a: &[u8], b: &[u8]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    let diffs = a.iter().zip(b).filter(|(x, y)| x != y).count();
    diffs as f64 / a.len() as f64
}

impl<K: SeqKind> Seq<K> {
    /// Compare with `other`, skipping the features listed in `ignore`.
    ///
    /// Checks run from cheapest to most expensive: kind, id, description,
    /// quality, symbols.
    pub fn equals<K2: SeqKind>(&self, other: &Seq<K2>, ignore: &[Feature]) -> bool {
        let checked = |feature: Feature| !ignore.contains(&feature);

        if checked(Feature::Type) && TypeId::of::<K>() != TypeId::of::<K2>() {
            return false;
        }
        if checked(Feature::Id) && self.id() != other.id() {
            return false;
        }
        if checked(Feature::Description) && self.description() != other.description() {
            return false;
        }
        if checked(Feature::Quality) && self.quality() != other.quality() {
            return false;
        }
        if checked(Feature::Sequence) && self.as_bytes() != other.as_bytes() {
            return false;
        }
        true
    }

    pub fn contains<'a, O>(&self, sub: O) -> BioResult<bool>
    where
        O: IntoOperand<'a, K>,
    {
        let sub = sub.into_operand("contains")?;
        Ok(bytes::contains(self.as_bytes(), sub.as_bytes()))
    }

    /// Non-overlapping occurrences of `sub` within `[start, end)`.
    pub fn count<'a, O>(&self, sub: O, start: Option<isize>, end: Option<isize>) -> BioResult<usize>
    where
        O: IntoOperand<'a, K>,
    {
        if sub.symbol_len() == 0 {
            return Err(BioError::EmptyQuery);
        }
        let sub = sub.into_operand("count")?;
        let (start, end) = bytes::window(self.len(), start, end);
        Ok(bytes::count(self.as_bytes(), sub.as_bytes(), start, end))
    }

    /// Offset of the first occurrence of `sub` within `[start, end)`.
    pub fn index<'a, O>(&self, sub: O, start: Option<isize>, end: Option<isize>) -> BioResult<usize>
    where
        O: IntoOperand<'a, K>,
    {
        let sub = sub.into_operand("index")?;
        let (start, end) = bytes::window(self.len(), start, end);
        bytes::find(self.as_bytes(), sub.as_bytes(), start, end).ok_or_else(|| {
            BioError::NotFound {
                needle: sub.as_bytes().iter().map(|&b| b as char).collect(),
            }
        })
    }

    /// Hamming distance to `other` as a fraction of positions.
    pub fn distance<'a, O>(&self, other: O) -> BioResult<f64>
    where
        O: IntoOperand<'a, K>,
    {
        let other = other.into_operand("distance")?;
        self.check_paired_len(&other, "hamming distance operands")?;
        Ok(hamming(self.as_bytes(), other.as_bytes()))
    }

    /// Distance to `other` under a caller-supplied metric.
    ///
    /// The metric receives both symbol arrays; lengths are not checked.
    pub fn distance_with<'a, O, F>(&self, other: O, metric: F) -> BioResult<f64>
    where
        O: IntoOperand<'a, K>,
        F: Fn(&[u8], &[u8]) -> f64,
    {
        let other = other.into_operand("distance")?;
        Ok(metric(self.as_bytes(), other.as_bytes()))
    }

    pub fn matches<'a, O>(&self, other: O) -> BioResult<Vec<bool>>
    where
        O: IntoOperand<'a, K>,
    {
        let other = other.into_operand("matches/mismatches")?;
        self.check_paired_len(&other, "match/mismatch operands")?;
        Ok(self
            .as_bytes()
            .iter()
            .zip(other.as_bytes())
            .map(|(a, b)| a == b)
            .collect())
    }

    pub fn mismatches<'a, O>(&self, other: O) -> BioResult<Vec<bool>>
    where
        O: IntoOperand<'a, K>,
    {
        Ok(self.matches(other)?.into_iter().map(|m| !m).collect())
    }

    pub fn match_count<'a, O>(&self, other: O) -> BioResult<usize>
    where
        O: IntoOperand<'a, K>,
    {
        Ok(self.matches(other)?.into_iter().filter(|&m| m).count())
    }

    pub fn mismatch_count<'a, O>(&self, other: O) -> BioResult<usize>
    where
        O: IntoOperand<'a, K>,
    {
        Ok(self.mismatches(other)?.into_iter().filter(|&m| m).count())
    }

    /// Matching positions as a count, or as a fraction when `relative`.
    pub fn match_frequency<'a, O>(&self, other: O, relative: bool) -> BioResult<f64>
    where
        O: IntoOperand<'a, K>,
    {
        let hits = self.match_count(other)?;
        Ok(self.tally(hits, relative))
    }

    /// Differing positions as a count, or as a fraction when `relative`.
    pub fn mismatch_frequency<'a, O>(&self, other: O, relative: bool) -> BioResult<f64>
    where
        O: IntoOperand<'a, K>,
    {
        let hits = self.mismatch_count(other)?;
        Ok(self.tally(hits, relative))
    }

    #[inline]
    fn tally(&self, hits: usize, relative: bool) -> f64 {
        match (relative, self.len()) {
            (false, _) => hits as f64,
            (true, 0) => 0.0,
            (true, n) => hits as f64 / n as f64,
        }
    }

    fn check_paired_len(&self, other: &Operand<'_>, what: &'static str) -> BioResult<()> {
        if self.len() != other.len() {
            return Err(BioError::LengthMismatch {
                what,
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }
}

impl<K: SeqKind> PartialEq for Seq<K> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &[])
    }
}

impl<K: SeqKind> Eq for Seq<K> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::kind::{Generic, SeqKind};
    use crate::seq::sequence::Sequence;

    struct Rna;

    impl SeqKind for Rna {
        const NAME: &'static str = "RNA";

        fn validate(bytes: &[u8]) -> BioResult<()> {
            for (pos, &b) in bytes.iter().enumerate() {
                if !b"ACGU".contains(&b) {
                    return Err(BioError::InvalidSymbol {
                        ch: b as char,
                        pos,
                        kind: Self::NAME,
                    });
                }
            }
            Ok(())
        }
    }

    fn seq(s: &str) -> Sequence {
        Sequence::new(s).unwrap()
    }

    #[test]
    fn equals_checks_every_feature() {
        let s = seq("GGUCGUGAAGGA");
        let t = seq("GGUCGUGAAGGA");
        assert!(s.equals(&t, &[]));
        assert_eq!(s, t);

        let u = seq("GGUCGUGACCGA");
        assert_ne!(u, t);

        let v = Sequence::builder("GGUCGUGACCGA")
            .id("v")
            .quality(vec![1i64, 5, 3, 3, 2, 42, 100, 9, 10, 55, 42, 42])
            .build()
            .unwrap();
        assert!(!u.equals(&v, &[]));
        assert!(u.equals(&v, &[Feature::Quality, Feature::Id]));
        assert!(!u.equals(&v, &[Feature::Quality]));
    }

    #[test]
    fn equals_treats_missing_quality_as_distinct() {
        let bare = seq("AC");
        let scored = Sequence::builder("AC").quality(vec![1i64, 2]).build().unwrap();
        assert_ne!(bare, scored);
        assert!(bare.equals(&scored, &[Feature::Quality]));
    }

    #[test]
    fn equals_compares_kinds() {
        let generic = seq("ACGU");
        let rna = Seq::<Rna>::new("ACGU").unwrap();
        assert!(!generic.equals(&rna, &[]));
        assert!(generic.equals(&rna, &[Feature::Type]));
        assert!(rna.equals(&Seq::<Rna>::new("ACGU").unwrap(), &[]));
    }

    #[test]
    fn contains_subsequences() {
        let s = seq("GGUCGUGAAGGA");
        assert!(s.contains("GGU").unwrap());
        assert!(!s.contains("CCC").unwrap());
        assert!(s.contains(&seq("AAGG")).unwrap());
        assert!(s.contains(b"GA").unwrap());
        assert!(s.contains('U').unwrap());
    }

    #[test]
    fn munging_rejects_other_kinds() {
        let s = seq("ACGU");
        let rna = Seq::<Rna>::new("ACGU").unwrap();
        let err = s.contains(&rna).unwrap_err();
        assert!(matches!(
            err,
            BioError::TypeMismatch {
                left: "Sequence",
                right: "RNA",
                method: "contains",
            }
        ));
        assert!(matches!(rna.distance(&s), Err(BioError::TypeMismatch { .. })));
    }

    #[test]
    fn raw_operands_skip_receiver_validation() {
        let rna = Seq::<Rna>::new("ACGU").unwrap();
        // 'T' is outside the RNA alphabet but raw text is compared as generic
        assert!(!rna.contains("T").unwrap());
        assert_eq!(rna.mismatch_count("ACGT").unwrap(), 1);
    }

    #[test]
    fn count_occurrences() {
        let s = seq("GGUCG");
        assert_eq!(s.count("G", None, None).unwrap(), 3);
        assert_eq!(s.count("GG", None, None).unwrap(), 1);
        assert_eq!(s.count("T", None, None).unwrap(), 0);
        assert_eq!(s.count("G", Some(2), None).unwrap(), 1);
        assert_eq!(s.count("G", Some(-2), Some(-1)).unwrap(), 0);
        assert_eq!(seq("AAAAA").count("AA", None, None).unwrap(), 2);
    }

    #[test]
    fn count_rejects_empty_query() {
        let s = seq("ACGT");
        assert!(matches!(s.count("", None, None), Err(BioError::EmptyQuery)));
        let rna = Seq::<Rna>::new("").unwrap();
        // emptiness is checked before the kind
        assert!(matches!(s.count(&rna, None, None), Err(BioError::EmptyQuery)));
    }

    #[test]
    fn index_finds_first_occurrence() {
        let s = seq("ACACGACGTT");
        assert_eq!(s.index("ACG", None, None).unwrap(), 2);
        assert_eq!(s.index("ACG", Some(3), None).unwrap(), 5);
        assert_eq!(s.index("", Some(4), None).unwrap(), 4);
        let err = s.index("TTT", None, None).unwrap_err();
        assert!(matches!(err, BioError::NotFound { ref needle } if needle == "TTT"));
        assert!(s.index("ACG", Some(6), None).is_err());
    }

    #[test]
    fn hamming_distance() {
        let s = seq("GGUC");
        assert_eq!(s.distance("AGUC").unwrap(), 0.25);
        assert_eq!(s.distance(&seq("GGUC")).unwrap(), 0.0);
        assert_eq!(seq("").distance("").unwrap(), 0.0);
        assert!(matches!(
            s.distance("GGU"),
            Err(BioError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn custom_metric_skips_length_check() {
        let s = seq("GGUC");
        let d = s.distance_with("AG", |_, _| 0.42).unwrap();
        assert_eq!(d, 0.42);
        let d = s
            .distance_with("GG", |a, b| (a.len() - b.len()) as f64)
            .unwrap();
        assert_eq!(d, 2.0);
    }

    #[test]
    fn match_vectors_and_frequencies() {
        let s = seq("GGUC");
        let t = seq("GAUU");
        assert_eq!(s.matches(&t).unwrap(), vec![true, false, true, false]);
        assert_eq!(s.mismatches(&t).unwrap(), vec![false, true, false, true]);
        assert_eq!(s.match_count(&t).unwrap(), 2);
        assert_eq!(s.mismatch_frequency("AGUC", false).unwrap(), 1.0);
        assert_eq!(s.mismatch_frequency("AGUC", true).unwrap(), 0.25);
        assert_eq!(s.match_frequency("AGUC", false).unwrap(), 3.0);
        assert_eq!(s.match_frequency("AGUC", true).unwrap(), 0.75);
        assert!(matches!(s.matches("GG"), Err(BioError::LengthMismatch { .. })));
        assert_eq!(seq("").match_frequency("", true).unwrap(), 0.0);
    }

    #[test]
    fn hamming_helper() {
        assert_eq!(hamming(b"", b""), 0.0);
        assert_eq!(hamming(b"AAAA", b"AATT"), 0.5);
    }

    #[test]
    fn generic_kind_name() {
        assert_eq!(seq("A").kind_name(), Generic::NAME);
    }
}
