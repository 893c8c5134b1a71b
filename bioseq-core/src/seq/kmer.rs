use crate::error::{BioError, BioResult};
use crate::seq::index::Selection;
use crate::seq::kind::SeqKind;
use crate::seq::sequence::Seq;

use std::collections::HashMap;
use std::iter::FusedIterator;

/// Length-`k` windows of a sequence, produced lazily.
pub struct Kmers<K: SeqKind> {
    seq: Seq<K>,
    k: usize,
    step: usize,
    next: usize,
    remaining: usize,
}

impl<K: SeqKind> Iterator for Kmers<K> {
    type Item = Seq<K>;

    fn next(&mut self) -> Option<Seq<K>> {
        if self.remaining == 0 {
            return None;
        }
        let start = self.next;
        self.next += self.step;
        self.remaining -= 1;
        Some(self.seq.select(Selection::Contiguous(start..start + self.k)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: SeqKind> ExactSizeIterator for Kmers<K> {}

impl<K: SeqKind> FusedIterator for Kmers<K> {}

/// Relative k-mer abundances; unseen k-mers have frequency 0.0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelativeFrequencies {
    freqs: HashMap<String, f64>,
}

impl RelativeFrequencies {
    pub fn get(&self, kmer: &str) -> f64 {
        self.freqs.get(kmer).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.freqs.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn into_map(self) -> HashMap<String, f64> {
        self.freqs
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum KmerFrequencies {
    Counts(HashMap<String, usize>),
    Relative(RelativeFrequencies),
}

impl KmerFrequencies {
    pub fn counts(&self) -> Option<&HashMap<String, usize>> {
        match self {
            KmerFrequencies::Counts(counts) => Some(counts),
            KmerFrequencies::Relative(_) => None,
        }
    }

    pub fn relative(&self) -> Option<&RelativeFrequencies> {
        match self {
            KmerFrequencies::Counts(_) => None,
            KmerFrequencies::Relative(freqs) => Some(freqs),
        }
    }
}

/// Number of windows of width `k` taken every `step` positions.
#[inline]
fn window_count(len: usize, k: usize, step: usize) -> usize {
    if len < k {
        0
    } else {
        (len - k) / step + 1
    }
}

impl<K: SeqKind> Seq<K> {
    /// Windows of width `k`, every position when `overlap`, else every `k`.
    pub fn kmers(&self, k: usize, overlap: bool) -> BioResult<Kmers<K>> {
        if k < 1 {
            return Err(BioError::InvalidArgument {
                msg: "k must be greater than 0".to_string(),
            });
        }
        let step = if overlap { 1 } else { k };
        Ok(Kmers {
            seq: self.clone(),
            k,
            step,
            next: 0,
            remaining: window_count(self.len(), k, step),
        })
    }

    pub fn kmer_frequencies(
        &self,
        k: usize,
        overlap: bool,
        relative: bool,
    ) -> BioResult<KmerFrequencies> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for kmer in self.kmers(k, overlap)? {
            *counts.entry(kmer.to_text()).or_insert(0) += 1;
        }

        if !relative {
            return Ok(KmerFrequencies::Counts(counts));
        }

        let total = if overlap {
            self.len().saturating_sub(k) + 1
        } else {
            self.len() / k
        };
        let freqs = counts
            .into_iter()
            .map(|(kmer, count)| (kmer, count as f64 / total as f64))
            .collect();
        Ok(KmerFrequencies::Relative(RelativeFrequencies { freqs }))
    }
}

#[cfg(test)]
mod tests {
    use crate::seq::sequence::Sequence;

    use super::*;

    fn texts<K: SeqKind>(kmers: Kmers<K>) -> Vec<String> {
        kmers.map(|s| s.to_string()).collect()
    }

    #[test]
    fn overlapping_and_disjoint_windows() {
        let s = Sequence::new("ACACGACGTT").unwrap();
        assert_eq!(texts(s.kmers(4, false).unwrap()), vec!["ACAC", "GACG"]);
        assert_eq!(
            texts(s.kmers(3, true).unwrap()),
            vec!["ACA", "CAC", "ACG", "CGA", "GAC", "ACG", "CGT", "GTT"]
        );
    }

    #[test]
    fn short_sequence_has_no_kmers() {
        let s = Sequence::new("AC").unwrap();
        assert_eq!(s.kmers(3, true).unwrap().count(), 0);
        assert_eq!(s.kmers(3, false).unwrap().len(), 0);
        let freqs = s.kmer_frequencies(3, true, true).unwrap();
        assert!(freqs.relative().unwrap().is_empty());
    }

    #[test]
    fn rejects_zero_width() {
        let s = Sequence::new("ACGT").unwrap();
        assert!(matches!(
            s.kmers(0, true),
            Err(BioError::InvalidArgument { .. })
        ));
        assert!(s.kmer_frequencies(0, false, false).is_err());
    }

    #[test]
    fn kmers_keep_metadata_and_quality() {
        let s = Sequence::builder("ACGT")
            .id("q")
            .quality(vec![1i64, 2, 3, 4])
            .build()
            .unwrap();
        let second = s.kmers(2, false).unwrap().nth(1).unwrap();
        assert_eq!(second.to_string(), "GT");
        assert_eq!(second.id(), "q");
        assert_eq!(second.quality(), Some(&[3, 4][..]));
    }

    #[test]
    fn each_call_restarts() {
        let s = Sequence::new("ACGT").unwrap();
        let mut first = s.kmers(2, true).unwrap();
        first.next();
        assert_eq!(first.len(), 2);
        assert_eq!(s.kmers(2, true).unwrap().len(), 3);
    }

    #[test]
    fn frequency_counts() {
        let s = Sequence::new("ACACATTTATTA").unwrap();
        let freqs = s.kmer_frequencies(3, false, false).unwrap();
        let counts = freqs.counts().unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["ACA"], 1);
        assert_eq!(counts["CAT"], 1);
        assert_eq!(counts["TTA"], 2);
        assert!(!counts.contains_key("GGG"));
    }

    #[test]
    fn relative_frequencies() {
        let s = Sequence::new("ACACATTTATTA").unwrap();
        let freqs = s.kmer_frequencies(3, false, true).unwrap();
        let rel = freqs.relative().unwrap();
        assert_eq!(rel.get("ACA"), 0.25);
        assert_eq!(rel.get("CAT"), 0.25);
        assert_eq!(rel.get("TTA"), 0.5);
        assert_eq!(rel.get("GGG"), 0.0);

        let overlapping = s.kmer_frequencies(3, true, true).unwrap();
        let total: f64 = overlapping.relative().unwrap().iter().map(|(_, f)| f).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
