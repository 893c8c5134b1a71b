use crate::error::{BioError, BioResult};
use crate::seq::kind::SeqKind;
use crate::seq::sequence::{Seq, Sequence};

use memchr::memmem;
use std::any::TypeId;

/// The other side of a comparison or search, reduced to its symbols.
#[derive(Clone, Debug)]
pub enum Operand<'a> {
    Borrowed(&'a [u8]),
    Wrapped(Sequence),
}

impl Operand<'_> {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Operand::Borrowed(bytes) => bytes,
            Operand::Wrapped(seq) => seq.as_bytes(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Values that can be used against a `Seq<K>`.
///
/// Sequences must be of the same kind `K`; anything else is wrapped into a
/// generic [`Sequence`] rather than `K`, so raw text is never held to `K`'s
/// alphabet.
pub trait IntoOperand<'a, K: SeqKind> {
    /// Number of symbols, known before conversion.
    fn symbol_len(&self) -> usize;

    fn into_operand(self, method: &'static str) -> BioResult<Operand<'a>>;
}

impl<'a, K: SeqKind, K2: SeqKind> IntoOperand<'a, K> for &'a Seq<K2> {
    fn symbol_len(&self) -> usize {
        self.len()
    }

    fn into_operand(self, method: &'static str) -> BioResult<Operand<'a>> {
        if TypeId::of::<K>() != TypeId::of::<K2>() {
            return Err(BioError::TypeMismatch {
                left: K::NAME,
                right: K2::NAME,
                method,
            });
        }
        Ok(Operand::Borrowed(self.as_bytes()))
    }
}

impl<'a, K: SeqKind> IntoOperand<'a, K> for &'a str {
    fn symbol_len(&self) -> usize {
        self.chars().count()
    }

    #[inline]
    fn into_operand(self, _method: &'static str) -> BioResult<Operand<'a>> {
        Ok(Operand::Wrapped(Sequence::new(self)?))
    }
}

impl<'a, K: SeqKind> IntoOperand<'a, K> for &'a String {
    fn symbol_len(&self) -> usize {
        self.chars().count()
    }

    #[inline]
    fn into_operand(self, method: &'static str) -> BioResult<Operand<'a>> {
        <&str as IntoOperand<'a, K>>::into_operand(self.as_str(), method)
    }
}

// Any byte string is a valid generic sequence, so it is used in place.
impl<'a, K: SeqKind> IntoOperand<'a, K> for &'a [u8] {
    fn symbol_len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn into_operand(self, _method: &'static str) -> BioResult<Operand<'a>> {
        Ok(Operand::Borrowed(self))
    }
}

impl<'a, K: SeqKind, const N: usize> IntoOperand<'a, K> for &'a [u8; N] {
    fn symbol_len(&self) -> usize {
        N
    }

    #[inline]
    fn into_operand(self, _method: &'static str) -> BioResult<Operand<'a>> {
        Ok(Operand::Borrowed(self.as_slice()))
    }
}

impl<'a, K: SeqKind> IntoOperand<'a, K> for Vec<u8> {
    fn symbol_len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn into_operand(self, _method: &'static str) -> BioResult<Operand<'a>> {
        Ok(Operand::Wrapped(Sequence::new(self)?))
    }
}

impl<'a, K: SeqKind> IntoOperand<'a, K> for u8 {
    fn symbol_len(&self) -> usize {
        1
    }

    #[inline]
    fn into_operand(self, _method: &'static str) -> BioResult<Operand<'a>> {
        Ok(Operand::Wrapped(Sequence::new(self)?))
    }
}

impl<'a, K: SeqKind> IntoOperand<'a, K> for char {
    fn symbol_len(&self) -> usize {
        1
    }

    #[inline]
    fn into_operand(self, _method: &'static str) -> BioResult<Operand<'a>> {
        Ok(Operand::Wrapped(Sequence::new(self)?))
    }
}

/// Clamp optional signed `start`/`end` offsets against `len`.
///
/// Negative offsets count from the end. `end` is clamped into `0..=len`;
/// `start` is only clamped from below, so a window past the end is
/// detectable as `start > len`.
pub fn window(len: usize, start: Option<isize>, end: Option<isize>) -> (usize, usize) {
    let len_i = len as isize;
    let adjust = |x: isize| if x < 0 { (x + len_i).max(0) } else { x };
    let end = end.map_or(len, |e| (adjust(e) as usize).min(len));
    let start = start.map_or(0, |s| adjust(s) as usize);
    (start, end)
}

pub fn count(hay: &[u8], pat: &[u8], start: usize, end: usize) -> usize {
    debug_assert!(!pat.is_empty());
    if start > end || end > hay.len() {
        return 0;
    }
    count_nonoverlapping(&hay[start..end], pat)
}

pub fn find(hay: &[u8], pat: &[u8], start: usize, end: usize) -> Option<usize> {
    if start > end || end > hay.len() {
        return None;
    }
    if pat.is_empty() {
        return Some(start);
    }
    if pat.len() > end - start {
        return None;
    }
    memmem::find(&hay[start..end], pat).map(|i| start + i)
}

#[inline]
pub fn contains(hay: &[u8], pat: &[u8]) -> bool {
    if pat.is_empty() {
        return true;
    }
    memmem::find(hay, pat).is_some()
}

fn count_nonoverlapping(hay: &[u8], needle: &[u8]) -> usize {
    if needle.len() == 1 {
        return memchr::memchr_iter(needle[0], hay).count();
    }

    let finder = memmem::Finder::new(needle);
    let mut count = 0usize;
    let mut pos = 0usize;

    while pos <= hay.len() {
        match finder.find(&hay[pos..]) {
            Some(i) => {
                count += 1;
                pos += i + needle.len();
            }
            None => break,
        }
    }

    count
}
