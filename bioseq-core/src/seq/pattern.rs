use crate::error::BioResult;
use crate::seq::index::SeqIndex;
use crate::seq::kind::SeqKind;
use crate::seq::sequence::Seq;
use crate::seq::store::ByteStore;

use regex::bytes::{CaptureLocations, Regex, RegexBuilder};
use std::iter::FusedIterator;
use std::ops::Range;

/// Patterns accepted by [`Seq::slices_from_regex`].
pub trait IntoRegex {
    fn into_regex(self) -> BioResult<Regex>;
}

impl IntoRegex for &str {
    fn into_regex(self) -> BioResult<Regex> {
        seq_debug!("compiling pattern {:?}", self);
        // symbols are bytes, not UTF-8 code points
        Ok(RegexBuilder::new(self).unicode(false).build()?)
    }
}

impl IntoRegex for String {
    fn into_regex(self) -> BioResult<Regex> {
        self.as_str().into_regex()
    }
}

impl IntoRegex for Regex {
    fn into_regex(self) -> BioResult<Regex> {
        Ok(self)
    }
}

impl IntoRegex for &Regex {
    fn into_regex(self) -> BioResult<Regex> {
        Ok(self.clone())
    }
}

/// Position in the original sequence of the `local`-th included symbol.
#[inline]
pub fn remap(local: usize, included: &[usize]) -> Option<usize> {
    included.get(local).copied()
}

/// Map a group span found in the included symbols back to original
/// coordinates. `total` is the original length; it anchors spans that fall
/// past the last included symbol.
pub fn remap_group(start: usize, end: usize, included: &[usize], total: usize) -> Range<usize> {
    let first = remap(start, included).unwrap_or(total);
    if end <= start {
        return first..first;
    }
    let last = remap(end - 1, included).map_or(total, |p| p + 1);
    first..last
}

/// Full-span form of `regex`, used to look for a non-empty match at an
/// offset that has just produced an empty one.
fn anchored(regex: &Regex) -> BioResult<Regex> {
    let wrapped = format!(r"\A(?:{})\z", regex.as_str());
    match RegexBuilder::new(&wrapped).unicode(false).build() {
        Ok(full) => Ok(full),
        Err(_) => Ok(Regex::new(&wrapped)?),
    }
}

/// Capturing-group spans of successive regex matches, as ranges into the
/// searched sequence.
///
/// An empty match is followed by a retry at the same offset that only
/// accepts a non-empty match (the shortest one), then the search moves on.
pub struct RegexSlices {
    regex: Regex,
    full: Regex,
    hay: ByteStore,
    /// `None` when nothing is excluded and offsets map to themselves.
    included: Option<Vec<usize>>,
    total: usize,
    locs: CaptureLocations,
    full_locs: CaptureLocations,
    /// Offset of the span `full_locs` was read from, when it holds the
    /// current match.
    retried_at: Option<usize>,
    group: usize,
    pos: usize,
    must_advance: bool,
}

impl RegexSlices {
    fn new(
        regex: Regex,
        hay: ByteStore,
        included: Option<Vec<usize>>,
        total: usize,
    ) -> BioResult<Self> {
        let full = anchored(&regex)?;
        let locs = regex.capture_locations();
        let full_locs = full.capture_locations();
        let group = locs.len();
        Ok(Self {
            regex,
            full,
            hay,
            included,
            total,
            locs,
            full_locs,
            retried_at: None,
            group,
            pos: 0,
            must_advance: false,
        })
    }

    /// Move to the next match; false when the haystack is exhausted.
    fn advance(&mut self) -> bool {
        let hay = self.hay.as_slice();
        loop {
            if self.pos > hay.len() {
                return false;
            }
            if self.must_advance {
                self.must_advance = false;
                let at = self.pos;
                let found = (at + 1..=hay.len()).find(|&end| {
                    self.full
                        .captures_read(&mut self.full_locs, &hay[at..end])
                        .is_some()
                });
                match found {
                    Some(end) => {
                        self.retried_at = Some(at);
                        self.pos = end;
                        self.group = 1;
                        return true;
                    }
                    None => {
                        self.pos = at + 1;
                        continue;
                    }
                }
            }
            let Some(m) = self.regex.captures_read_at(&mut self.locs, hay, self.pos) else {
                self.pos = hay.len() + 1;
                return false;
            };
            self.must_advance = m.start() == m.end();
            self.retried_at = None;
            self.pos = m.end();
            self.group = 1;
            return true;
        }
    }

    fn span(&self, group: usize) -> Option<(usize, usize)> {
        match self.retried_at {
            None => self.locs.get(group),
            Some(at) => self
                .full_locs
                .get(group)
                .map(|(start, end)| (start + at, end + at)),
        }
    }
}

impl Iterator for RegexSlices {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        loop {
            while self.group < self.locs.len() {
                let g = self.group;
                self.group += 1;
                let Some((start, end)) = self.span(g) else {
                    continue;
                };
                return Some(match &self.included {
                    None => start..end,
                    Some(included) => remap_group(start, end, included, self.total),
                });
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

impl FusedIterator for RegexSlices {}

impl<K: SeqKind> Seq<K> {
    /// Spans of every capturing group of every match of `pattern`.
    ///
    /// With `exclude`, masked positions are removed before matching and the
    /// spans are mapped back to positions of `self`, so a span may cover
    /// excluded symbols. Whole-match spans (group 0) are not reported.
    pub fn slices_from_regex<P: IntoRegex>(
        &self,
        pattern: P,
        exclude: Option<&[bool]>,
    ) -> BioResult<RegexSlices> {
        let regex = pattern.into_regex()?;
        let Some(exclude) = exclude else {
            return RegexSlices::new(regex, self.store().clone(), None, self.len());
        };

        let include: Vec<bool> = exclude.iter().map(|&skip| !skip).collect();
        let kept = self.get(SeqIndex::Mask(include))?;
        let included = exclude
            .iter()
            .enumerate()
            .filter_map(|(i, &skip)| (!skip).then_some(i))
            .collect();
        RegexSlices::new(regex, kept.store().clone(), Some(included), self.len())
    }
}
