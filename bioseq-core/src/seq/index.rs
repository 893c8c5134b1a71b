use crate::error::{BioError, BioResult};

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

/// A `start:stop:step` slice with signed, clamped bounds.
///
/// Negative bounds count from the end, out-of-range bounds are clamped and a
/// negative step walks backwards (`start` then defaults to the last
/// position).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSlice {
    pub start: isize,
    pub step: isize,
    pub count: usize,
}

impl ResolvedSlice {
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |i| (self.start + i as isize * self.step) as usize)
    }

    pub fn as_range(&self) -> Option<Range<usize>> {
        if self.step != 1 {
            return None;
        }
        let start = self.start as usize;
        Some(start..start + self.count)
    }
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    pub fn full() -> Self {
        Self::default()
    }

    pub fn reversed() -> Self {
        Self::default().with_step(-1)
    }

    pub fn from_start(start: isize) -> Self {
        Self::new(Some(start), None)
    }

    pub fn to_stop(stop: isize) -> Self {
        Self::new(None, Some(stop))
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    pub fn resolve(&self, len: usize) -> BioResult<ResolvedSlice> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(BioError::InvalidIndex {
                msg: "a slice step of zero".to_string(),
            });
        }

        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };

        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });

        let count = if step > 0 && start < stop {
            (stop - start - 1) as usize / step.unsigned_abs() + 1
        } else if step < 0 && stop < start {
            (start - stop - 1) as usize / step.unsigned_abs() + 1
        } else {
            0
        };

        Ok(ResolvedSlice { start, step, count })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MixedItem {
    Slice(SliceSpec),
    Int(isize),
    Text(String),
    Bool(bool),
}

impl MixedItem {
    fn to_slice(&self) -> BioResult<SliceSpec> {
        match self {
            MixedItem::Slice(spec) => Ok(*spec),
            // [-1, -1 + 1) would be empty; keep "last element" meaning
            MixedItem::Int(-1) => Ok(SliceSpec::from_start(-1)),
            MixedItem::Int(i) => Ok(SliceSpec::new(Some(*i), Some(i.saturating_add(1)))),
            MixedItem::Text(t) => Err(BioError::InvalidIndex {
                msg: format!("an iterable containing '{t}'"),
            }),
            MixedItem::Bool(b) => Err(BioError::InvalidIndex {
                msg: format!("an iterable containing {b}"),
            }),
        }
    }
}

impl From<isize> for MixedItem {
    fn from(i: isize) -> Self {
        MixedItem::Int(i)
    }
}

impl From<SliceSpec> for MixedItem {
    fn from(spec: SliceSpec) -> Self {
        MixedItem::Slice(spec)
    }
}

impl From<Range<isize>> for MixedItem {
    fn from(r: Range<isize>) -> Self {
        MixedItem::Slice(SliceSpec::new(Some(r.start), Some(r.end)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeqIndex {
    /// Always rejected; text is not a position.
    Text(String),
    /// Always rejected; a lone boolean is not a mask.
    Bool(bool),
    /// Slices and integers, concatenated in order.
    Mixed(Vec<MixedItem>),
    /// Keep positions that are `true`; must cover the whole sequence.
    Mask(Vec<bool>),
    IndexList(Vec<isize>),
    Scalar(isize),
    Range(SliceSpec),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Selection {
    Contiguous(Range<usize>),
    Gather(Vec<usize>),
}

impl SeqIndex {
    pub(crate) fn resolve(&self, len: usize) -> BioResult<Selection> {
        match self {
            SeqIndex::Text(t) => Err(BioError::InvalidIndex {
                msg: format!("str type: '{t}'"),
            }),
            SeqIndex::Bool(b) => Err(BioError::InvalidIndex {
                msg: format!("bool type: {b}"),
            }),
            SeqIndex::Mixed(items) => resolve_mixed(items, len),
            SeqIndex::Mask(mask) => resolve_mask(mask, len),
            SeqIndex::IndexList(list) => resolve_list(list, len),
            SeqIndex::Scalar(i) => {
                let pos = wrap_position(*i, len)?;
                Ok(Selection::Contiguous(pos..pos + 1))
            }
            SeqIndex::Range(spec) => {
                let resolved = spec.resolve(len)?;
                match resolved.as_range() {
                    Some(range) => Ok(Selection::Contiguous(range)),
                    None => Ok(Selection::Gather(resolved.positions().collect())),
                }
            }
        }
    }
}

fn resolve_mixed(items: &[MixedItem], len: usize) -> BioResult<Selection> {
    if items.is_empty() {
        return Ok(Selection::Gather(Vec::new()));
    }
    let mut positions = Vec::new();
    for item in items {
        let resolved = item.to_slice()?.resolve(len)?;
        positions.extend(resolved.positions());
    }
    Ok(Selection::Gather(positions))
}

fn resolve_mask(mask: &[bool], len: usize) -> BioResult<Selection> {
    if mask.len() != len {
        return Err(BioError::LengthMismatch {
            what: "boolean index",
            expected: len,
            actual: mask.len(),
        });
    }
    let positions = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect();
    Ok(Selection::Gather(positions))
}

fn resolve_list(list: &[isize], len: usize) -> BioResult<Selection> {
    let positions = list
        .iter()
        .map(|&i| wrap_position(i, len))
        .collect::<BioResult<Vec<_>>>()?;
    Ok(Selection::Gather(positions))
}

#[inline]
fn wrap_position(index: isize, len: usize) -> BioResult<usize> {
    let pos = if index < 0 {
        index + len as isize
    } else {
        index
    };
    if pos < 0 || pos as usize >= len {
        return Err(BioError::IndexOutOfRange { index, len });
    }
    Ok(pos as usize)
}

impl From<isize> for SeqIndex {
    fn from(i: isize) -> Self {
        SeqIndex::Scalar(i)
    }
}

impl From<i32> for SeqIndex {
    fn from(i: i32) -> Self {
        SeqIndex::Scalar(i as isize)
    }
}

impl From<usize> for SeqIndex {
    fn from(i: usize) -> Self {
        SeqIndex::Scalar(isize::try_from(i).unwrap_or(isize::MAX))
    }
}

impl From<SliceSpec> for SeqIndex {
    fn from(spec: SliceSpec) -> Self {
        SeqIndex::Range(spec)
    }
}

impl From<Range<usize>> for SeqIndex {
    fn from(r: Range<usize>) -> Self {
        SeqIndex::Range(SliceSpec::new(Some(clamp_isize(r.start)), Some(clamp_isize(r.end))))
    }
}

impl From<Range<isize>> for SeqIndex {
    fn from(r: Range<isize>) -> Self {
        SeqIndex::Range(SliceSpec::new(Some(r.start), Some(r.end)))
    }
}

impl From<RangeFrom<usize>> for SeqIndex {
    fn from(r: RangeFrom<usize>) -> Self {
        SeqIndex::Range(SliceSpec::from_start(clamp_isize(r.start)))
    }
}

impl From<RangeTo<usize>> for SeqIndex {
    fn from(r: RangeTo<usize>) -> Self {
        SeqIndex::Range(SliceSpec::to_stop(clamp_isize(r.end)))
    }
}

impl From<RangeInclusive<usize>> for SeqIndex {
    fn from(r: RangeInclusive<usize>) -> Self {
        let (start, end) = r.into_inner();
        SeqIndex::Range(SliceSpec::new(
            Some(clamp_isize(start)),
            Some(clamp_isize(end).saturating_add(1)),
        ))
    }
}

impl From<RangeFull> for SeqIndex {
    fn from(_: RangeFull) -> Self {
        SeqIndex::Range(SliceSpec::full())
    }
}

impl From<Vec<bool>> for SeqIndex {
    fn from(mask: Vec<bool>) -> Self {
        SeqIndex::Mask(mask)
    }
}

impl From<&[bool]> for SeqIndex {
    fn from(mask: &[bool]) -> Self {
        SeqIndex::Mask(mask.to_vec())
    }
}

impl From<Vec<isize>> for SeqIndex {
    fn from(list: Vec<isize>) -> Self {
        SeqIndex::IndexList(list)
    }
}

impl From<&[isize]> for SeqIndex {
    fn from(list: &[isize]) -> Self {
        SeqIndex::IndexList(list.to_vec())
    }
}

impl From<Vec<MixedItem>> for SeqIndex {
    fn from(items: Vec<MixedItem>) -> Self {
        SeqIndex::Mixed(items)
    }
}

impl From<&str> for SeqIndex {
    fn from(t: &str) -> Self {
        SeqIndex::Text(t.to_string())
    }
}

impl From<bool> for SeqIndex {
    fn from(b: bool) -> Self {
        SeqIndex::Bool(b)
    }
}

#[inline]
fn clamp_isize(x: usize) -> isize {
    isize::try_from(x).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(spec: SliceSpec, len: usize) -> Vec<usize> {
        spec.resolve(len).unwrap().positions().collect()
    }

    #[test]
    fn slice_forward_and_clamped() {
        assert_eq!(positions(SliceSpec::from_start(7), 12), vec![7, 8, 9, 10, 11]);
        assert_eq!(positions(SliceSpec::new(Some(-3), None), 5), vec![2, 3, 4]);
        assert_eq!(positions(SliceSpec::new(Some(2), Some(100)), 4), vec![2, 3]);
        assert!(positions(SliceSpec::new(Some(3), Some(1)), 5).is_empty());
        assert_eq!(positions(SliceSpec::full().with_step(2), 5), vec![0, 2, 4]);
    }

    #[test]
    fn slice_backward() {
        assert_eq!(positions(SliceSpec::reversed(), 4), vec![3, 2, 1, 0]);
        assert_eq!(
            positions(SliceSpec::new(Some(3), Some(0)).with_step(-2), 5),
            vec![3, 1]
        );
        assert!(positions(SliceSpec::reversed(), 0).is_empty());
    }

    #[test]
    fn zero_step_rejected() {
        let err = SliceSpec::full().with_step(0).resolve(3).unwrap_err();
        assert!(matches!(err, BioError::InvalidIndex { .. }));
    }

    #[test]
    fn extreme_steps_take_one_position() {
        assert_eq!(positions(SliceSpec::full().with_step(isize::MIN), 4), vec![3]);
        assert_eq!(positions(SliceSpec::full().with_step(isize::MAX), 4), vec![0]);
        assert!(positions(SliceSpec::full().with_step(isize::MIN), 0).is_empty());
    }

    #[test]
    fn text_and_bool_rejected() {
        assert!(matches!(
            SeqIndex::from("A").resolve(3),
            Err(BioError::InvalidIndex { .. })
        ));
        assert!(matches!(
            SeqIndex::from(true).resolve(3),
            Err(BioError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn scalar_wraps_and_checks_bounds() {
        assert_eq!(
            SeqIndex::from(-1isize).resolve(4).unwrap(),
            Selection::Contiguous(3..4)
        );
        assert!(matches!(
            SeqIndex::from(4isize).resolve(4),
            Err(BioError::IndexOutOfRange { index: 4, len: 4 })
        ));
        assert!(SeqIndex::from(-5isize).resolve(4).is_err());
    }

    #[test]
    fn mask_must_cover_sequence() {
        assert_eq!(
            SeqIndex::from(vec![true, false, true]).resolve(3).unwrap(),
            Selection::Gather(vec![0, 2])
        );
        assert!(matches!(
            SeqIndex::from(vec![true]).resolve(3),
            Err(BioError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn index_list_keeps_order_and_duplicates() {
        assert_eq!(
            SeqIndex::from(vec![3isize, 4, 7, 0, 3]).resolve(12).unwrap(),
            Selection::Gather(vec![3, 4, 7, 0, 3])
        );
        assert_eq!(
            SeqIndex::from(Vec::<isize>::new()).resolve(12).unwrap(),
            Selection::Gather(vec![])
        );
    }

    #[test]
    fn mixed_last_element_is_open_ended() {
        let index = SeqIndex::Mixed(vec![MixedItem::Int(-1), MixedItem::Int(0)]);
        assert_eq!(index.resolve(5).unwrap(), Selection::Gather(vec![4, 0]));

        let index = SeqIndex::Mixed(vec![MixedItem::from(1isize..3), MixedItem::Int(-2)]);
        assert_eq!(index.resolve(5).unwrap(), Selection::Gather(vec![1, 2, 3]));
    }

    #[test]
    fn mixed_out_of_range_int_selects_nothing() {
        let index = SeqIndex::Mixed(vec![MixedItem::Int(10), MixedItem::Int(0)]);
        assert_eq!(index.resolve(3).unwrap(), Selection::Gather(vec![0]));
    }

    #[test]
    fn mixed_rejects_foreign_items() {
        let index = SeqIndex::Mixed(vec![MixedItem::Int(0), MixedItem::Text("x".into())]);
        assert!(matches!(index.resolve(3), Err(BioError::InvalidIndex { .. })));
        let index = SeqIndex::Mixed(vec![MixedItem::Bool(true)]);
        assert!(matches!(index.resolve(3), Err(BioError::InvalidIndex { .. })));
    }

    #[test]
    fn range_conversions() {
        assert_eq!(
            SeqIndex::from(7usize..).resolve(12).unwrap(),
            Selection::Contiguous(7..12)
        );
        assert_eq!(
            SeqIndex::from(..2usize).resolve(12).unwrap(),
            Selection::Contiguous(0..2)
        );
        assert_eq!(
            SeqIndex::from(1..=2usize).resolve(12).unwrap(),
            Selection::Contiguous(1..3)
        );
        assert_eq!(
            SeqIndex::from(..).resolve(3).unwrap(),
            Selection::Contiguous(0..3)
        );
    }
}
