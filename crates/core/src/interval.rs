//! Frame-interval algebra
//!
//! A [`FrameIntervalSet`] is an ordered sequence of closed frame ranges.
//!
//! ## Invariants
//!
//! - Every interval has `frame_start <= frame_end`
//! - Intervals are sorted ascending by `frame_start`
//! - Consecutive intervals are disjoint and non-adjacent: the next interval
//!   starts at least two frames after the previous one ends
//!
//! Every constructor normalizes its input, and every operation returns a new
//! normalized set. `{0,5}` and `{6,9}` fuse into `{0,9}`; `{0,5}` and `{7,9}`
//! stay apart.
//!
//! An empty set means "no frame restriction" for elements and element data;
//! the caller decides which reading applies.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete frame number
pub type FrameNum = u64;

/// Closed range of frames `[frame_start, frame_end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFrameInterval")]
pub struct FrameInterval {
    frame_start: FrameNum,
    frame_end: FrameNum,
}

#[derive(Deserialize)]
struct RawFrameInterval {
    frame_start: FrameNum,
    frame_end: FrameNum,
}

impl TryFrom<RawFrameInterval> for FrameInterval {
    type Error = Error;

    fn try_from(raw: RawFrameInterval) -> Result<Self> {
        FrameInterval::new(raw.frame_start, raw.frame_end)
    }
}

impl FrameInterval {
    /// Create a validated interval
    ///
    /// # Errors
    /// Returns `InvalidFrameInterval` if `start > end`.
    pub fn new(start: FrameNum, end: FrameNum) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidFrameInterval { start, end });
        }
        Ok(Self {
            frame_start: start,
            frame_end: end,
        })
    }

    /// Interval covering one frame
    pub const fn single(frame: FrameNum) -> Self {
        Self {
            frame_start: frame,
            frame_end: frame,
        }
    }

    /// First frame
    pub const fn start(&self) -> FrameNum {
        self.frame_start
    }

    /// Last frame
    pub const fn end(&self) -> FrameNum {
        self.frame_end
    }

    /// Number of frames covered
    ///
    /// Widened so that `(0, u64::MAX)` is representable.
    pub const fn len(&self) -> u128 {
        (self.frame_end - self.frame_start) as u128 + 1
    }

    /// Check if the frame lies inside this interval
    pub const fn contains(&self, frame: FrameNum) -> bool {
        self.frame_start <= frame && frame <= self.frame_end
    }

    /// Check if the two intervals overlap or touch
    fn touches(&self, next: &FrameInterval) -> bool {
        next.frame_start <= self.frame_end.saturating_add(1)
    }
}

impl fmt::Display for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.frame_start, self.frame_end)
    }
}

/// How a new interval set combines with an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetMode {
    /// Fuse the new frames into the existing coverage
    #[default]
    Union,
    /// The new frames become authoritative, discarding prior coverage
    Replace,
}

impl SetMode {
    /// Combine `existing` and `incoming` according to this mode
    pub fn apply(&self, existing: &FrameIntervalSet, incoming: &FrameIntervalSet) -> FrameIntervalSet {
        match self {
            SetMode::Union => existing.union(incoming),
            SetMode::Replace => existing.replace(incoming),
        }
    }
}

/// Normalized, ordered set of frame intervals
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FrameInterval>", into = "Vec<FrameInterval>")]
pub struct FrameIntervalSet(Vec<FrameInterval>);

impl From<Vec<FrameInterval>> for FrameIntervalSet {
    fn from(intervals: Vec<FrameInterval>) -> Self {
        Self::normalize(intervals)
    }
}

impl From<FrameIntervalSet> for Vec<FrameInterval> {
    fn from(set: FrameIntervalSet) -> Self {
        set.0
    }
}

impl FromIterator<FrameInterval> for FrameIntervalSet {
    fn from_iter<I: IntoIterator<Item = FrameInterval>>(iter: I) -> Self {
        Self::normalize(iter.into_iter().collect())
    }
}

impl FrameIntervalSet {
    /// Empty set
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Set holding a single interval
    pub fn from_interval(interval: FrameInterval) -> Self {
        Self(vec![interval])
    }

    /// Set holding a single frame
    pub fn from_frame(frame: FrameNum) -> Self {
        Self(vec![FrameInterval::single(frame)])
    }

    /// Build a set from `(start, end)` pairs, validating each one
    ///
    /// # Errors
    /// Returns `InvalidFrameInterval` for the first pair with `start > end`.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (FrameNum, FrameNum)>,
    {
        let intervals = pairs
            .into_iter()
            .map(|(start, end)| FrameInterval::new(start, end))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::normalize(intervals))
    }

    /// Build a set from individual frames, fusing consecutive ones
    pub fn from_frames<I: IntoIterator<Item = FrameNum>>(frames: I) -> Self {
        frames.into_iter().map(FrameInterval::single).collect()
    }

    /// Sort and fuse overlapping or adjacent intervals
    fn normalize(mut intervals: Vec<FrameInterval>) -> Self {
        intervals.sort_by_key(|i| (i.frame_start, i.frame_end));
        let mut fused: Vec<FrameInterval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            match fused.last_mut() {
                Some(last) if last.touches(&interval) => {
                    last.frame_end = last.frame_end.max(interval.frame_end);
                }
                _ => fused.push(interval),
            }
        }
        Self(fused)
    }

    /// Check if the set has no intervals
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of intervals in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of frames covered
    pub fn frame_count(&self) -> u128 {
        self.0.iter().map(FrameInterval::len).sum()
    }

    /// The intervals, ascending
    pub fn intervals(&self) -> &[FrameInterval] {
        &self.0
    }

    /// Intervals as `(start, end)` pairs
    pub fn to_pairs(&self) -> Vec<(FrameNum, FrameNum)> {
        self.0.iter().map(|i| (i.frame_start, i.frame_end)).collect()
    }

    /// Frames in either set
    pub fn union(&self, other: &FrameIntervalSet) -> FrameIntervalSet {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::normalize(self.0.iter().chain(other.0.iter()).copied().collect())
    }

    /// The incoming set, discarding `self`
    pub fn replace(&self, other: &FrameIntervalSet) -> FrameIntervalSet {
        other.clone()
    }

    /// Frames in both sets
    pub fn intersection(&self, other: &FrameIntervalSet) -> FrameIntervalSet {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let lo = a[i].frame_start.max(b[j].frame_start);
            let hi = a[i].frame_end.min(b[j].frame_end);
            if lo <= hi {
                out.push(FrameInterval {
                    frame_start: lo,
                    frame_end: hi,
                });
            }
            if a[i].frame_end < b[j].frame_end {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self(out)
    }

    /// Frames in `self` that are not in `other`
    pub fn difference(&self, other: &FrameIntervalSet) -> FrameIntervalSet {
        let cut = &other.0;
        let mut out = Vec::new();
        let mut j = 0;
        for interval in &self.0 {
            let mut start = interval.frame_start;
            let end = interval.frame_end;
            while j < cut.len() && cut[j].frame_end < start {
                j += 1;
            }
            let mut covered = false;
            let mut k = j;
            while k < cut.len() && cut[k].frame_start <= end {
                let c = cut[k];
                if c.frame_start > start {
                    out.push(FrameInterval {
                        frame_start: start,
                        frame_end: c.frame_start - 1,
                    });
                }
                if c.frame_end >= end {
                    covered = true;
                    break;
                }
                start = c.frame_end + 1;
                k += 1;
            }
            if !covered {
                out.push(FrameInterval {
                    frame_start: start,
                    frame_end: end,
                });
            }
        }
        Self(out)
    }

    /// Check if the frame is covered
    pub fn contains_frame(&self, frame: FrameNum) -> bool {
        let idx = self.0.partition_point(|i| i.frame_end < frame);
        self.0.get(idx).map_or(false, |i| i.frame_start <= frame)
    }

    /// Check if every frame of `other` is covered by `self`
    pub fn contains(&self, other: &FrameIntervalSet) -> bool {
        other.difference(self).is_empty()
    }

    /// Check if the sets share at least one frame
    pub fn overlaps(&self, other: &FrameIntervalSet) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Smallest single interval covering the whole set
    pub fn outer(&self) -> Option<FrameInterval> {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => Some(FrameInterval {
                frame_start: first.frame_start,
                frame_end: last.frame_end,
            }),
            _ => None,
        }
    }

    /// Lazily iterate over every covered frame, ascending
    ///
    /// Meant for small deltas; do not expand very large ranges.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            intervals: &self.0,
            index: 0,
            next: self.0.first().map(|i| i.frame_start),
        }
    }

    /// Remove a single frame, splitting an interval if needed
    pub fn remove_frame(&mut self, frame: FrameNum) {
        *self = self.difference(&FrameIntervalSet::from_frame(frame));
    }
}

impl fmt::Display for FrameIntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (n, interval) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
        }
        write!(f, "]")
    }
}

/// Iterator over the frames of a [`FrameIntervalSet`]
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    intervals: &'a [FrameInterval],
    index: usize,
    next: Option<FrameNum>,
}

impl Iterator for Frames<'_> {
    type Item = FrameNum;

    fn next(&mut self) -> Option<FrameNum> {
        let frame = self.next?;
        let current = self.intervals[self.index];
        self.next = if frame < current.frame_end {
            Some(frame + 1)
        } else {
            self.index += 1;
            self.intervals.get(self.index).map(|i| i.frame_start)
        };
        Some(frame)
    }
}

/// Frame input accepted by mutation calls
///
/// Normalized into a [`FrameIntervalSet`] before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrameValue {
    /// No frame restriction
    #[default]
    Static,
    /// One frame
    Frame(FrameNum),
    /// One closed interval `(start, end)`
    Interval(FrameNum, FrameNum),
    /// Several closed intervals, in any order, possibly overlapping
    Intervals(Vec<(FrameNum, FrameNum)>),
    /// An already normalized set
    Set(FrameIntervalSet),
}

impl FrameValue {
    /// Several closed intervals
    pub fn intervals<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (FrameNum, FrameNum)>,
    {
        FrameValue::Intervals(pairs.into_iter().collect())
    }

    /// Validate and normalize into a set
    ///
    /// # Errors
    /// Returns `InvalidFrameInterval` if any interval has `start > end`.
    pub fn resolve(self) -> Result<FrameIntervalSet> {
        match self {
            FrameValue::Static => Ok(FrameIntervalSet::new()),
            FrameValue::Frame(frame) => Ok(FrameIntervalSet::from_frame(frame)),
            FrameValue::Interval(start, end) => {
                FrameInterval::new(start, end).map(FrameIntervalSet::from_interval)
            }
            FrameValue::Intervals(pairs) => FrameIntervalSet::try_from_pairs(pairs),
            FrameValue::Set(set) => Ok(set),
        }
    }
}

impl From<FrameNum> for FrameValue {
    fn from(frame: FrameNum) -> Self {
        FrameValue::Frame(frame)
    }
}

impl From<(FrameNum, FrameNum)> for FrameValue {
    fn from((start, end): (FrameNum, FrameNum)) -> Self {
        FrameValue::Interval(start, end)
    }
}

impl From<Vec<(FrameNum, FrameNum)>> for FrameValue {
    fn from(pairs: Vec<(FrameNum, FrameNum)>) -> Self {
        FrameValue::Intervals(pairs)
    }
}

impl From<&[(FrameNum, FrameNum)]> for FrameValue {
    fn from(pairs: &[(FrameNum, FrameNum)]) -> Self {
        FrameValue::Intervals(pairs.to_vec())
    }
}

impl From<FrameIntervalSet> for FrameValue {
    fn from(set: FrameIntervalSet) -> Self {
        FrameValue::Set(set)
    }
}

impl<T: Into<FrameValue>> From<Option<T>> for FrameValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FrameValue::Static, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(FrameNum, FrameNum)]) -> FrameIntervalSet {
        FrameIntervalSet::try_from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_adjacent_intervals_fuse() {
        assert_eq!(set(&[(5, 10)]).union(&set(&[(11, 12)])), set(&[(5, 12)]));
        assert_eq!(set(&[(0, 5), (6, 9)]).to_pairs(), vec![(0, 9)]);
    }

    #[test]
    fn test_gap_of_one_frame_does_not_fuse() {
        let u = set(&[(5, 10)]).union(&set(&[(12, 14)]));
        assert_eq!(u.to_pairs(), vec![(5, 10), (12, 14)]);
    }

    #[test]
    fn test_normalize_sorts_and_merges_overlaps() {
        let s = set(&[(20, 25), (0, 3), (2, 8), (24, 30)]);
        assert_eq!(s.to_pairs(), vec![(0, 8), (20, 30)]);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        assert_eq!(
            FrameInterval::new(10, 5),
            Err(Error::InvalidFrameInterval { start: 10, end: 5 })
        );
        let err = FrameIntervalSet::try_from_pairs([(0, 3), (9, 4)]).unwrap_err();
        assert_eq!(err, Error::InvalidFrameInterval { start: 9, end: 4 });
    }

    #[test]
    fn test_difference_splits_intervals() {
        let a = set(&[(5, 10), (15, 21)]);
        let b = set(&[(5, 11), (17, 20)]);
        assert_eq!(a.difference(&b).to_pairs(), vec![(15, 16), (21, 21)]);
        assert_eq!(b.difference(&a).to_pairs(), vec![(11, 11)]);
        assert_eq!(a.difference(&FrameIntervalSet::new()), a);
        assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn test_difference_with_cut_spanning_several_intervals() {
        let a = set(&[(0, 2), (4, 6), (8, 10)]);
        let b = set(&[(1, 9)]);
        assert_eq!(a.difference(&b).to_pairs(), vec![(0, 0), (10, 10)]);
    }

    #[test]
    fn test_intersection() {
        let a = set(&[(5, 26), (28, 28)]);
        let b = set(&[(5, 11), (15, 19)]);
        assert_eq!(a.intersection(&b).to_pairs(), vec![(5, 11), (15, 19)]);
        assert!(a.intersection(&FrameIntervalSet::new()).is_empty());
        assert!(set(&[(0, 3)]).intersection(&set(&[(5, 6)])).is_empty());
    }

    #[test]
    fn test_containment_and_overlap() {
        let a = set(&[(0, 10), (20, 30)]);
        assert!(a.contains_frame(0));
        assert!(a.contains_frame(25));
        assert!(!a.contains_frame(15));
        assert!(!a.contains_frame(31));
        assert!(a.contains(&set(&[(2, 4), (21, 21)])));
        assert!(!a.contains(&set(&[(9, 12)])));
        assert!(a.overlaps(&set(&[(9, 12)])));
        assert!(!a.overlaps(&set(&[(11, 19)])));
    }

    #[test]
    fn test_outer_and_counts() {
        let a = set(&[(3, 4), (8, 9)]);
        assert_eq!(a.outer(), Some(FrameInterval::new(3, 9).unwrap()));
        assert_eq!(a.frame_count(), 4);
        assert_eq!(a.len(), 2);
        assert_eq!(FrameIntervalSet::new().outer(), None);
    }

    #[test]
    fn test_full_range_counts() {
        let full = FrameInterval::new(0, u64::MAX).unwrap();
        assert_eq!(full.len(), u128::from(u64::MAX) + 1);
        let a = set(&[(0, u64::MAX)]);
        assert_eq!(a.frame_count(), u128::from(u64::MAX) + 1);
        assert_eq!(set(&[(7, 7)]).frame_count(), 1);
    }

    #[test]
    fn test_frames_iterator_is_restartable() {
        let a = set(&[(1, 3), (7, 8)]);
        let frames: Vec<_> = a.frames().collect();
        assert_eq!(frames, vec![1, 2, 3, 7, 8]);
        assert_eq!(a.frames().count(), 5);
        assert_eq!(FrameIntervalSet::new().frames().next(), None);
    }

    #[test]
    fn test_remove_frame_splits() {
        let mut a = set(&[(0, 10)]);
        a.remove_frame(5);
        assert_eq!(a.to_pairs(), vec![(0, 4), (6, 10)]);
        a.remove_frame(0);
        assert_eq!(a.to_pairs(), vec![(1, 4), (6, 10)]);
    }

    #[test]
    fn test_set_mode_apply() {
        let old = set(&[(5, 10), (15, 20)]);
        let new = FrameIntervalSet::from_frame(21);
        assert_eq!(SetMode::Union.apply(&old, &new).to_pairs(), vec![(5, 10), (15, 21)]);
        assert_eq!(SetMode::Replace.apply(&old, &new), new);
        assert_eq!(SetMode::default(), SetMode::Union);
    }

    #[test]
    fn test_frame_value_forms() {
        assert!(FrameValue::Static.resolve().unwrap().is_empty());
        assert_eq!(FrameValue::from(7u64).resolve().unwrap().to_pairs(), vec![(7, 7)]);
        assert_eq!(FrameValue::from((2u64, 4u64)).resolve().unwrap().to_pairs(), vec![(2, 4)]);
        assert_eq!(
            FrameValue::intervals([(15, 20), (5, 10)]).resolve().unwrap().to_pairs(),
            vec![(5, 10), (15, 20)]
        );
        assert!(FrameValue::Interval(4, 2).resolve().is_err());
        assert!(FrameValue::from(None::<FrameNum>).resolve().unwrap().is_empty());
    }

    #[test]
    fn test_serde_shape_and_validation() {
        let a = set(&[(0, 5), (10, 10)]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(
            json,
            r#"[{"frame_start":0,"frame_end":5},{"frame_start":10,"frame_end":10}]"#
        );
        let back: FrameIntervalSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);

        let unsorted: FrameIntervalSet = serde_json::from_str(
            r#"[{"frame_start":6,"frame_end":8},{"frame_start":0,"frame_end":5}]"#,
        )
        .unwrap();
        assert_eq!(unsorted.to_pairs(), vec![(0, 8)]);

        let bad = serde_json::from_str::<FrameIntervalSet>(r#"[{"frame_start":9,"frame_end":1}]"#);
        assert!(bad.is_err());
    }
}
