//! Integer interval sets.

use smallvec::SmallVec;

/// A set of integers as sorted, disjoint, non-adjacent inclusive ranges.
///
/// Every operation keeps the representation minimal, so two sets are equal
/// iff they contain the same integers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    ranges: SmallVec<[(i128, i128); 2]>,
}

impl IntervalSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `lo..=hi`, or the empty set when `lo > hi`.
    pub fn range(lo: i128, hi: i128) -> Self {
        let mut set = Self::empty();
        if lo <= hi {
            set.ranges.push((lo, hi));
        }
        set
    }

    pub fn single(v: i128) -> Self {
        Self::range(v, v)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The inclusive ranges, ascending.
    #[inline]
    pub fn ranges(&self) -> &[(i128, i128)] {
        &self.ranges
    }

    pub fn min(&self) -> Option<i128> {
        self.ranges.first().map(|&(lo, _)| lo)
    }

    pub fn contains(&self, v: i128) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= v && v <= hi)
    }

    #[must_use]
    pub fn union(&self, other: &IntervalSet) -> IntervalSet {
        let mut all: SmallVec<[(i128, i128); 4]> =
            self.ranges.iter().chain(&other.ranges).copied().collect();
        all.sort_unstable();
        let mut out = IntervalSet::empty();
        for (lo, hi) in all {
            match out.ranges.last_mut() {
                // Overlapping or adjacent: extend.
                Some(last) if last.1.checked_add(1).map_or(true, |next| lo <= next) => {
                    last.1 = last.1.max(hi);
                }
                _ => out.ranges.push((lo, hi)),
            }
        }
        out
    }

    #[must_use]
    pub fn intersect(&self, other: &IntervalSet) -> IntervalSet {
        let mut out = IntervalSet::empty();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (alo, ahi) = self.ranges[i];
            let (blo, bhi) = other.ranges[j];
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo <= hi {
                out.ranges.push((lo, hi));
            }
            if ahi < bhi {
                i += 1;
            } else {
                j += 1;
            }
        }
        out
    }

    #[must_use]
    pub fn subtract(&self, other: &IntervalSet) -> IntervalSet {
        let mut out = IntervalSet::empty();
        for &(lo, hi) in &self.ranges {
            // First integer of `lo..=hi` not yet removed or emitted.
            let mut next = Some(lo);
            for &(blo, bhi) in &other.ranges {
                let Some(start) = next else { break };
                if bhi < start {
                    continue;
                }
                if blo > hi {
                    break;
                }
                if blo > start {
                    out.ranges.push((start, blo - 1));
                }
                next = if bhi >= hi { None } else { Some(bhi + 1) };
            }
            if let Some(start) = next {
                out.ranges.push((start, hi));
            }
        }
        out
    }
}
