use crate::position::Positioned;
use std::cmp::max;

/// Interval is a closed `[low, high]` range remembering the position of the
/// item it was built from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub low: i64,
    pub high: i64,
    pub index: usize,
}

impl Interval {
    /// Closed-interval overlap; touching endpoints overlap.
    #[inline]
    pub fn overlaps(&self, low: i64, high: i64) -> bool {
        self.low <= high && low <= self.high
    }
}

impl Positioned for Interval {
    #[inline]
    fn start(&self) -> i64 {
        self.low
    }
    #[inline]
    fn stop(&self) -> i64 {
        self.high
    }
}

/// A static index for overlap queries, built once from a set of ranges.
///
/// Intervals are sorted by `low` and read as an implicit balanced tree: the
/// middle element of any slice is the node for that slice and `max_high`
/// holds the largest `high` found in the slice.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    intervals: Vec<Interval>,
    max_high: Vec<i64>,
}

impl IntervalIndex {
    /// Index the extents of `items`. Results refer to positions in `items`.
    pub fn new<P: Positioned>(items: &[P]) -> Self {
        let mut intervals: Vec<Interval> = items
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let (a, b) = p.extent();
                Interval {
                    low: a.min(b),
                    high: a.max(b),
                    index,
                }
            })
            .collect();
        intervals.sort_unstable();
        let mut idx = IntervalIndex {
            max_high: vec![i64::MIN; intervals.len()],
            intervals,
        };
        idx.build(0, idx.intervals.len());
        idx
    }

    fn build(&mut self, lo: usize, hi: usize) -> i64 {
        if lo >= hi {
            return i64::MIN;
        }
        let mid = lo + (hi - lo) / 2;
        let left = self.build(lo, mid);
        let right = self.build(mid + 1, hi);
        let m = max(self.intervals[mid].high, max(left, right));
        self.max_high[mid] = m;
        m
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Positions of all indexed items overlapping `[low, high]`, ascending.
    pub fn overlapping(&self, low: i64, high: i64) -> Vec<usize> {
        let mut out = Vec::new();
        self.query(0, self.intervals.len(), low, high, &mut out);
        out.sort_unstable();
        out
    }

    /// True if anything in the index overlaps `[low, high]`.
    pub fn overlaps_any(&self, low: i64, high: i64) -> bool {
        !self.overlapping(low, high).is_empty()
    }

    /// For each query, the positions of the indexed items that overlap it.
    pub fn find_overlaps<P: Positioned>(&self, queries: &[P]) -> Vec<Vec<usize>> {
        queries
            .iter()
            .map(|q| {
                let (a, b) = q.extent();
                self.overlapping(a.min(b), a.max(b))
            })
            .collect()
    }

    fn query(&self, lo: usize, hi: usize, low: i64, high: i64, out: &mut Vec<usize>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        if self.max_high[mid] < low {
            return;
        }
        self.query(lo, mid, low, high, out);
        let iv = &self.intervals[mid];
        // everything right of mid starts at or after iv.low
        if iv.low > high {
            return;
        }
        if iv.overlaps(low, high) {
            out.push(iv.index);
        }
        self.query(mid + 1, hi, low, high, out);
    }
}
