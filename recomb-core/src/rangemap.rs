use std::collections::BTreeMap;

use biocore::location::{Interval, Position};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeMapError {
    #[error("interval {0} overlaps an existing entry")]
    Overlap(Interval),
}

/// A map from disjoint closed [`Interval`]s to values, keyed by interval
/// start. Backed by a `BTreeMap`; `Position`'s total order groups every entry
/// on the same contig contiguously, so per-contig lookups stay `O(log n)`
/// without a secondary index.
#[derive(Debug, Clone)]
pub struct RangeMap<V> {
    entries: BTreeMap<Position, (Position, V)>,
}

impl<V> Default for RangeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RangeMap<V> {
    pub fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Inserts `interval -> value`. Fails if `interval` overlaps any stored
    /// interval; callers are responsible for removing conflicting intervals
    /// first (`spec.md` §4.2's precondition).
    pub fn put(&mut self, interval: Interval, value: V) -> Result<(), RangeMapError> {
        if self.overlapping(&interval).into_iter().next().is_some() {
            return Err(RangeMapError::Overlap(interval));
        }
        self.entries.insert(interval.lo, (interval.hi, value));
        Ok(())
    }

    /// Removes exactly the stored entry whose key equals `interval`. A
    /// non-matching interval is a no-op.
    pub fn remove(&mut self, interval: &Interval) -> Option<V> {
        match self.entries.get(&interval.lo) {
            Some((hi, _)) if *hi == interval.hi => self.entries.remove(&interval.lo).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn get(&self, pos: &Position) -> Option<&V> {
        self.get_entry(pos).map(|(_, v)| v)
    }

    /// Returns the `(interval, value)` pair for the unique stored interval
    /// containing `pos`, if any.
    pub fn get_entry(&self, pos: &Position) -> Option<(Interval, &V)> {
        let lower = Position::new(pos.contig.clone(), u64::MIN);
        self.entries
            .range(lower..=pos.clone())
            .next_back()
            .filter(|(lo, (hi, _))| lo.contig == pos.contig && *hi >= *pos)
            .map(|(lo, (hi, v))| (Interval::new(lo.clone(), hi.clone()), v))
    }

    /// All stored entries whose interval overlaps `interval`, in ascending
    /// order, as full (unclipped) stored intervals.
    pub fn overlapping(&self, interval: &Interval) -> Vec<(Interval, &V)> {
        let mut result = Vec::new();

        if let Some((iv, v)) = self.get_entry(&interval.lo) {
            if iv.lo < interval.lo {
                result.push((iv, v));
            }
        }

        for (lo, (hi, v)) in self.entries.range(interval.lo.clone()..=interval.hi.clone()) {
            if lo.contig == interval.lo.contig {
                result.push((Interval::new(lo.clone(), hi.clone()), v));
            }
        }

        result
    }

    /// A view of the stored entries intersected with `r`, in ascending
    /// order, skipping intervals disjoint from `r`. Returned intervals may be
    /// narrower than the stored interval at either endpoint.
    pub fn sub_range(&self, r: &Interval) -> Vec<(Interval, &V)> {
        self.overlapping(r)
            .into_iter()
            .filter_map(|(iv, v)| iv.intersection(r).map(|clipped| (clipped, v)))
            .collect()
    }

    /// All stored entries in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Interval, &V)> {
        self.entries.iter().map(|(lo, (hi, v))| (Interval::new(lo.clone(), hi.clone()), v))
    }

    /// Checks the disjointness invariant; used by tests and by callers
    /// rebuilding a map from untrusted input.
    pub fn is_disjoint(&self) -> bool {
        let mut prev_hi: Option<&Position> = None;
        for (lo, (hi, _)) in &self.entries {
            if let Some(prev_hi) = prev_hi {
                if prev_hi.contig == lo.contig && prev_hi >= lo {
                    return false;
                }
            }
            prev_hi = Some(hi);
        }
        true
    }
}
