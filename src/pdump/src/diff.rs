//! Interval diff between two snapshots
//!
//! Both sides are sorted by start address and swept with one cursor each.
//! A cursor is a [`RegionSlice`] holding the unconsumed remainder of the
//! current region on that side. Every step either emits a whole slice (no
//! overlap), or emits the unmatched leading segment of an overlap and then
//! consumes the shared part up to the earlier of the two ends.
//!
//! The result is purely spatial: two regions with the same bounds but
//! different permissions or paths produce no entry.

use crate::region::{Region, RegionType};
use crate::slice::RegionSlice;
use crate::snapshot::Snapshot;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// Which input a region came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Earlier,
    Later,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Earlier => f.write_str("earlier"),
            Side::Later => f.write_str("later"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error(
        "Overlapping regions in {side} snapshot: {:#x}-{:#x} and {:#x}-{:#x}",
        .first.0, .first.1, .second.0, .second.1
    )]
    Overlap {
        side: Side,
        first: (u64, u64),
        second: (u64, u64),
    },
}

/// Address ranges removed and added between two snapshots, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionDiff<'a> {
    pub removed: Vec<RegionSlice<'a>>,
    pub added: Vec<RegionSlice<'a>>,
}

impl RegionDiff<'_> {
    pub fn removed_kb(&self) -> u64 {
        self.removed.iter().map(RegionSlice::kb).sum()
    }

    pub fn added_kb(&self) -> u64 {
        self.added.iter().map(RegionSlice::kb).sum()
    }

    /// Added minus removed, in KiB
    pub fn net_kb(&self) -> i64 {
        self.added_kb() as i64 - self.removed_kb() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Aggregate diff plus one diff per region type
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDiff<'a> {
    pub total: RegionDiff<'a>,
    pub by_type: BTreeMap<RegionType, RegionDiff<'a>>,
}

/// One side of the sweep: sorted regions and the index of the next unvisited one
struct Sweep<'a> {
    regions: Vec<&'a Region>,
    next: usize,
}

impl<'a> Sweep<'a> {
    fn new<I>(side: Side, regions: I) -> Result<Self, DiffError>
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let mut regions: Vec<&'a Region> = regions.into_iter().collect();
        regions.sort_by_key(|r| r.start);

        if let Some(pair) = regions.windows(2).find(|w| w[0].end > w[1].start) {
            return Err(DiffError::Overlap {
                side,
                first: (pair[0].start, pair[0].end),
                second: (pair[1].start, pair[1].end),
            });
        }

        Ok(Self { regions, next: 0 })
    }

    /// Load the next region as a full-extent cursor, or `None` at end of input
    fn advance(&mut self) -> Option<RegionSlice<'a>> {
        let region = self.regions.get(self.next)?;
        self.next += 1;
        Some(RegionSlice::whole(region))
    }

    /// Every region not yet visited, at full extent
    fn rest(self) -> impl Iterator<Item = RegionSlice<'a>> {
        self.regions.into_iter().skip(self.next).map(RegionSlice::whole)
    }
}

/// Diff two region collections.
///
/// Each collection must be internally disjoint (adjacent regions are fine).
/// Overlap within one side is reported as [`DiffError::Overlap`] before any
/// output is produced. Input order does not matter.
pub fn diff<'a, I, J>(earlier: I, later: J) -> Result<RegionDiff<'a>, DiffError>
where
    I: IntoIterator<Item = &'a Region>,
    J: IntoIterator<Item = &'a Region>,
{
    let mut earlier = Sweep::new(Side::Earlier, earlier)?;
    let mut later = Sweep::new(Side::Later, later)?;
    let mut out = RegionDiff::default();

    let mut e_cur = earlier.advance();
    let mut l_cur = later.advance();

    while let (Some(e), Some(l)) = (e_cur, l_cur) {
        trace!(
            earlier = %e.address_range(),
            later = %l.address_range(),
            "sweep step"
        );

        if e.end <= l.start {
            out.removed.push(e);
            e_cur = earlier.advance();
            continue;
        }
        if l.end <= e.start {
            out.added.push(l);
            l_cur = later.advance();
            continue;
        }

        match e.start.cmp(&l.start) {
            Ordering::Less => out.removed.push(e.with_range(e.start, l.start)),
            Ordering::Greater => out.added.push(l.with_range(l.start, e.start)),
            Ordering::Equal => {}
        }

        // Shared part runs up to the smaller end; keep the remainder of the longer one
        match e.end.cmp(&l.end) {
            Ordering::Less => {
                l_cur = Some(l.trim_start(e.end));
                e_cur = earlier.advance();
            }
            Ordering::Greater => {
                e_cur = Some(e.trim_start(l.end));
                l_cur = later.advance();
            }
            Ordering::Equal => {
                e_cur = earlier.advance();
                l_cur = later.advance();
            }
        }
    }

    out.removed.extend(e_cur);
    out.removed.extend(earlier.rest());
    out.added.extend(l_cur);
    out.added.extend(later.rest());

    debug!(
        removed = out.removed.len(),
        removed_kb = out.removed_kb(),
        added = out.added.len(),
        added_kb = out.added_kb(),
        "diff complete"
    );

    Ok(out)
}

/// Diff only the regions of one type
pub fn diff_by_type<'a>(
    earlier: &'a Snapshot,
    later: &'a Snapshot,
    region_type: RegionType,
) -> Result<RegionDiff<'a>, DiffError> {
    diff(earlier.of_type(region_type), later.of_type(region_type))
}

/// Aggregate diff and per-type breakdown for two snapshots
pub fn diff_snapshots<'a>(
    earlier: &'a Snapshot,
    later: &'a Snapshot,
) -> Result<SnapshotDiff<'a>, DiffError> {
    let total = diff(earlier.regions(), later.regions())?;
    let mut by_type = BTreeMap::new();
    for ty in RegionType::ALL {
        by_type.insert(ty, diff_by_type(earlier, later, ty)?);
    }

    Ok(SnapshotDiff { total, by_type })
}
