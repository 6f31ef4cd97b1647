//! Reporting
//!
//! Summaries and diff reports. Every report is a plain serializable value
//! with a `Display` impl for the text layout, so the CLI can emit either.

use crate::diff::{RegionDiff, SnapshotDiff};
use crate::region::{Region, RegionType};
use crate::slice::RegionSlice;
use crate::snapshot::Snapshot;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Count and size of the regions of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub region_type: RegionType,
    pub count: usize,
    pub kb: u64,
}

/// One table of the summary: a subset of regions broken down by type
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    pub heading: String,
    pub rows: Vec<TypeTotals>,
    pub count: usize,
    pub kb: u64,
}

impl SummaryTable {
    fn build(heading: String, regions: &[&Region]) -> Self {
        let rows = RegionType::ALL
            .iter()
            .map(|&region_type| {
                let of_type = regions.iter().filter(|r| r.region_type == region_type);
                TypeTotals {
                    region_type,
                    count: of_type.clone().count(),
                    kb: of_type.map(|r| r.kb()).sum(),
                }
            })
            .collect();

        SummaryTable {
            heading,
            rows,
            count: regions.len(),
            kb: regions.iter().map(|r| r.kb()).sum(),
        }
    }

    pub fn row(&self, region_type: RegionType) -> Option<&TypeTotals> {
        self.rows.iter().find(|r| r.region_type == region_type)
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "{:>12} {:>8} {:>12}", "TYPE", "COUNT", "SIZE (kb)")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>12} {:>8} {:>12}",
                row.region_type.name(),
                row.count,
                row.kb
            )?;
        }
        writeln!(f, "{:>12} {:>8} {:>12}", "total", self.count, self.kb)
    }
}

/// Summary of one snapshot: all, readable, writable and executable regions
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub tables: Vec<SummaryTable>,
}

impl Summary {
    pub fn new(snapshot: &Snapshot) -> Self {
        let all = subset(snapshot, |_| true);
        let readable = subset(snapshot, Region::is_readable);
        let writable = subset(snapshot, Region::is_writable);
        let executable = subset(snapshot, Region::is_executable);

        let tables = vec![
            SummaryTable::build(
                format!("Process address space has {} memory areas mapped", all.len()),
                &all,
            ),
            SummaryTable::build(
                format!("{} memory areas are readable", readable.len()),
                &readable,
            ),
            SummaryTable::build(
                format!("{} memory areas are writeable", writable.len()),
                &writable,
            ),
            SummaryTable::build(
                format!("{} memory areas are executable", executable.len()),
                &executable,
            ),
        ];

        Summary { tables }
    }
}

fn subset(snapshot: &Snapshot, keep: fn(&Region) -> bool) -> Vec<&Region> {
    snapshot.regions().iter().filter(|r| keep(r)).collect()
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "{table}")?;
        }
        Ok(())
    }
}

/// Regions of a snapshot listed largest first
pub struct Listing<'a>(pub &'a Snapshot);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+++++ Memory Areas Sorted By Size +++++")?;
        for region in self.0.sorted_by_size() {
            writeln!(f, "{region}")?;
        }
        Ok(())
    }
}

/// A removed or added sub-range, flattened for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceEntry {
    pub address_range: String,
    pub start: u64,
    pub end: u64,
    pub kb: u64,
    pub permissions: String,
    pub region_type: RegionType,
    /// Backing file of a mapped-file region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// False when only part of the originating region changed
    pub whole_region: bool,
}

impl From<&RegionSlice<'_>> for SliceEntry {
    fn from(slice: &RegionSlice<'_>) -> Self {
        SliceEntry {
            address_range: slice.address_range(),
            start: slice.start,
            end: slice.end,
            kb: slice.kb(),
            permissions: slice.region.permissions.as_str().to_string(),
            region_type: slice.region.region_type,
            path: slice.region.file_path().map(str::to_string),
            whole_region: slice.is_whole(),
        }
    }
}

impl fmt::Display for SliceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address_range: {}, size (kb): {}, permissions: {}, type: {}",
            self.address_range, self.kb, self.permissions, self.region_type
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffSection {
    pub net_kb: i64,
    pub removed_kb: u64,
    pub added_kb: u64,
    pub removed: Vec<SliceEntry>,
    pub added: Vec<SliceEntry>,
}

impl From<&RegionDiff<'_>> for DiffSection {
    fn from(diff: &RegionDiff<'_>) -> Self {
        DiffSection {
            net_kb: diff.net_kb(),
            removed_kb: diff.removed_kb(),
            added_kb: diff.added_kb(),
            removed: diff.removed.iter().map(SliceEntry::from).collect(),
            added: diff.added.iter().map(SliceEntry::from).collect(),
        }
    }
}

impl DiffSection {
    fn write_slices(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Removed {} kb:", self.removed_kb)?;
        for entry in &self.removed {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "Added {} kb:", self.added_kb)?;
        for entry in &self.added {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Diff of two snapshots, ready for output.
///
/// `total` is absent when the report was restricted to a single type.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<DiffSection>,
    pub by_type: BTreeMap<RegionType, DiffSection>,
}

impl DiffReport {
    /// Aggregate section plus the breakdown for every type
    pub fn new(diff: &SnapshotDiff<'_>) -> Self {
        DiffReport {
            total: Some(DiffSection::from(&diff.total)),
            by_type: diff
                .by_type
                .iter()
                .map(|(&ty, d)| (ty, DiffSection::from(d)))
                .collect(),
        }
    }

    /// Report restricted to one type, built from that type's diff alone
    pub fn for_type(region_type: RegionType, diff: &RegionDiff<'_>) -> Self {
        DiffReport {
            total: None,
            by_type: BTreeMap::from([(region_type, DiffSection::from(diff))]),
        }
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(total) = &self.total {
            writeln!(
                f,
                "The total size of this process's memory areas changed by {} kb",
                total.net_kb
            )?;
            total.write_slices(f)?;
            writeln!(f)?;
            writeln!(f, "Breakdown by type")?;
        }

        for (ty, section) in &self.by_type {
            writeln!(f, "===== {} Memory Areas =====", ty)?;
            writeln!(f, "Net change: {} kb", section.net_kb)?;
            section.write_slices(f)?;
        }
        Ok(())
    }
}
