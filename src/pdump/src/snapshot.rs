//! Snapshots
//!
//! A snapshot is every region parsed from one dump, plus an index of the
//! regions belonging to each [`RegionType`].

use crate::region::{ParseError, Region, RegionType};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// How to treat input while loading a snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Log and skip malformed lines instead of failing
    pub skip_malformed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    regions: Vec<Region>,
    by_type: BTreeMap<RegionType, Vec<usize>>,
    skipped: usize,
}

impl Snapshot {
    /// Build a snapshot from already parsed regions
    pub fn from_regions(regions: Vec<Region>) -> Self {
        let mut by_type: BTreeMap<RegionType, Vec<usize>> = BTreeMap::new();
        for (index, region) in regions.iter().enumerate() {
            by_type.entry(region.region_type).or_default().push(index);
        }
        Snapshot {
            regions,
            by_type,
            skipped: 0,
        }
    }

    /// Parse a dump held in memory, failing on the first malformed line
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        Self::from_reader(text.as_bytes(), LoadOptions::default())
    }

    /// Open and parse a dump file
    pub fn open<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let snapshot = Self::from_reader(BufReader::new(file), options)?;
        debug!(
            path = %path.display(),
            regions = snapshot.len(),
            skipped = snapshot.skipped,
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Parse a dump from any buffered reader.
    ///
    /// Blank lines and `#` comments are ignored. Line numbers in errors are
    /// 1-based. Pathnames are arbitrary bytes, so lines are decoded lossily.
    pub fn from_reader<R: BufRead>(reader: R, options: LoadOptions) -> Result<Self, SnapshotError> {
        let mut regions = Vec::new();
        let mut skipped = 0;

        for (index, line) in reader.split(b'\n').enumerate() {
            let bytes = line?;
            let decoded = String::from_utf8_lossy(&bytes);
            if let Cow::Owned(_) = decoded {
                debug!(line = index + 1, "replaced invalid UTF-8 in line");
            }
            let line = decoded.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Region::parse_line(line) {
                Ok(region) => regions.push(region),
                Err(source) if options.skip_malformed => {
                    warn!(line = index + 1, error = %source, "skipping malformed line");
                    skipped += 1;
                }
                Err(source) => {
                    return Err(SnapshotError::Parse {
                        line: index + 1,
                        source,
                    })
                }
            }
        }

        let mut snapshot = Self::from_regions(regions);
        snapshot.skipped = skipped;
        Ok(snapshot)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of malformed lines skipped while loading
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Regions of one type, in input order
    pub fn of_type(&self, region_type: RegionType) -> impl Iterator<Item = &Region> + '_ {
        self.by_type
            .get(&region_type)
            .into_iter()
            .flatten()
            .map(move |&index| &self.regions[index])
    }

    pub fn total_kb(&self) -> u64 {
        self.regions.iter().map(Region::kb).sum()
    }

    /// Regions ordered largest first; ties keep address order
    pub fn sorted_by_size(&self) -> Vec<&Region> {
        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by_key(|r| r.start);
        sorted.sort_by(|a, b| b.kb().cmp(&a.kb()));
        sorted
    }
}
