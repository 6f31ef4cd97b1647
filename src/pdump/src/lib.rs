//! # pdump
//!
//! Inspect and diff textual dumps of a process address space
//! (`/proc/<pid>/maps` format).
//!
//! This library provides functionality to:
//! - Parse dump lines into [`Region`]s and classify them by type
//! - Group regions into a [`Snapshot`] and summarize it
//! - Diff two snapshots into removed and added address ranges, in aggregate
//!   and per region type
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let earlier = pdump::Snapshot::parse("1000-3000 rw-p 00000000 00:00 0 [heap]\n")?;
//! let later = pdump::Snapshot::parse("1000-2000 rw-p 00000000 00:00 0 [heap]\n")?;
//!
//! let diff = pdump::diff(earlier.regions(), later.regions())?;
//! assert_eq!(diff.removed[0].range(), (0x2000, 0x3000));
//! assert!(diff.added.is_empty());
//! assert_eq!(diff.net_kb(), -4);
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod region;
pub mod report;
pub mod slice;
pub mod snapshot;

#[doc(inline)]
pub use diff::{diff, diff_by_type, diff_snapshots, DiffError, RegionDiff, Side, SnapshotDiff};
#[doc(inline)]
pub use region::{ParseError, Permissions, Region, RegionType};
#[doc(inline)]
pub use report::{DiffReport, Listing, Summary};
#[doc(inline)]
pub use slice::RegionSlice;
#[doc(inline)]
pub use snapshot::{LoadOptions, Snapshot, SnapshotError};
