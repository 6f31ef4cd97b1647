//! Region slices
//!
//! A slice is a sub-range of a [`Region`] produced by the diff sweep. It
//! borrows the region for everything but its bounds.

use crate::region::Region;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionSlice<'a> {
    pub region: &'a Region,
    pub start: u64,
    pub end: u64,
}

impl<'a> RegionSlice<'a> {
    /// Full extent of a region
    pub fn whole(region: &'a Region) -> Self {
        Self {
            region,
            start: region.start,
            end: region.end,
        }
    }

    /// Same region, new bounds
    pub(crate) fn with_range(self, start: u64, end: u64) -> Self {
        debug_assert!(start < end, "slice must be non-empty");
        debug_assert!(self.region.start <= start && end <= self.region.end);
        Self {
            region: self.region,
            start,
            end,
        }
    }

    /// Drop everything before `start`
    pub(crate) fn trim_start(self, start: u64) -> Self {
        self.with_range(start, self.end)
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    pub fn kb(&self) -> u64 {
        self.size() / 1024
    }

    /// True when the slice covers the whole originating region
    pub fn is_whole(&self) -> bool {
        self.start == self.region.start && self.end == self.region.end
    }

    pub fn range(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    pub fn address_range(&self) -> String {
        format!("{:#x}-{:#x}", self.start, self.end)
    }
}

impl fmt::Display for RegionSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address_range: {}, size (kb): {}, permissions: {}, type: {}",
            self.address_range(),
            self.kb(),
            self.region.permissions,
            self.region.region_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_slice() {
        let region = Region::anonymous(0x1000, 0x3000, "rw-p").unwrap();
        let slice = RegionSlice::whole(&region);
        assert!(slice.is_whole());
        assert_eq!(slice.kb(), region.kb());
    }

    #[test]
    fn test_trim_start() {
        let region = Region::anonymous(0x1000, 0x3000, "rw-p").unwrap();
        let slice = RegionSlice::whole(&region).trim_start(0x2000);
        assert!(!slice.is_whole());
        assert_eq!(slice.range(), (0x2000, 0x3000));
        assert_eq!(slice.kb(), 4);
    }

    #[test]
    fn test_display_uses_slice_bounds() {
        let region = Region::anonymous(0x1000, 0x3000, "r-xp").unwrap();
        let slice = RegionSlice::whole(&region).with_range(0x1000, 0x1800);
        assert_eq!(
            slice.to_string(),
            "address_range: 0x1000-0x1800, size (kb): 2, permissions: r-xp, type: normal"
        );
    }
}
