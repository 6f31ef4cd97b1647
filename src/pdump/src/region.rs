//! Memory Region Types
//!
//! Data structures for one line of a `/proc/<pid>/maps` style dump.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Errors that can occur while parsing a single dump line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected at least 5 fields, found {found}")]
    FieldCount { found: usize },

    #[error("Invalid address range: {0}")]
    AddressRange(String),

    #[error("Invalid hex value for {field}: {value}")]
    Hex { field: &'static str, value: String },

    #[error("Invalid inode: {0}")]
    Inode(String),

    #[error("Empty address range: {start:#x}-{end:#x}")]
    EmptyRange { start: u64, end: u64 },

    #[error("Unknown region type: {0}")]
    UnknownType(String),
}

/// Region category derived from the backing label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    Normal,
    Stack,
    Heap,
    MappedFile,
    Vdso,
}

impl RegionType {
    /// All types, in display order
    pub const ALL: [RegionType; 5] = [
        RegionType::Normal,
        RegionType::Stack,
        RegionType::Heap,
        RegionType::MappedFile,
        RegionType::Vdso,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RegionType::Normal => "normal",
            RegionType::Stack => "stack",
            RegionType::Heap => "heap",
            RegionType::MappedFile => "mapped_file",
            RegionType::Vdso => "vdso",
        }
    }

    /// Classify a region from its optional pathname.
    ///
    /// Absolute paths are mapped files. Pseudo-paths are matched by substring,
    /// heap before stack before vdso. Anything unrecognised (`[vvar]`,
    /// `[vsyscall]`, `[anon:...]`) is normal.
    pub fn classify(label: Option<&str>) -> RegionType {
        let Some(label) = label else {
            return RegionType::Normal;
        };

        if label.starts_with('/') {
            RegionType::MappedFile
        } else if label.contains("heap") {
            RegionType::Heap
        } else if label.contains("stack") {
            RegionType::Stack
        } else if label.contains("vdso") {
            RegionType::Vdso
        } else {
            RegionType::Normal
        }
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegionType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(RegionType::Normal),
            "stack" => Ok(RegionType::Stack),
            "heap" => Ok(RegionType::Heap),
            "mapped_file" | "mapped-file" => Ok(RegionType::MappedFile),
            "vdso" => Ok(RegionType::Vdso),
            _ => Err(ParseError::UnknownType(s.to_string())),
        }
    }
}

/// Permission flags from the `rwxp` field
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permissions {
    raw: String,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub private: bool,
}

impl Permissions {
    pub fn parse(field: &str) -> Self {
        Self {
            raw: field.to_string(),
            readable: field.contains('r'),
            writable: field.contains('w'),
            executable: field.contains('x'),
            private: field.contains('p'),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A mapped address range from one snapshot.
///
/// `start < end` always holds for a parsed region. Regions are immutable once
/// built; a [`crate::Snapshot`] owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub start: u64,
    pub end: u64,
    pub permissions: Permissions,
    pub offset: u64,
    pub device: String,
    pub inode: u64,
    pub label: Option<String>,
    pub region_type: RegionType,
    pub thread_id: Option<u32>,
}

impl Region {
    /// Parse one dump line: `start-end perms offset dev inode [pathname]`
    pub fn parse_line(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(ParseError::FieldCount {
                found: fields.len(),
            });
        }

        let (start_hex, end_hex) = fields[0]
            .split_once('-')
            .ok_or_else(|| ParseError::AddressRange(fields[0].to_string()))?;
        let start = parse_hex("start address", start_hex)?;
        let end = parse_hex("end address", end_hex)?;
        if start >= end {
            return Err(ParseError::EmptyRange { start, end });
        }

        let offset = parse_hex("offset", fields[2])?;
        let inode = fields[4]
            .parse::<u64>()
            .map_err(|_| ParseError::Inode(fields[4].to_string()))?;

        // Pathnames may contain spaces, e.g. "/tmp/x (deleted)"
        let label = (fields.len() > 5).then(|| fields[5..].join(" "));
        let region_type = RegionType::classify(label.as_deref());
        let thread_id = match region_type {
            RegionType::Stack => label.as_deref().and_then(stack_thread_id),
            _ => None,
        };

        Ok(Region {
            start,
            end,
            permissions: Permissions::parse(fields[1]),
            offset,
            device: fields[3].to_string(),
            inode,
            label,
            region_type,
            thread_id,
        })
    }

    /// Build an anonymous region directly from a range
    pub fn anonymous(start: u64, end: u64, perms: &str) -> Result<Self, ParseError> {
        if start >= end {
            return Err(ParseError::EmptyRange { start, end });
        }
        Ok(Region {
            start,
            end,
            permissions: Permissions::parse(perms),
            offset: 0,
            device: "00:00".to_string(),
            inode: 0,
            label: None,
            region_type: RegionType::Normal,
            thread_id: None,
        })
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Size in KiB, truncated
    pub fn kb(&self) -> u64 {
        self.size() / 1024
    }

    pub fn is_readable(&self) -> bool {
        self.permissions.readable
    }

    pub fn is_writable(&self) -> bool {
        self.permissions.writable
    }

    pub fn is_executable(&self) -> bool {
        self.permissions.executable
    }

    pub fn is_private(&self) -> bool {
        self.permissions.private
    }

    /// Backing file, only for mapped-file regions
    pub fn file_path(&self) -> Option<&str> {
        match self.region_type {
            RegionType::MappedFile => self.label.as_deref(),
            _ => None,
        }
    }

    /// Range in the kernel's maps notation, e.g. `00400000-0040b000`
    pub fn address_range(&self) -> String {
        format!("{:08x}-{:08x}", self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::parse_line(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address_range: {}, size (kb): {}, permissions: {}, type: {}",
            self.address_range(),
            self.kb(),
            self.permissions,
            self.region_type
        )
    }
}

fn parse_hex(field: &'static str, value: &str) -> Result<u64, ParseError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|_| ParseError::Hex {
        field,
        value: value.to_string(),
    })
}

/// `[stack:1234]` -> 1234
fn stack_thread_id(label: &str) -> Option<u32> {
    let parts: Vec<&str> = label
        .trim_matches(|c: char| c == '[' || c == ']')
        .split(':')
        .collect();
    match parts.as_slice() {
        [_, tid] => tid.parse().ok(),
        _ => None,
    }
}
