//! Summary command handler
//!
//! Lists regions by size and prints per-type counts and sizes for one dump.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use pdump::{Listing, LoadOptions, Region, Snapshot, Summary};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SummaryOutput<'a> {
    total_kb: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    regions: Option<Vec<&'a Region>>,
    summary: Summary,
}

/// Handle the summary command
pub fn handle(
    input: &Path,
    format: OutputFormat,
    listing: bool,
    options: LoadOptions,
) -> Result<()> {
    let snapshot = super::load_snapshot(input, options)?;
    print!("{}", render(&snapshot, format, listing)?);
    Ok(())
}

fn render(snapshot: &Snapshot, format: OutputFormat, listing: bool) -> Result<String> {
    let summary = Summary::new(snapshot);

    match format {
        OutputFormat::Table => {
            let mut out = String::new();
            if listing {
                out.push_str(&Listing(snapshot).to_string());
            }
            out.push_str(&summary.to_string());
            Ok(out)
        }
        OutputFormat::Json => {
            let output = SummaryOutput {
                total_kb: snapshot.total_kb(),
                regions: listing.then(|| snapshot.sorted_by_size()),
                summary,
            };
            let mut json =
                serde_json::to_string_pretty(&output).context("Failed to serialize summary")?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS: &str = "\
00400000-0040b000 r-xp 00000000 08:01 1048602 /bin/cat
01e3c000-01e5d000 rw-p 00000000 00:00 0 [heap]
";

    #[test]
    fn test_render_table() {
        let snapshot = Snapshot::parse(MAPS).unwrap();
        let text = render(&snapshot, OutputFormat::Table, true).unwrap();
        assert!(text.starts_with("+++++ Memory Areas Sorted By Size +++++\n"));
        assert!(text.contains("Process address space has 2 memory areas mapped"));
        assert!(text.contains("1 memory areas are executable"));
    }

    #[test]
    fn test_render_table_without_listing() {
        let snapshot = Snapshot::parse(MAPS).unwrap();
        let text = render(&snapshot, OutputFormat::Table, false).unwrap();
        assert!(text.starts_with("Process address space has 2 memory areas mapped"));
    }

    #[test]
    fn test_render_json() {
        let snapshot = Snapshot::parse(MAPS).unwrap();
        let text = render(&snapshot, OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_kb"], 176);
        assert_eq!(value["regions"][0]["region_type"], "heap");
        assert_eq!(value["summary"]["tables"][0]["count"], 2);
    }
}
