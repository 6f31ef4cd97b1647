//! Diff command handler
//!
//! Diffs two dumps and prints removed and added address ranges.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use pdump::{diff_by_type, diff_snapshots, DiffReport, LoadOptions, RegionType, Snapshot};
use std::path::Path;

/// Handle the diff command
pub fn handle(
    earlier: &Path,
    later: &Path,
    format: OutputFormat,
    only: Option<RegionType>,
    options: LoadOptions,
) -> Result<()> {
    let earlier = super::load_snapshot(earlier, options)?;
    let later = super::load_snapshot(later, options)?;
    print!("{}", render(&earlier, &later, format, only)?);
    Ok(())
}

fn render(
    earlier: &Snapshot,
    later: &Snapshot,
    format: OutputFormat,
    only: Option<RegionType>,
) -> Result<String> {
    // A single-type diff only needs that type's regions to be disjoint
    let (report, net_kb) = match only {
        Some(ty) => {
            let diff = diff_by_type(earlier, later, ty)
                .with_context(|| format!("Failed to diff {ty} regions"))?;
            (DiffReport::for_type(ty, &diff), diff.net_kb())
        }
        None => {
            let diff = diff_snapshots(earlier, later).context("Failed to diff dumps")?;
            (DiffReport::new(&diff), diff.total.net_kb())
        }
    };

    tracing::info!(
        earlier_regions = earlier.len(),
        later_regions = later.len(),
        net_kb,
        "diffed snapshots"
    );

    match format {
        OutputFormat::Table => Ok(report.to_string()),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&report).context("Failed to serialize diff")?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const EARLIER: &str = "\
1000-3000 rw-p 00000000 00:00 0 [heap]
8000-9000 rw-p 00000000 00:00 0
";

    const LATER: &str = "\
1000-2000 rw-p 00000000 00:00 0 [heap]
8000-9000 rw-p 00000000 00:00 0
a000-c000 r-xp 00000000 08:01 7 /usr/lib/libz.so.1
";

    #[test]
    fn test_render_table() {
        let earlier = Snapshot::parse(EARLIER).unwrap();
        let later = Snapshot::parse(LATER).unwrap();
        let text = render(&earlier, &later, OutputFormat::Table, None).unwrap();
        assert!(text.contains("changed by 4 kb"));
        assert!(text.contains("Removed 4 kb:\naddress_range: 0x2000-0x3000, size (kb): 4"));
        assert!(text.contains("===== mapped_file Memory Areas =====\nNet change: 8 kb\n"));
    }

    #[test]
    fn test_render_json_single_type() {
        let earlier = Snapshot::parse(EARLIER).unwrap();
        let later = Snapshot::parse(LATER).unwrap();
        let text = render(&earlier, &later, OutputFormat::Json, Some(RegionType::Heap)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("total").is_none());
        assert_eq!(value["by_type"]["heap"]["net_kb"], -4);
        assert!(value["by_type"].get("normal").is_none());
    }

    #[test]
    fn test_overlapping_dump_is_error() {
        let earlier = Snapshot::parse(
            "1000-3000 rw-p 00000000 00:00 0\n2000-4000 rw-p 00000000 00:00 0\n",
        )
        .unwrap();
        let later = Snapshot::parse(LATER).unwrap();
        let err = render(&earlier, &later, OutputFormat::Table, None).unwrap_err();
        assert!(format!("{err:#}").contains("Overlapping regions in earlier snapshot"));
    }

    #[test]
    fn test_single_type_ignores_overlap_elsewhere() {
        let earlier = Snapshot::parse(
            "1000-3000 rw-p 00000000 00:00 0 [heap]\n\
             8000-a000 rw-p 00000000 00:00 0\n\
             9000-b000 rw-p 00000000 00:00 0\n",
        )
        .unwrap();
        let later = Snapshot::parse(LATER).unwrap();

        let text = render(&earlier, &later, OutputFormat::Json, Some(RegionType::Heap)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["by_type"]["heap"]["net_kb"], -4);

        let err = render(&earlier, &later, OutputFormat::Json, Some(RegionType::Normal))
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to diff normal regions"));
        assert!(render(&earlier, &later, OutputFormat::Json, None).is_err());
    }

    #[test]
    fn test_dump_files_render() {
        let dir = tempdir().unwrap();
        let earlier = dir.path().join("earlier.maps");
        let later = dir.path().join("later.maps");
        fs::write(&earlier, EARLIER).unwrap();
        fs::write(&later, LATER).unwrap();

        let earlier = crate::commands::load_snapshot(&earlier, LoadOptions::default()).unwrap();
        let later = crate::commands::load_snapshot(&later, LoadOptions::default()).unwrap();
        let text = render(&earlier, &later, OutputFormat::Table, None).unwrap();
        assert!(text
            .starts_with("The total size of this process's memory areas changed by 4 kb\n"));
        assert!(text.contains("Added 8 kb:\naddress_range: 0xa000-0xc000, size (kb): 8"));
        assert!(text.contains("===== heap Memory Areas =====\nNet change: -4 kb\n"));
    }

    #[test]
    fn test_handle_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.maps");
        let err = handle(&missing, &missing, OutputFormat::Table, None, LoadOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load dump"));
    }
}
