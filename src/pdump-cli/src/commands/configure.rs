//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up pdump CLI defaults.

use crate::cli::OutputFormat;
use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// Handle the configure command
///
/// # Arguments
/// * `path` - Config file to read and update
/// * `format` - Optional default output format
/// * `skip_malformed` - Optional default for lenient parsing
/// * `show` - If true, show current configuration
pub fn handle(
    path: &Path,
    format: Option<OutputFormat>,
    skip_malformed: Option<bool>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load(path)?;

    if show {
        show_config(&config, path);
        return Ok(());
    }

    if format.is_none() && skip_malformed.is_none() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, format, skip_malformed);
    config.save(path)?;
    println!("Config saved to: {}", path.display());

    Ok(())
}

fn apply(config: &mut Config, format: Option<OutputFormat>, skip_malformed: Option<bool>) {
    if let Some(format) = format {
        config.format = Some(format);
    }
    if let Some(skip) = skip_malformed {
        config.skip_malformed = Some(skip);
    }
}

/// Display current configuration
fn show_config(config: &Config, path: &Path) {
    println!("Output format: {:?}", config.format_or(None));
    println!(
        "Skip malformed lines: {}",
        config.load_options().skip_malformed
    );
    println!("Config file: {}", path.display());
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: pdump configure --format table|json");
    println!("   or: pdump configure --skip-malformed true|false");
    println!("   or: pdump configure --show");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut config = Config {
            format: Some(OutputFormat::Json),
            skip_malformed: None,
        };
        apply(&mut config, None, Some(true));
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.skip_malformed, Some(true));
    }

    #[test]
    fn test_handle_writes_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        handle(&path, Some(OutputFormat::Json), None, false).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.skip_malformed, None);
    }

    #[test]
    fn test_handle_without_changes_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        handle(&path, None, None, false).unwrap();
        assert!(!path.exists());
    }
}
