//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vsixget_types::ColorChoice;

/// vsixget - download VS Code extensions for offline installation
#[derive(Parser)]
#[command(name = "vsixget")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download VS Code extensions for offline installation")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Marketplace gallery endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub gallery_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of extensions processed concurrently
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and download extensions
    #[command(alias = "dl")]
    Download {
        /// References (publisher.package[@version][=platform]), JSON manifests
        /// or text listings such as `code --list-extensions --show-versions`
        #[arg(short, long, num_args = 1.., required = true, value_name = "INPUT")]
        extensions: Vec<String>,

        /// Destination directory
        #[arg(short, long, value_name = "DIR")]
        download_dir: Option<PathBuf>,

        /// Reuse files already present in the destination directory
        #[arg(long, value_name = "BOOL", value_parser = parse_cached)]
        cached: Option<bool>,
    },

    /// Resolve extensions and print their download URLs without downloading
    Resolve {
        /// References, JSON manifests or text listings
        #[arg(required = true, value_name = "INPUT")]
        extensions: Vec<String>,
    },
}

impl Commands {
    /// Raw inputs handed to the manifest loader
    pub fn inputs(&self) -> &[String] {
        match self {
            Commands::Download { extensions, .. } | Commands::Resolve { extensions } => extensions,
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn parse_cached(value: &str) -> Result<bool, String> {
    Ok(vsixget_config::parse_truthy(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_accepts_loose_truthy_words() {
        let cli = Cli::try_parse_from([
            "vsixget",
            "download",
            "--extensions",
            "acme.widget",
            "--cached",
            "Yeah",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Download { cached: Some(true), .. }));

        let cli = Cli::try_parse_from([
            "vsixget",
            "download",
            "--extensions",
            "acme.widget",
            "--cached",
            "nope",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Download { cached: Some(false), .. }));
    }

    #[test]
    fn test_extensions_take_many_values() {
        let cli = Cli::try_parse_from([
            "vsixget",
            "download",
            "--extensions",
            "acme.widget",
            "acme.gadget@1.0.0",
            "--jobs",
            "8",
        ])
        .unwrap();
        assert_eq!(cli.command.inputs().len(), 2);
        assert_eq!(cli.global.jobs, Some(8));
    }

    #[test]
    fn test_download_requires_extensions() {
        assert!(Cli::try_parse_from(["vsixget", "download"]).is_err());
    }
}
