//! CLI argument definitions for the NanoForge installer.
//!
//! Running the installer without arguments performs the standard install.
//! Every flag overrides a single configuration value.

use camino::Utf8PathBuf;
use clap::Parser;

/// Build NanoForge from source and install it to the system PATH.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nanoforge-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build NanoForge from source and install it to the system PATH.\n\n",
    "The installer clones the NanoForge repository into a temporary workspace, ",
    "builds it in release mode with cargo, and moves the resulting binary into ",
    "/usr/local/bin using sudo. Any previously installed binary is replaced. ",
    "The temporary workspace is always removed.\n\n",
    "Linux and macOS are supported; other systems exit with status 2.",
))]
#[command(after_help = concat!(
    "CONFIGURATION FILE KEYS (all optional):\n",
    "  source_url, binary_name, install_dir, fetch_tool, build_tool,\n",
    "  privilege_command, command_timeout_secs\n\n",
    "EXAMPLES:\n",
    "  Install the latest NanoForge:\n",
    "    $ nanoforge-installer\n\n",
    "  Install into a user-writable directory without sudo:\n",
    "    $ nanoforge-installer --install-dir ~/.local/bin --no-elevate\n\n",
    "  Preview without cloning or building:\n",
    "    $ nanoforge-installer --dry-run",
))]
pub struct Cli {
    /// Read settings from a TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Repository to clone [default: the NanoForge GitHub repository].
    #[arg(long, value_name = "URL")]
    pub source_url: Option<String>,

    /// Name of the binary produced by the build [default: nanoforge].
    #[arg(long, value_name = "NAME")]
    pub binary_name: Option<String>,

    /// Directory the binary is installed into [default: /usr/local/bin].
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<Utf8PathBuf>,

    /// Move the binary without the privilege-elevation command.
    #[arg(long)]
    pub no_elevate: bool,

    /// Kill any external command running longer than this many seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Show the install plan and exit without cloning or building.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Returns the default `log` filter for the requested verbosity.
    ///
    /// # Examples
    ///
    /// ```
    /// use nanoforge_installer::cli::Cli;
    ///
    /// let cli = Cli { verbosity: 2, ..Cli::default() };
    /// assert_eq!(cli.log_filter(), "debug");
    /// ```
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["nanoforge-installer"]);
        assert!(cli.config.is_none());
        assert!(cli.source_url.is_none());
        assert!(cli.binary_name.is_none());
        assert!(cli.install_dir.is_none());
        assert!(!cli.no_elevate);
        assert!(cli.timeout.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbosity, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::parse_from([
            "nanoforge-installer",
            "--source-url",
            "https://example.invalid/fork.git",
            "--binary-name",
            "forge",
            "--install-dir",
            "/opt/bin",
            "--no-elevate",
            "--timeout",
            "600",
        ]);
        assert_eq!(
            cli.source_url.as_deref(),
            Some("https://example.invalid/fork.git")
        );
        assert_eq!(cli.binary_name.as_deref(), Some("forge"));
        assert_eq!(cli.install_dir, Some(Utf8PathBuf::from("/opt/bin")));
        assert!(cli.no_elevate);
        assert_eq!(cli.timeout, Some(600));
    }

    #[test]
    fn cli_parses_config_path() {
        let cli = Cli::parse_from(["nanoforge-installer", "-c", "/etc/nanoforge.toml"]);
        assert_eq!(cli.config, Some(Utf8PathBuf::from("/etc/nanoforge.toml")));
    }

    #[test]
    fn cli_rejects_quiet_with_verbose() {
        let result = Cli::try_parse_from(["nanoforge-installer", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_rejects_zero_timeout() {
        let result = Cli::try_parse_from(["nanoforge-installer", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[rstest]
    #[case::default(&["nanoforge-installer"], "warn")]
    #[case::verbose(&["nanoforge-installer", "-v"], "info")]
    #[case::very_verbose(&["nanoforge-installer", "-vv"], "debug")]
    #[case::trace(&["nanoforge-installer", "-vvvv"], "trace")]
    fn log_filter_tracks_verbosity(#[case] args: &[&str], #[case] expected: &str) {
        let cli = Cli::parse_from(args);
        assert_eq!(cli.log_filter(), expected);
    }
}
