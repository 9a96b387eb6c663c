//! Console output for the installer.
//!
//! Progress lines go to stderr so they never mix with anything a caller
//! captures from stdout. Write failures are ignored: losing a progress line
//! must not fail an install.

use crate::config::InstallConfig;
use crate::platform::Platform;
use camino::Utf8Path;
use std::io::Write;

/// Printed once the binary is installed and the workspace is removed.
pub const COMPLETION_MESSAGE: &str = "Installation complete.";

/// Writes a single line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Progress line for the fetch stage.
#[must_use]
pub fn fetch_message(url: &str, workspace: &Utf8Path) -> String {
    format!("Cloning {url} into {workspace}...")
}

/// Progress line for the build stage.
#[must_use]
pub fn build_message(binary_name: &str) -> String {
    format!("Building {binary_name} in release mode...")
}

/// Progress line for the placement stage.
#[must_use]
pub fn install_message(binary_name: &str, destination: &Utf8Path, replacing: bool) -> String {
    if replacing {
        format!("Replacing existing {binary_name} at {destination}...")
    } else {
        format!("Installing {binary_name} to {destination}...")
    }
}

/// Settings shown by `--dry-run`.
///
/// # Example
///
/// ```
/// use nanoforge_installer::config::InstallConfig;
/// use nanoforge_installer::output::DryRunInfo;
/// use nanoforge_installer::platform::Platform;
///
/// let config = InstallConfig::default();
/// let info = DryRunInfo { config: &config, platform: &Platform::Linux };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("/usr/local/bin/nanoforge"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Resolved install configuration.
    pub config: &'a InstallConfig,
    /// Detected host platform.
    pub platform: &'a Platform,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let config = self.config;
        let elevation = config
            .privilege_command
            .as_deref()
            .unwrap_or("none (unprivileged move)");
        let timeout = config
            .command_timeout
            .map_or_else(|| "none".to_owned(), |t| format!("{}s", t.as_secs()));

        let lines = [
            "Dry run - nothing will be cloned, built, or installed".to_owned(),
            String::new(),
            format!("Platform: {}", self.platform),
            format!("Source: {}", config.source_url),
            format!(
                "Fetch command: {} clone {} <workspace>",
                config.fetch_tool, config.source_url
            ),
            format!("Build command: {} build --release", config.build_tool),
            format!("Artefact: <workspace>/target/release/{}", config.binary_name),
            format!(
                "Destination: {}",
                config.install_dir.join(&config.binary_name)
            ),
            format!("Privilege command: {elevation}"),
            format!("Command timeout: {timeout}"),
        ];

        lines.join("\n")
    }
}
