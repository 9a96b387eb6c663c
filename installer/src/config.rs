//! Install configuration.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags, an optional TOML file, and the built-in NanoForge defaults. The
//! defaults alone reproduce the standard install.

use crate::cli::Cli;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;

/// Repository cloned when no source location is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/nanoservicesforge/NanoForge.git";

/// Binary produced by the build and installed by default.
pub const DEFAULT_BINARY_NAME: &str = "nanoforge";

/// Destination directory shared by every supported platform.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

/// Version-control client used to fetch the source.
pub const DEFAULT_FETCH_TOOL: &str = "git";

/// Build tool invoked in the workspace.
pub const DEFAULT_BUILD_TOOL: &str = "cargo";

/// Helper used to move the binary into the protected install directory.
pub const DEFAULT_PRIVILEGE_COMMAND: &str = "sudo";

/// Source label used when a command-line flag holds an invalid value.
const COMMAND_LINE_SOURCE: &str = "<command line>";

/// Fully resolved settings for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Repository to clone.
    pub source_url: String,
    /// Name of the built executable.
    pub binary_name: String,
    /// Directory the executable is installed into.
    pub install_dir: Utf8PathBuf,
    /// Program used for `clone`.
    pub fetch_tool: String,
    /// Program used for `build --release`.
    pub build_tool: String,
    /// Program prefixed to the final move, or `None` to move unprivileged.
    pub privilege_command: Option<String>,
    /// Upper bound on each external command, or `None` to wait indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            binary_name: DEFAULT_BINARY_NAME.to_owned(),
            install_dir: Utf8PathBuf::from(DEFAULT_INSTALL_DIR),
            fetch_tool: DEFAULT_FETCH_TOOL.to_owned(),
            build_tool: DEFAULT_BUILD_TOOL.to_owned(),
            privilege_command: Some(DEFAULT_PRIVILEGE_COMMAND.to_owned()),
            command_timeout: None,
        }
    }
}

/// Settings read from a configuration file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Repository to clone.
    pub source_url: Option<String>,
    /// Name of the built executable.
    pub binary_name: Option<String>,
    /// Directory the executable is installed into.
    pub install_dir: Option<Utf8PathBuf>,
    /// Program used for `clone`.
    pub fetch_tool: Option<String>,
    /// Program used for `build --release`.
    pub build_tool: Option<String>,
    /// Program prefixed to the final move. An empty string disables elevation.
    pub privilege_command: Option<String>,
    /// Upper bound on each external command in seconds.
    pub command_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Parse a configuration file's contents.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::InvalidConfig` if the contents are not valid
    /// TOML, contain unknown keys, name a binary that is not a plain file
    /// name, or set a zero timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use nanoforge_installer::config::FileConfig;
    ///
    /// let config = FileConfig::parse(Utf8Path::new("install.toml"), "binary_name = \"forge\"")?;
    /// assert_eq!(config.binary_name.as_deref(), Some("forge"));
    /// # Ok::<(), nanoforge_installer::error::InstallerError>(())
    /// ```
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| invalid_config(path, e))?;
        config.validate().map_err(|reason| invalid_config(path, reason))?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(name) = &self.binary_name {
            validate_binary_name(name)?;
        }
        if self.command_timeout_secs == Some(0) {
            return Err("command_timeout_secs must be at least 1".to_owned());
        }
        Ok(())
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::InvalidConfig` if the file cannot be read or
    /// parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| invalid_config(path, e))?;
        Self::parse(path, &contents)
    }
}

/// Rejects names that would place the binary outside the install directory.
fn validate_binary_name(name: &str) -> std::result::Result<(), String> {
    let has_separator = name.chars().any(std::path::is_separator);
    if name.is_empty() || name == "." || name == ".." || has_separator {
        return Err(format!("binary name `{name}` must be a plain file name"));
    }
    Ok(())
}

fn invalid_config(path: &Utf8Path, reason: impl ToString) -> InstallerError {
    InstallerError::InvalidConfig {
        path: path.to_owned(),
        reason: reason.to_string(),
    }
}

impl InstallConfig {
    /// Resolve the configuration for a CLI invocation.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::InvalidConfig` if `--config` names a file that
    /// cannot be read or parsed, or if `--binary-name` is not a plain file
    /// name.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        if let Some(name) = &cli.binary_name {
            validate_binary_name(name)
                .map_err(|reason| invalid_config(Utf8Path::new(COMMAND_LINE_SOURCE), reason))?;
        }
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::default().with_file(file).with_cli(cli))
    }

    /// Layer file settings over `self`.
    #[must_use]
    pub fn with_file(mut self, file: FileConfig) -> Self {
        if let Some(url) = file.source_url {
            self.source_url = url;
        }
        if let Some(name) = file.binary_name {
            self.binary_name = name;
        }
        if let Some(dir) = file.install_dir {
            self.install_dir = dir;
        }
        if let Some(tool) = file.fetch_tool {
            self.fetch_tool = tool;
        }
        if let Some(tool) = file.build_tool {
            self.build_tool = tool;
        }
        if let Some(command) = file.privilege_command {
            self.privilege_command = Some(command).filter(|c| !c.trim().is_empty());
        }
        if let Some(secs) = file.command_timeout_secs {
            self.command_timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Layer command-line flags over `self`.
    #[must_use]
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.source_url {
            self.source_url.clone_from(url);
        }
        if let Some(name) = &cli.binary_name {
            self.binary_name.clone_from(name);
        }
        if let Some(dir) = &cli.install_dir {
            self.install_dir.clone_from(dir);
        }
        if cli.no_elevate {
            self.privilege_command = None;
        }
        if let Some(secs) = cli.timeout {
            self.command_timeout = Some(Duration::from_secs(secs));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_standard_install() {
        let config = InstallConfig::default();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.binary_name, "nanoforge");
        assert_eq!(config.install_dir, Utf8PathBuf::from("/usr/local/bin"));
        assert_eq!(config.fetch_tool, "git");
        assert_eq!(config.build_tool, "cargo");
        assert_eq!(config.privilege_command.as_deref(), Some("sudo"));
        assert!(config.command_timeout.is_none());
    }

    #[test]
    fn file_settings_override_defaults() {
        let file = FileConfig::parse(
            Utf8Path::new("install.toml"),
            concat!(
                "source_url = \"https://example.invalid/fork.git\"\n",
                "install_dir = \"/opt/bin\"\n",
                "command_timeout_secs = 900\n",
            ),
        )
        .expect("valid config");

        let config = InstallConfig::default().with_file(file);

        assert_eq!(config.source_url, "https://example.invalid/fork.git");
        assert_eq!(config.install_dir, Utf8PathBuf::from("/opt/bin"));
        assert_eq!(config.command_timeout, Some(Duration::from_secs(900)));
        assert_eq!(config.binary_name, DEFAULT_BINARY_NAME);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn blank_privilege_command_disables_elevation(#[case] command: &str) {
        let file = FileConfig {
            privilege_command: Some(command.to_owned()),
            ..FileConfig::default()
        };
        let config = InstallConfig::default().with_file(file);
        assert!(config.privilege_command.is_none());
    }

    #[test]
    fn cli_flags_take_precedence_over_file() {
        let file = FileConfig {
            binary_name: Some("from-file".to_owned()),
            privilege_command: Some("doas".to_owned()),
            ..FileConfig::default()
        };
        let cli = Cli {
            binary_name: Some("from-cli".to_owned()),
            no_elevate: true,
            ..Cli::default()
        };

        let config = InstallConfig::default().with_file(file).with_cli(&cli);

        assert_eq!(config.binary_name, "from-cli");
        assert!(config.privilege_command.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FileConfig::parse(Utf8Path::new("install.toml"), "branch = \"main\"")
            .expect_err("unknown key should fail");
        assert!(matches!(err, InstallerError::InvalidConfig { .. }));
    }

    #[rstest]
    #[case::parent_dir("../victim")]
    #[case::nested("bin/nanoforge")]
    #[case::absolute("/etc/passwd")]
    #[case::dot_dot("..")]
    #[case::dot(".")]
    #[case::empty("")]
    fn file_rejects_binary_name_outside_install_dir(#[case] name: &str) {
        let contents = format!("binary_name = {name:?}\n");
        let err = FileConfig::parse(Utf8Path::new("install.toml"), &contents)
            .expect_err("path-like binary name should fail");
        assert!(
            matches!(err, InstallerError::InvalidConfig { ref path, .. } if path == "install.toml"),
            "got {err}"
        );
    }

    #[rstest]
    #[case::parent_dir("../victim")]
    #[case::nested("sub/nanoforge")]
    #[case::dot_dot("..")]
    #[case::empty("")]
    fn cli_rejects_binary_name_outside_install_dir(#[case] name: &str) {
        let cli = Cli {
            binary_name: Some(name.to_owned()),
            ..Cli::default()
        };
        let err = InstallConfig::resolve(&cli).expect_err("path-like binary name should fail");
        assert!(err.to_string().contains("must be a plain file name"), "got {err}");
    }

    #[test]
    fn plain_binary_name_is_accepted() {
        let cli = Cli {
            binary_name: Some("nanoforge-nightly".to_owned()),
            ..Cli::default()
        };
        let config = InstallConfig::resolve(&cli).expect("plain name should resolve");
        assert_eq!(config.binary_name, "nanoforge-nightly");
    }

    #[test]
    fn zero_timeout_in_file_is_rejected() {
        let err = FileConfig::parse(Utf8Path::new("install.toml"), "command_timeout_secs = 0")
            .expect_err("zero timeout should fail");
        assert!(err.to_string().contains("command_timeout_secs"), "got {err}");
    }

    #[test]
    fn resolve_reads_config_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("install.toml")).expect("utf8 path");
        fs::write(&path, "privilege_command = \"doas\"\n").expect("write config");
        let cli = Cli {
            config: Some(path),
            ..Cli::default()
        };

        let config = InstallConfig::resolve(&cli).expect("config should resolve");

        assert_eq!(config.privilege_command.as_deref(), Some("doas"));
    }

    #[test]
    fn resolve_reports_missing_config_file() {
        let cli = Cli {
            config: Some(Utf8PathBuf::from("/nonexistent/nanoforge/install.toml")),
            ..Cli::default()
        };
        let err = InstallConfig::resolve(&cli).expect_err("missing file should fail");
        assert!(matches!(err, InstallerError::InvalidConfig { .. }));
    }
}
