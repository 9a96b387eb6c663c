//! Error types for the NanoForge installer.
//!
//! Each stage of the install pipeline reports failure through a distinct
//! variant so that callers can tell a failed fetch from a failed build or an
//! unsupported host without parsing messages.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Exit status used when the host operating system is not supported.
pub const UNSUPPORTED_PLATFORM_EXIT_CODE: i32 = 2;

/// Exit status used for every other failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The temporary workspace could not be created.
    #[error("failed to create temporary workspace: {reason}")]
    WorkspaceCreation {
        /// Description of why the workspace could not be created.
        reason: String,
    },

    /// An external tool could not be started.
    #[error("failed to run {tool}: {source}")]
    ToolUnavailable {
        /// Name of the program that failed to spawn.
        tool: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool exceeded the configured timeout and was killed.
    #[error("{tool} timed out after {seconds} seconds")]
    CommandTimedOut {
        /// Name of the program that timed out.
        tool: String,
        /// Timeout that was exceeded.
        seconds: u64,
    },

    /// Cloning the source repository failed.
    #[error("failed to fetch source from {url}: {message}")]
    Fetch {
        /// Source location that was being cloned.
        url: String,
        /// Diagnostic output from the fetch tool.
        message: String,
    },

    /// The release build failed.
    #[error("release build failed: {message}")]
    BuildFailed {
        /// Diagnostic output from the build tool.
        message: String,
    },

    /// The host operating system has no platform profile.
    #[error("Unsupported OS: {os}")]
    UnsupportedPlatform {
        /// Operating system identifier reported by the host.
        os: String,
    },

    /// A previous installation could not be removed.
    #[error("failed to remove existing binary at {path}: {source}")]
    RemoveExisting {
        /// Path of the previously installed binary.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The build finished but produced no artefact at the expected path.
    #[error("build artefact not found at {path}")]
    ArtefactMissing {
        /// Path where the artefact was expected.
        path: Utf8PathBuf,
    },

    /// Moving the artefact into the install directory failed.
    #[error("failed to install binary to {destination}: {message}")]
    Placement {
        /// Destination the artefact was being moved to.
        destination: Utf8PathBuf,
        /// Diagnostic output from the move command.
        message: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl InstallerError {
    /// Returns `true` for the designed unsupported-platform failure.
    #[must_use]
    pub const fn is_unsupported_platform(&self) -> bool {
        matches!(self, Self::UnsupportedPlatform { .. })
    }

    /// Returns the process exit status this error should produce.
    ///
    /// # Examples
    ///
    /// ```
    /// use nanoforge_installer::error::InstallerError;
    ///
    /// let err = InstallerError::UnsupportedPlatform { os: "windows".to_owned() };
    /// assert_eq!(err.exit_code(), 2);
    ///
    /// let err = InstallerError::BuildFailed { message: "boom".to_owned() };
    /// assert_eq!(err.exit_code(), 1);
    /// ```
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_unsupported_platform() {
            UNSUPPORTED_PLATFORM_EXIT_CODE
        } else {
            FAILURE_EXIT_CODE
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
