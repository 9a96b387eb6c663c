//! Host platform detection and per-platform install profiles.
//!
//! A [`PlatformProfile`] answers the three questions placement needs: where
//! the build leaves the binary, where it is installed, and which helper
//! elevates the final move. Linux and macOS each have a profile; any other
//! host resolves to [`Platform::Unsupported`].

use crate::builder::artefact_path;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Operating system family of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// Linux distributions.
    Linux,
    /// macOS.
    MacOs,
    /// Any other operating system, carrying its reported identifier.
    Unsupported(String),
}

impl Platform {
    /// Detect the platform the installer is running on.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an operating system identifier (as in [`std::env::consts::OS`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use nanoforge_installer::platform::Platform;
    ///
    /// assert_eq!(Platform::from_os_name("linux"), Platform::Linux);
    /// assert_eq!(Platform::from_os_name("macos"), Platform::MacOs);
    /// assert!(!Platform::from_os_name("windows").is_supported());
    /// ```
    #[must_use]
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            other => Self::Unsupported(other.to_owned()),
        }
    }

    /// Returns `true` if a profile exists for this platform.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Returns the install profile for this platform.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::UnsupportedPlatform` for
    /// [`Platform::Unsupported`].
    pub fn profile(&self) -> Result<&'static dyn PlatformProfile> {
        match self {
            Self::Linux => Ok(&LinuxProfile),
            Self::MacOs => Ok(&MacOsProfile),
            Self::Unsupported(os) => Err(InstallerError::UnsupportedPlatform { os: os.clone() }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => f.write_str("Linux"),
            Self::MacOs => f.write_str("macOS"),
            Self::Unsupported(os) => write!(f, "{os} (unsupported)"),
        }
    }
}

/// Placement rules for one supported operating system family.
pub trait PlatformProfile: fmt::Debug + Sync {
    /// Human-readable family name.
    fn family(&self) -> &'static str;

    /// Where the build leaves the executable inside `workspace_root`.
    fn binary_path(&self, workspace_root: &Utf8Path, binary_name: &str) -> Utf8PathBuf {
        artefact_path(workspace_root, binary_name)
    }

    /// Where the executable is installed.
    fn install_path(&self, install_dir: &Utf8Path, binary_name: &str) -> Utf8PathBuf {
        install_dir.join(binary_name)
    }

    /// Program that elevates the final move, given the configured helper.
    fn privilege_command<'a>(&self, configured: Option<&'a str>) -> Option<&'a str> {
        configured
    }
}

/// Placement rules for Linux.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxProfile;

impl PlatformProfile for LinuxProfile {
    fn family(&self) -> &'static str {
        "Linux"
    }
}

/// Placement rules for macOS.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacOsProfile;

impl PlatformProfile for MacOsProfile {
    fn family(&self) -> &'static str {
        "macOS"
    }
}
