//! Release build of the retrieved source tree.
//!
//! The build tool runs from the workspace root as
//! `<build-tool> build --release`, leaving the executable at
//! `target/release/<binary-name>` relative to the workspace.

use crate::command::{CommandExecutor, CommandSpec, stderr_message};
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// Build output directory relative to the workspace root.
pub const RELEASE_DIR: [&str; 2] = ["target", "release"];

/// Configuration for the build stage.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Program used for `build --release`.
    pub build_tool: String,
    /// Name of the executable the build produces.
    pub binary_name: String,
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Path where the build left the executable.
    pub artefact_path: Utf8PathBuf,
}

/// Runs release builds inside a workspace.
pub struct Builder<'a> {
    config: BuildConfig,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Builder<'a> {
    /// Create a new builder with the given configuration.
    #[must_use]
    pub fn new(config: BuildConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self { config, executor }
    }

    /// The release build invocation for `workspace_root`.
    #[must_use]
    pub fn build_command(&self, workspace_root: &Utf8Path) -> CommandSpec {
        CommandSpec::new(self.config.build_tool.as_str())
            .args(["build", "--release"])
            .current_dir(workspace_root)
    }

    /// Build the source tree at `workspace_root` in release mode.
    ///
    /// The artefact's presence is checked later, when it is installed.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::BuildFailed` if the build tool exits
    /// unsuccessfully, or the executor's error if it cannot be run.
    pub fn build(&self, workspace_root: &Utf8Path) -> Result<BuildResult> {
        let output = self.executor.run(&self.build_command(workspace_root))?;

        if !output.status.success() {
            return Err(InstallerError::BuildFailed {
                message: stderr_message(&output),
            });
        }

        let artefact_path = artefact_path(workspace_root, &self.config.binary_name);
        debug!("release build finished; expecting {artefact_path}");
        Ok(BuildResult { artefact_path })
    }
}

/// Expected location of the built executable inside a workspace.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use nanoforge_installer::builder::artefact_path;
///
/// let path = artefact_path(Utf8Path::new("/tmp/ws"), "nanoforge");
/// assert_eq!(path.as_str(), "/tmp/ws/target/release/nanoforge");
/// ```
#[must_use]
pub fn artefact_path(workspace_root: &Utf8Path, binary_name: &str) -> Utf8PathBuf {
    let mut path = workspace_root.to_owned();
    path.extend(RELEASE_DIR);
    path.push(binary_name);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;
    use crate::test_utils::{failure_output, success_output};

    fn config() -> BuildConfig {
        BuildConfig {
            build_tool: "cargo".to_owned(),
            binary_name: "nanoforge".to_owned(),
        }
    }

    #[test]
    fn build_command_runs_release_build_in_workspace() {
        let executor = MockCommandExecutor::new();
        let builder = Builder::new(config(), &executor);

        let spec = builder.build_command(Utf8Path::new("/tmp/ws"));

        assert_eq!(spec.to_string(), "cargo build --release");
        assert_eq!(spec.working_dir(), Some(Utf8Path::new("/tmp/ws")));
    }

    #[test]
    fn build_returns_expected_artefact_path() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|spec| spec.working_dir() == Some(Utf8Path::new("/tmp/ws")))
            .times(1)
            .returning(|_| Ok(success_output()));

        let result = Builder::new(config(), &executor)
            .build(Utf8Path::new("/tmp/ws"))
            .expect("build should succeed");

        assert_eq!(
            result.artefact_path,
            Utf8PathBuf::from("/tmp/ws/target/release/nanoforge")
        );
    }

    #[test]
    fn build_failure_carries_stderr() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .times(1)
            .returning(|_| Ok(failure_output("error[E0425]: cannot find value")));

        let err = Builder::new(config(), &executor)
            .build(Utf8Path::new("/tmp/ws"))
            .expect_err("build should fail");

        assert!(matches!(
            err,
            InstallerError::BuildFailed { ref message } if message.contains("E0425")
        ));
    }
}
