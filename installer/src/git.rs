//! Source retrieval.
//!
//! The source tree is fetched by the configured version-control client
//! (`git` by default) as `<fetch-tool> clone <url> <destination>`. A non-zero
//! exit fails the install; nothing is retried.

use crate::command::{CommandExecutor, CommandSpec, stderr_message};
use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use log::debug;

/// Builds the clone invocation for `url` into `destination`.
#[must_use]
pub fn clone_command(fetch_tool: &str, url: &str, destination: &Utf8Path) -> CommandSpec {
    CommandSpec::new(fetch_tool).args(["clone", url, destination.as_str()])
}

/// Clones `url` into `destination`.
///
/// The destination may already exist as an empty directory, which is the
/// case for a freshly acquired workspace.
///
/// # Errors
///
/// Returns `InstallerError::Fetch` if the fetch tool exits unsuccessfully,
/// or the executor's error if the tool cannot be run.
pub fn clone_repository(
    executor: &dyn CommandExecutor,
    fetch_tool: &str,
    url: &str,
    destination: &Utf8Path,
) -> Result<()> {
    let output = executor.run(&clone_command(fetch_tool, url, destination))?;

    if !output.status.success() {
        return Err(InstallerError::Fetch {
            url: url.to_owned(),
            message: stderr_message(&output),
        });
    }

    debug!("cloned {url} into {destination}");
    Ok(())
}
