//! NanoForge installer library.
//!
//! This crate fetches the NanoForge source into a temporary workspace, builds
//! it in release mode, and installs the binary into a system directory,
//! replacing any previous installation. It is used by the
//! `nanoforge-installer` CLI binary and can be driven programmatically, with
//! a stub [`command::CommandExecutor`], for testing.
//!
//! # Modules
//!
//! - [`builder`] - Release build of the retrieved source
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution abstraction
//! - [`config`] - Install configuration defaults and overrides
//! - [`error`] - Semantic error types and exit codes
//! - [`git`] - Source retrieval
//! - [`output`] - Console progress and dry-run formatting
//! - [`pipeline`] - Install pipeline orchestration
//! - [`placement`] - Moving the binary into the install directory
//! - [`platform`] - Host platform detection and install profiles
//! - [`workspace`] - Scoped temporary workspace

pub mod builder;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod git;
pub mod output;
pub mod pipeline;
pub mod placement;
pub mod platform;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod workspace;
