//! NanoForge installer CLI entrypoint.
//!
//! Builds NanoForge from source and installs it into the system PATH. Exits
//! with status 0 on success, 2 on an unsupported operating system, and 1 on
//! any other failure.

use clap::Parser;
use nanoforge_installer::cli::Cli;
use nanoforge_installer::command::SystemCommandExecutor;
use nanoforge_installer::config::InstallConfig;
use nanoforge_installer::error::Result;
use nanoforge_installer::output::{DryRunInfo, write_stderr_line};
use nanoforge_installer::pipeline::InstallPipeline;
use nanoforge_installer::platform::Platform;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = InstallConfig::resolve(cli)?;

    if cli.dry_run {
        return run_dry(&config, &Platform::detect(), stderr);
    }

    let executor = SystemCommandExecutor::with_timeout(config.command_timeout);
    InstallPipeline::new(&config, &executor)
        .quiet(cli.quiet)
        .run(stderr)?;
    Ok(())
}

/// Prints the install plan without side effects.
fn run_dry(config: &InstallConfig, platform: &Platform, stderr: &mut dyn Write) -> Result<()> {
    platform.profile()?;
    let info = DryRunInfo { config, platform };
    write_stderr_line(stderr, info.display_text());
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, &err);
            err.exit_code()
        }
    }
}
