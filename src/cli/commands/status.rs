//! Show configuration and roster summary

use std::path::Path;
use std::process::ExitCode;

use rollcall::api;
use rollcall::output::{self, OutputMode};

use super::context::Context;
use crate::cli::app::{EXIT_ERROR, EXIT_OK};

/// Print the active configuration and roster counts
pub fn status(config_path: Option<&Path>, roster: &Path, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(config_path, roster)?;
    let result = api::status(&ctx.config, config_path, &ctx.roster);
    output::render_status(&result, mode);
    Ok(ExitCode::from(if result.is_ok() { EXIT_OK } else { EXIT_ERROR }))
}
