//! Register a student's reference embeddings

use std::path::Path;
use std::process::ExitCode;

use rollcall::api;
use rollcall::core::services::{Orchestrator, Stores};
use rollcall::output::{self, OutputMode};

use super::context::{Context, read_request};
use crate::cli::app::{EXIT_ERROR, EXIT_OK};

/// Store a full reference set from a `RegisterRequest` file
pub fn register(
    config_path: Option<&Path>,
    roster: &Path,
    request: &Path,
    mode: OutputMode,
) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(config_path, roster)?;
    let clock = ctx.config.clock()?;
    let orchestrator = Orchestrator::new(
        Stores::uniform(&ctx.roster),
        &clock,
        ctx.config.verification_policy(),
    )
    .with_key_format(ctx.config.key_format()?);

    let result = api::parse_register_request(&read_request(request)?)
        .and_then(|req| api::register(&orchestrator, &req));
    output::render_registration(&result, mode);

    Ok(ExitCode::from(if result.is_ok() { EXIT_OK } else { EXIT_ERROR }))
}
