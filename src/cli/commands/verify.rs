//! Verify a live capture and credit attendance

use std::path::Path;
use std::process::ExitCode;

use anyhow::bail;
use chrono::NaiveDateTime;
use rollcall::adapters::{FixedClock, RequestOrigin};
use rollcall::api;
use rollcall::core::ports::Clock;
use rollcall::core::services::{Orchestrator, Stores};
use rollcall::output::{self, OutputMode};

use super::context::{Context, read_request};
use crate::cli::app::{EXIT_ERROR, EXIT_OK, EXIT_REJECTED};

/// Where and when the request happened
#[derive(Debug, Default)]
pub struct VerifyOrigin {
    /// Transport peer address
    pub peer: Option<String>,
    /// Forwarded-for header value
    pub forwarded_for: Option<String>,
    /// Override for the local wall-clock time
    pub at: Option<String>,
}

/// Decide a `VerifyRequest` file and credit attendance on success
pub fn verify(
    config_path: Option<&Path>,
    roster: &Path,
    request: &Path,
    origin: &VerifyOrigin,
    mode: OutputMode,
) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(config_path, roster)?;

    let system_clock = ctx.config.clock()?;
    let fixed_clock = origin.at.as_deref().map(parse_at).transpose()?.map(FixedClock);
    let clock: &dyn Clock = match &fixed_clock {
        Some(fixed) => fixed,
        None => &system_clock,
    };

    let orchestrator = Orchestrator::new(
        Stores::uniform(&ctx.roster),
        clock,
        ctx.config.verification_policy(),
    )
    .with_subnet_policy(ctx.config.subnet_policy())
    .with_key_format(ctx.config.key_format()?);

    let address = RequestOrigin {
        forwarded_for: origin.forwarded_for.clone(),
        peer: origin.peer.clone(),
    };

    let result = api::parse_verify_request(&read_request(request)?)
        .and_then(|req| api::verify(&orchestrator, &req, &address));
    output::render_verification(&result, mode);

    let code = match &result {
        Ok(outcome) if outcome.is_credited() => EXIT_OK,
        Ok(_) => EXIT_REJECTED,
        Err(_) => EXIT_ERROR,
    };
    Ok(ExitCode::from(code))
}

fn parse_at(raw: &str) -> anyhow::Result<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw.trim(), format) {
            return Ok(at);
        }
    }
    bail!("invalid --at time {raw:?}, expected YYYY-MM-DDTHH:MM[:SS]")
}
