//! CLI definitions and entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use super::commands;
use rollcall::output::OutputMode;

/// Exit code for a credited verification or a successful command
pub const EXIT_OK: u8 = 0;
/// Exit code for a policy rejection
pub const EXIT_REJECTED: u8 = 1;
/// Exit code for validation, store and configuration errors
pub const EXIT_ERROR: u8 = 2;

/// rollcall - Classroom attendance verification
#[derive(Parser, Debug)]
#[command(
    name = "rollcall",
    version,
    about = "Classroom attendance verification",
    long_about = "Credit attendance when a live face embedding matches a student's\n\
                  registered references and the request comes from the classroom network.\n\n\
                  Exit codes: 0 credited, 1 rejected by policy, 2 invalid input or store error."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ~/.config/rollcall/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a student's reference embeddings
    Register {
        /// Roster file
        #[arg(long, value_name = "FILE")]
        roster: PathBuf,

        /// JSON request with `student_id` and `embeddings` ("-" for stdin)
        #[arg(long, value_name = "FILE")]
        request: PathBuf,
    },

    /// Verify a live capture and credit attendance
    Verify {
        /// Roster file
        #[arg(long, value_name = "FILE")]
        roster: PathBuf,

        /// JSON request with `student_id` and `live_embedding` ("-" for stdin)
        #[arg(long, value_name = "FILE")]
        request: PathBuf,

        /// Transport peer address of the requesting device
        #[arg(long, value_name = "ADDR")]
        peer: Option<String>,

        /// Forwarded-for header value from a trusted proxy
        #[arg(long, value_name = "VALUE")]
        forwarded_for: Option<String>,

        /// Local wall-clock time to verify at (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_name = "TIME")]
        at: Option<String>,
    },

    /// Show configuration and roster summary
    Status {
        /// Roster file
        #[arg(long, value_name = "FILE")]
        roster: PathBuf,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = cli.config.as_deref();

    match cli.command {
        Some(Command::Register { roster, request }) => {
            commands::register(config, &roster, &request, output_mode)
        },
        Some(Command::Verify {
            roster,
            request,
            peer,
            forwarded_for,
            at,
        }) => commands::verify(
            config,
            &roster,
            &request,
            &commands::VerifyOrigin {
                peer,
                forwarded_for,
                at,
            },
            output_mode,
        ),
        Some(Command::Status { roster }) => commands::status(config, &roster, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("rollcall v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(ExitCode::from(EXIT_OK))
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("rollcall v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'rollcall --help' for usage");
            }
            Ok(ExitCode::from(EXIT_OK))
        },
    }
}
