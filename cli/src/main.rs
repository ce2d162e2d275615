//! CLI for Issue Mirror.
//!
//! Re-creates issues owned by one author under the automated identity the
//! token belongs to, with follow-up modes for comment replay, attribution
//! cleanup and parity verification.

use clap::Parser;
use issue_mirror::{
    Mode, RepoId, RunOutcome, Runner, RunnerConfig, RunnerError, DEFAULT_AUTHOR,
    DEFAULT_EXCLUDED_TICKET, DEFAULT_LOG_PATH, DEFAULT_MAPPING_PATH,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Mirror - Re-create one author's issues under an automated identity.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository in "owner/name" form.
    #[arg(long)]
    repo: String,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: String,

    /// Author login whose issues qualify for migration.
    #[arg(long, default_value = DEFAULT_AUTHOR)]
    author: String,

    /// Issue numbers to never migrate, replay, clean or verify.
    #[arg(long = "exclude", value_name = "NUMBER", default_values_t = [DEFAULT_EXCLUDED_TICKET])]
    exclude: Vec<u64>,

    /// Path of the mapping artifact.
    #[arg(long, default_value = DEFAULT_MAPPING_PATH)]
    mapping: PathBuf,

    /// Path of the comment-migration log.
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    log: PathBuf,

    /// Preview the creation run without creating anything.
    #[arg(long, group = "mode")]
    dry_run: bool,

    /// Replay missing comments onto already-mapped issues.
    #[arg(long, group = "mode")]
    comments_only: bool,

    /// Compare every mapped pair and report mismatches.
    #[arg(long, group = "mode")]
    verify: bool,

    /// Strip attribution headers from replayed comments.
    #[arg(long, group = "mode")]
    clean_attribution: bool,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.dry_run {
            Mode::DryRun
        } else if self.comments_only {
            Mode::CommentsOnly
        } else if self.verify {
            Mode::Verify
        } else if self.clean_attribution {
            Mode::CleanAttribution
        } else {
            Mode::Migrate
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(outcome) => {
            outcome.print();
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunOutcome, RunnerError> {
    let repo = RepoId::parse(&args.repo)?;
    let mode = args.mode();

    let config = RunnerConfig::new(repo, args.token, mode)
        .with_author(args.author)
        .with_exclusions(args.exclude.iter().copied().collect::<HashSet<u64>>())
        .with_mapping_path(args.mapping)
        .with_log_path(args.log);

    let runner = Runner::new(config)?;
    runner.run().await
}
