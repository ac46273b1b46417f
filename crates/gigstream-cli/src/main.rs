#![forbid(unsafe_code)]

mod cmd;
mod output;
mod session;

use clap::{CommandFactory, Parser, Subcommand};
use gigstream_core::error::ErrorCode;
use output::OutputMode;
use session::{GlobalOpts, Session};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "gs: read and post to the Gigstream freelance marketplace",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of the lookup chain.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Network preset: localnet, devnet, testnet, or mainnet.
    #[arg(long, global = true)]
    network: Option<String>,

    /// Fullnode JSON-RPC URL (overrides --network).
    #[arg(long, global = true, value_name = "URL")]
    rpc_url: Option<String>,

    /// Serve ledger reads from a JSON snapshot instead of the network.
    #[arg(long, global = true, value_name = "FILE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn global_opts(&self) -> GlobalOpts {
        GlobalOpts {
            format: self.format,
            json: self.json,
            config: self.config.clone(),
            network: self.network.clone(),
            rpc_url: self.rpc_url.clone(),
            fixture: self.fixture.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Show platform counters",
        long_about = "Show freelancer, client, and job totals from the platform object.",
        after_help = "EXAMPLES:\n    # Show counters\n    gs stats\n\n    # Emit machine-readable output\n    gs stats --format json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Read",
        about = "List job listings",
        long_about = "List open job listings newest first, or slice the feed for a viewer.",
        after_help = "EXAMPLES:\n    # Every open listing\n    gs jobs\n\n    # Listings posted by me\n    gs jobs --viewer 0xc1 --view hire\n\n    # Open listings posted by others\n    gs jobs --viewer 0xc1 --view find-gig --format json"
    )]
    Jobs(cmd::jobs::JobsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show a client or freelancer profile",
        long_about = "Show the latest profile an address registered.",
        after_help = "EXAMPLES:\n    # Client profile\n    gs profile client 0xc1\n\n    # Freelancer profile\n    gs profile freelancer 0xf1 --format json"
    )]
    Profile(cmd::profile::ProfileArgs),

    #[command(
        next_help_heading = "Write",
        about = "Build a transaction payload",
        long_about = "Validate input and build an unsigned move-call payload for an external wallet.",
        after_help = "EXAMPLES:\n    # Register as a client\n    gs tx client-profile --name Ada --company Acme --description \"Widgets\"\n\n    # Post a job using the sender's latest client profile\n    gs tx post-job --sender 0xc1 --title \"Audit\" --description \"Review escrow\" \\\n        --skills \"Move, Rust\" --budget 5000 --deadline 2030-01-01 --format json"
    )]
    Tx(cmd::tx::TxArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Inspect configuration",
        after_help = "EXAMPLES:\n    # Show the effective configuration\n    gs config show"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    gs completions bash\n\n    # Generate zsh completions\n    gs completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GIGSTREAM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "gigstream=debug,info"
        } else {
            "gigstream=info,warn"
        })
    });

    let format = env::var("GIGSTREAM_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let project_root = env::current_dir()?;
    let session = match Session::load(&cli.global_opts(), &project_root) {
        Ok(session) => session,
        Err(e) => {
            let mode = output::resolve_output_mode(cli.format, cli.json, None);
            output::render_error(
                mode,
                &output::CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            return Err(e);
        }
    };
    debug!(output = ?session.output, source = ?session.source, "session ready");

    match &cli.command {
        Commands::Stats(args) => cmd::stats::run_stats(args, &session),
        Commands::Jobs(args) => cmd::jobs::run_jobs(args, &session),
        Commands::Profile(args) => cmd::profile::run_profile(args, &session),
        Commands::Tx(args) => cmd::tx::run_tx(args, &session),
        Commands::Config(args) => cmd::config::run_config(args, &session),
        Commands::Completions(_) => Ok(()),
    }
}
