//! Curation Audit - follow and inspect curation pipeline audit logs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use curation_audit::commands::{self, CommandError};
use curation_audit::config::ConfigLoader;
use curation_audit::session::Baseline;

#[derive(Parser)]
#[command(
    name = "curation-audit",
    about = "Follow and inspect curation pipeline audit logs",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ./.curation-audit.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session log database (overrides the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FeedArgs {
    /// JSONL feed file, one event per line.
    feed: PathBuf,

    /// Session to follow (default: the session of the latest feed item).
    #[arg(short, long)]
    session: Option<String>,

    /// Read the feed from the start instead of the stored position.
    #[arg(long, conflicts_with = "skip")]
    from_start: bool,

    /// Skip the first N feed items.
    #[arg(long)]
    skip: Option<usize>,
}

impl FeedArgs {
    fn baseline(&self) -> Baseline {
        match (self.from_start, self.skip) {
            (true, _) => Baseline::Start,
            (false, Some(n)) => Baseline::At(n),
            (false, None) => Baseline::Auto,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read a feed file once into the session log.
    Replay(FeedArgs),
    /// Replay a feed file, then keep reading it as it grows.
    Follow(FeedArgs),
    /// Print the stored log of a session.
    Show {
        /// Session ID.
        session: String,
    },
    /// Write the copy text of a session to stdout or a file.
    Export {
        /// Session ID.
        session: String,
        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Clear the log of a session.
    Clear {
        /// Session ID.
        session: String,
        /// Feed file whose current items should be skipped afterwards.
        #[arg(long)]
        feed: Option<PathBuf>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let loader = cli.config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = loader.load()?;
    let mut store = commands::open_store(&config, cli.db.as_deref())?;
    let plain = cli.plain;

    match cli.command {
        Commands::Replay(args) => {
            commands::replay(
                &mut store,
                &args.feed,
                args.session.as_deref(),
                args.baseline(),
                plain,
            )
            .await?;
        }
        Commands::Follow(args) => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            commands::follow(
                &mut store,
                &args.feed,
                args.session.as_deref(),
                args.baseline(),
                plain,
                shutdown,
            )
            .await?;
        }
        Commands::Show { session } => {
            commands::show(&mut store, &session, plain)?;
        }
        Commands::Export { session, output } => {
            commands::export(&mut store, &session, output.as_deref())?;
        }
        Commands::Clear { session, feed } => {
            commands::clear(&mut store, &session, feed.as_deref(), plain).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
