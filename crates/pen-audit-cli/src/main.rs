mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pen-audit",
    about = "Scan design exports for features and track their implementation",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .pen-audit/ or .git/)
    #[arg(long, global = true, env = "PEN_AUDIT_ROOT")]
    root: Option<PathBuf>,

    /// State file (default: config state_file, then .pen-audit/state.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect features in a decrypted design export and merge them into state
    Scan {
        /// Path to the design JSON
        design: PathBuf,
    },

    /// Completion summary by status and tier
    Status,

    /// List features, optionally filtered
    Show {
        /// Case-insensitive match on detector, name, node id, id or summary
        pattern: Option<String>,

        /// Only features with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Cheapest open features to work on next
    Next {
        /// Restrict to a tier (1-4)
        #[arg(long)]
        tier: Option<u8>,

        /// How many to show
        #[arg(long, short = 'n', default_value = "5")]
        count: usize,
    },

    /// Mark open features implemented, deferred or out_of_scope
    Resolve {
        /// implemented | deferred | out_of_scope
        status: String,

        /// Feature ids, node ids or id substrings
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Match open screens against a web app's page files
    Match {
        /// Project containing the app (default: root)
        #[arg(long)]
        project: Option<PathBuf>,

        /// App subdirectory inside the project (overrides config)
        #[arg(long)]
        app_subdir: Option<String>,

        /// Report matches without updating state
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let ctx = match cmd::Context::load(root, cli.state, cli.json) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Scan { design } => cmd::scan::run(&ctx, &design),
        Commands::Status => cmd::status::run(&ctx),
        Commands::Show { pattern, status } => {
            cmd::show::run(&ctx, pattern.as_deref(), status.as_deref())
        }
        Commands::Next { tier, count } => cmd::next::run(&ctx, tier, count),
        Commands::Resolve { status, patterns } => cmd::resolve::run(&ctx, &status, &patterns),
        Commands::Match {
            project,
            app_subdir,
            dry_run,
        } => cmd::matching::run(&ctx, project.as_deref(), app_subdir, dry_run),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
