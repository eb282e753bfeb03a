mod cmd_generate;
mod cmd_log;
mod cmd_preview;
mod cmd_styles;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skald", version, about = "Turn a git commit range into a narrative slide deck")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a slide deck from a range of commit history
    Generate {
        /// Starting commit (inclusive). Defaults to a window of the last 12 commits.
        #[arg(long)]
        from: Option<String>,
        /// Output directory for the deck
        #[arg(long)]
        out: Option<PathBuf>,
        /// Visual theme name written into the deck headmatter
        #[arg(long)]
        theme: Option<String>,
        /// Prompt style preset (see `skald styles`)
        #[arg(long)]
        style: Option<String>,
        /// Custom style file (YAML: name, instructions, tone)
        #[arg(long)]
        prompt_file: Option<PathBuf>,
        /// Config file path (defaults to ./skald.json when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Model identifier for the generation capability
        #[arg(long)]
        model: Option<String>,
        /// Skip the generation capability and render the deterministic deck
        #[arg(long)]
        no_ai: bool,
        /// Topic to emphasize across the deck
        #[arg(long)]
        focus: Option<String>,
        /// Intended audience (e.g. "leadership", "new contributors")
        #[arg(long)]
        audience: Option<String>,
        /// Go deeper on implementation detail
        #[arg(long)]
        deep_dive: bool,
        /// Include concrete change numbers on slides
        #[arg(long)]
        metrics: bool,
        /// Call out difficulties and how they were resolved
        #[arg(long)]
        challenges: bool,
        /// Present the work as a team of this size
        #[arg(long)]
        team_size: Option<u32>,
        /// Print the deck to stdout instead of writing it
        #[arg(long)]
        dry_run: bool,
        /// Launch the companion preview process after writing
        #[arg(long)]
        preview: bool,
    },
    /// List recent commits, newest first (for picking a starting point)
    Log {
        /// Maximum number of commits to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Output as JSON lines (one commit per line)
        #[arg(long)]
        json: bool,
    },
    /// List the built-in prompt styles
    Styles,
    /// Launch the companion preview process for an existing deck
    Preview {
        /// Deck directory
        #[arg(long, default_value = "slides")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SKALD_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Generate {
            from,
            out,
            theme,
            style,
            prompt_file,
            config,
            model,
            no_ai,
            focus,
            audience,
            deep_dive,
            metrics,
            challenges,
            team_size,
            dry_run,
            preview,
        } => cmd_generate::execute(cmd_generate::GenerateParams {
            repo_root: &repo_root,
            from: from.as_deref(),
            out,
            theme,
            style,
            prompt_file,
            config_path: config,
            model,
            no_ai,
            focus,
            audience,
            deep_dive,
            metrics,
            challenges,
            team_size,
            dry_run,
            preview,
        }),
        Command::Log { limit, json } => cmd_log::execute(&repo_root, limit, json),
        Command::Styles => cmd_styles::execute(),
        Command::Preview { out } => cmd_preview::execute(&out),
    }
}
