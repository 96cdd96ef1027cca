//! commit-graph CLI entry point.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commit_graph::error_handling::{ErrorReporter, GraphError};
use commit_graph::git::{GitRepository, LogParser};
use commit_graph::graph::{GraphEngine, GraphViewModel, LayoutMode, NoRowGeometry};
use commit_graph::models::GraphInput;
use commit_graph::state::LayoutConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    BranchRows,
    Swimlane,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::BranchRows => LayoutMode::BranchRows,
            ModeArg::Swimlane => LayoutMode::Swimlane,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Lay out a commit graph and print the resulting view model.
#[derive(Parser, Debug)]
#[command(name = "commit-graph", version, about)]
struct Cli {
    /// Repository to read (defaults to the current directory)
    path: Option<PathBuf>,

    /// Read a saved `git log` dump instead of a repository ("-" for stdin)
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<String>,

    /// Remote names used to classify branches in a log dump
    #[arg(long = "remote", value_name = "NAME", default_value = "origin")]
    remotes: Vec<String>,

    /// Maximum number of commits to load
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Layout mode (overrides the config file)
    #[arg(short = 'm', long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(short = 'f', long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Layout config file (defaults to the user config)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("COMMIT_GRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<GraphError>() {
                Some(graph_error) => {
                    ErrorReporter::log_error(graph_error, "commit-graph");
                    eprintln!("error: {}", ErrorReporter::user_friendly_message(graph_error));
                }
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => LayoutConfig::load_from(path)?,
        None => LayoutConfig::load(),
    };
    if let Some(mode) = cli.mode {
        config.layout_mode = mode.into();
    }
    if let Some(limit) = cli.limit {
        config.commit_limit = limit;
    }

    let engine = GraphEngine::from_config(&config)?;
    let input = load_input(cli, &config)?;
    debug!("Building layout for {} records", input.commits.len());

    let view = engine.build(&input, &NoRowGeometry);
    let rendered = match cli.format {
        OutputFormat::Json => view.to_json()?,
        OutputFormat::Text => render_text(&view),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered)?;
    stdout.flush()?;
    Ok(())
}

fn load_input(cli: &Cli, config: &LayoutConfig) -> anyhow::Result<GraphInput> {
    if let Some(log_file) = &cli.log_file {
        let text = if log_file == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("cannot read stdin")?;
            buf
        } else {
            fs::read_to_string(log_file).with_context(|| format!("cannot read '{}'", log_file))?
        };
        let mut parsed = LogParser::new()?.parse(&text);
        parsed.commits.truncate(config.commit_limit);
        return Ok(parsed.into_input(cli.remotes.clone()));
    }

    let path = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let repository = GitRepository::discover(&path)?;
    Ok(repository.load_graph_input(config.commit_limit, config.include_remotes)?)
}

/// One line per commit: column, short sha, owner and subject.
fn render_text(view: &GraphViewModel) -> String {
    let mut out = String::new();
    for node in view.nodes() {
        let owner = node
            .owning_branch_key
            .as_ref()
            .map(|key| key.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if node.is_merge() { "◆" } else { "●" };
        out.push_str(&format!(
            "{:>3} {} {:<9} {:<30} {}\n",
            node.column,
            marker,
            node.short_sha(),
            owner,
            node.message
        ));
    }
    out.push_str(&format!(
        "{} commits, {} edges, {} lanes",
        view.nodes().len(),
        view.edges.len(),
        view.lane_count()
    ));
    out
}
