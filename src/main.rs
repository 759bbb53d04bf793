//! navto: navigate-to symbol search over a workspace manifest
//!
//! Loads a JSON workspace manifest (projects, documents, declarations) and runs
//! a priority-scheduled fuzzy search over it, printing results in display order.
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use navto::cli::{CliCallback, OutputFormat, OutputWriter, ProgressReporter};
use navto::remote::{InProcessRemoteHost, LocalTransport};
use navto::search::{LoadStatus, NavigateToEngine, NavigateToSearchCallback, SearchScope};
use navto::workspace::manifest::WorkspaceManifest;
use navto::workspace::{DocumentId, Solution};
use navto::{KindFilter, NavigateToOptions};

#[derive(Parser)]
#[command(name = "navto")]
#[command(about = "Incremental navigate-to symbol search", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search declarations by fuzzy name
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Pattern, e.g. `Foo`, `FB`, `Sys.Con` or `get user`
    pattern: String,

    /// Workspace manifest (JSON)
    #[arg(short, long)]
    workspace: PathBuf,

    /// Comma-separated kinds to include (defaults to all)
    #[arg(short, long)]
    kinds: Option<String>,

    /// Path of the document the user is editing
    #[arg(long)]
    active: Option<String>,

    /// Paths of other visible documents
    #[arg(long, num_args = 1..)]
    visible: Vec<String>,

    /// Options file (TOML)
    #[arg(short, long, default_value = "navto.toml")]
    config: PathBuf,

    /// Pretend the workspace is still loading: search cached indices only
    #[arg(long)]
    not_fully_loaded: bool,

    /// Route the search through the in-process remote host
    #[arg(long)]
    remote: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormatArg,

    /// No progress lines on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Aligned text, one line per result
    Text,
    /// Standard JSON array (pretty-printed)
    Json,
    /// Newline-delimited JSON (streaming)
    Ndjson,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Ndjson => OutputFormat::Ndjson,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose)?;

    match cli.command {
        Commands::Search(args) => run_search(args).await,
    }
}

/// Console logging on stderr through a non-blocking writer
fn init_logging(verbose: bool) -> Result<WorkerGuard> {
    let default_directive = if verbose { "navto=debug" } else { "navto=info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .context("Failed to build log filter")?;

    let (non_blocking_stderr, guard) = non_blocking(std::io::stderr());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking_stderr)
                .with_target(false)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let options = NavigateToOptions::load(&args.config)
        .with_context(|| format!("Failed to load options from {}", args.config.display()))?;
    let kinds = match &args.kinds {
        Some(list) => KindFilter::parse_list(list).map_err(anyhow::Error::msg)?,
        None => KindFilter::all(),
    };

    let (solution, builder) = WorkspaceManifest::load(&args.workspace)?.into_workspace();
    let solution = Arc::new(solution);
    let scope = SearchScope::new(
        args.active.as_deref().map(|path| resolve_path(&solution, path)).transpose()?,
        args.visible
            .iter()
            .map(|path| resolve_path(&solution, path))
            .collect::<Result<Vec<_>>>()?,
    );

    let builder = Arc::new(builder);
    let status = Arc::new(LoadStatus::new(!args.not_fully_loaded));
    let mut engine = NavigateToEngine::new(builder.clone(), status, options.clone());
    if args.remote {
        let host_transport = LocalTransport::new(
            solution.clone(),
            builder.clone(),
            Arc::new(options.matcher()),
            engine.cache().clone(),
        );
        engine = engine.with_remote_host(Arc::new(InProcessRemoteHost::new(host_transport)));
        debug!("Searching through the in-process remote host");
    }

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Interrupted, cancelling search");
            ctrl_c_cancel.cancel();
        }
    });

    let progress = ProgressReporter::new(args.quiet);
    let callback = Arc::new(CliCallback::new(
        &args.pattern,
        OutputWriter::new(args.output.into()),
        progress,
    ));
    let search_callback: Arc<dyn NavigateToSearchCallback> = callback.clone();

    engine
        .search(solution, &args.pattern, &kinds, &scope, search_callback, &cancel)
        .await
        .with_context(|| format!("Search for '{}' failed", args.pattern))?;

    callback.finish()?;
    if callback.result_count() == 0 && !callback.was_fully_loaded() {
        debug!("No results yet; the workspace is still loading");
    }
    Ok(())
}

fn resolve_path(solution: &Solution, path: &str) -> Result<DocumentId> {
    let found = solution
        .projects()
        .iter()
        .flat_map(|project| project.documents.iter())
        .find(|document| document.file_path.as_ref() == path);
    match found {
        Some(document) => Ok(document.id),
        None => bail!("No document '{}' in the workspace", path),
    }
}
