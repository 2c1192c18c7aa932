//! paperdash - Research paper dashboard
//!
//! Fetches accepted research papers and lets you search, sort, page through
//! and export them from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! paperdash list --query oncology --sort impact --order desc
//! paperdash show 42
//! paperdash export --format csv --output papers.csv
//! paperdash browse
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use paperdash::config::{default_config_path, Config};
use paperdash::dashboard::Dashboard;
use paperdash::debounce::Debouncer;
use paperdash::export::{self, ExportOptions};
use paperdash::query::{SortKey, SortOrder};
use paperdash::record::Paper;
use paperdash::render;
use paperdash::source::{FileSource, PaperSource, RecordSource};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Research paper dashboard
#[derive(Parser)]
#[command(name = "paperdash")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Config file (default: <config_dir>/paperdash/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL (overrides config and PAPERDASH_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Read records from a JSON file instead of the API
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct ListArgs {
    /// Search text (title, authors, journal, publisher, subject area)
    #[arg(short, long, default_value = "")]
    query: String,

    /// Sort key: date, impact or title
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Sort order: asc or desc
    #[arg(long, default_value = "desc")]
    order: SortOrder,
}

#[derive(Copy, Clone, ValueEnum)]
enum ExportFormat {
    Csv,
    Print,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of papers
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Papers per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show full details for one paper
    Show {
        /// Paper id
        id: String,
    },

    /// Export the filtered/sorted set
    Export {
        #[command(flatten)]
        list: ListArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (default: research_papers.csv / research_papers.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session with debounced search
    Browse,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show config file path
    Path,
    /// Show the effective configuration
    Show,
}

// ============================================================================
// Record source selection
// ============================================================================

enum AnySource {
    Http(PaperSource),
    File(FileSource),
}

impl RecordSource for AnySource {
    async fn fetch_records(&self) -> paperdash::Result<Vec<Paper>> {
        match self {
            AnySource::Http(s) => s.fetch_records().await,
            AnySource::File(s) => s.fetch_records().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::Http(s) => s.describe(),
            AnySource::File(s) => s.describe(),
        }
    }
}

fn build_source(config: &Config, input: Option<&Path>) -> Result<AnySource> {
    match input {
        Some(path) => Ok(AnySource::File(FileSource::new(path))),
        None => Ok(AnySource::Http(
            PaperSource::new(config).context("Failed to create HTTP client")?,
        )),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::resolve(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::List {
            list,
            page,
            page_size,
        } => {
            let source = build_source(&config, cli.input.as_deref())?;
            run_list(&config, &source, list, page, page_size).await
        }
        Commands::Show { id } => {
            let source = build_source(&config, cli.input.as_deref())?;
            run_show(&source, &id).await
        }
        Commands::Export {
            list,
            format,
            output,
        } => {
            let source = build_source(&config, cli.input.as_deref())?;
            run_export(&config, &source, list, format, output).await
        }
        Commands::Browse => {
            let source = build_source(&config, cli.input.as_deref())?;
            run_browse(&config, &source).await
        }
        Commands::Config { action } => handle_config(action, &config, cli.config.as_deref()),
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn load_dashboard(source: &AnySource, page_size: usize) -> Result<Dashboard> {
    let mut dash = Dashboard::new(page_size);
    dash.load(source)
        .await
        .with_context(|| format!("Failed to load papers from {}", source.describe()))?;
    Ok(dash)
}

fn apply_list_args(dash: &mut Dashboard, list: &ListArgs) {
    dash.apply_query(list.query.clone());
    dash.set_sort_key(list.sort);
    dash.set_sort_order(list.order);
}

async fn run_list(
    config: &Config,
    source: &AnySource,
    list: ListArgs,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let mut dash = load_dashboard(source, page_size.unwrap_or(config.page_size)).await?;
    apply_list_args(&mut dash, &list);
    dash.go_to_page(page);

    print!(
        "{}",
        render::page(&dash.view(), &dash.controls(), &config.date_format)
    );
    Ok(())
}

async fn run_show(source: &AnySource, id: &str) -> Result<()> {
    let dash = load_dashboard(source, 1).await?;
    let paper = dash
        .find(id)
        .with_context(|| format!("No paper with id {}", id))?;
    print!("{}", render::detail(paper));
    Ok(())
}

async fn run_export(
    config: &Config,
    source: &AnySource,
    list: ListArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut dash = load_dashboard(source, config.page_size).await?;
    apply_list_args(&mut dash, &list);
    let path = export_set(&dash, config, format, output)?;
    println!(
        "Saved {} papers to {}",
        dash.export_set().len(),
        path.display()
    );
    Ok(())
}

fn export_set(
    dash: &Dashboard,
    config: &Config,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let records = dash.export_set();
    let options = ExportOptions::with_date_format(config.date_format.clone());

    let path = match format {
        ExportFormat::Csv => {
            let path = output.unwrap_or_else(|| PathBuf::from(export::DEFAULT_CSV_FILENAME));
            export::write_csv(&path, &records, &options).context("Failed to write CSV")?;
            path
        }
        ExportFormat::Print => {
            let path = output.unwrap_or_else(|| PathBuf::from(export::DEFAULT_PRINT_FILENAME));
            export::write_printable(&path, &records, &options)
                .context("Failed to write printable export")?;
            path
        }
    };
    Ok(path)
}

fn handle_config(action: ConfigAction, config: &Config, explicit: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Path => match explicit {
            Some(path) => println!("Config file: {:?}", path),
            None => println!("Config file: {:?}", default_config_path()?),
        },
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}

// ============================================================================
// Interactive browse
// ============================================================================

const BROWSE_HELP: &str = "\
Type to search (applied after a short pause). Commands:
  :sort date|impact|title   :order [asc|desc]   :size N
  :page N   :next   :prev   :show ID   :close
  :refresh  :retry  :export csv|print [PATH]   :help   :quit";

fn print_view(dash: &Dashboard, config: &Config) {
    if let Some(message) = dash.error() {
        print!("{}", render::error_state(message));
        return;
    }
    if let Some(paper) = dash.selected() {
        print!("{}", render::detail(paper));
        println!("(:close to return to the list)");
        return;
    }
    let q = dash.query();
    println!(
        "search: {:?}  sort: {} {}  page size: {}",
        q.query, q.sort_key, q.sort_order, q.page_size
    );
    print!(
        "{}",
        render::page(&dash.view(), &dash.controls(), &config.date_format)
    );
}

async fn run_browse(config: &Config, source: &AnySource) -> Result<()> {
    let mut dash = Dashboard::new(config.page_size);
    println!("Loading research papers...");
    if let Err(e) = dash.load(source).await {
        debug!(error = %e, "Initial load failed");
    }
    print_view(&dash, config);
    println!("{}", BROWSE_HELP);

    let (mut debouncer, mut settled) = Debouncer::<String>::new(config.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                let line = line.trim_end().to_string();
                match line.strip_prefix(':') {
                    Some(command) => {
                        if !handle_browse_command(command, &mut dash, config, source).await? {
                            break;
                        }
                        print_view(&dash, config);
                    }
                    None => debouncer.push(line),
                }
            }
            Some(text) = settled.recv() => {
                debug!(query = %text, "Search settled");
                dash.clear_selection();
                if dash.apply_query(text) {
                    print_view(&dash, config);
                }
            }
        }
    }

    debouncer.cancel();
    info!("Browse session ended");
    Ok(())
}

/// Returns false when the session should end.
async fn handle_browse_command(
    command: &str,
    dash: &mut Dashboard,
    config: &Config,
    source: &AnySource,
) -> Result<bool> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();

    match (name, arg) {
        ("q" | "quit", _) => return Ok(false),
        ("help", _) => println!("{}", BROWSE_HELP),
        ("sort", Some(key)) => match key.parse::<SortKey>() {
            Ok(key) => {
                dash.set_sort_key(key);
            }
            Err(e) => println!("{}", e),
        },
        ("order", None) => dash.toggle_sort_order(),
        ("order", Some(order)) => match order.parse::<SortOrder>() {
            Ok(order) => {
                dash.set_sort_order(order);
            }
            Err(e) => println!("{}", e),
        },
        ("size", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => {
                dash.set_page_size(n);
            }
            _ => println!("page size must be a positive number"),
        },
        ("page", Some(n)) => match n.parse::<usize>() {
            Ok(n) => dash.go_to_page(n),
            Err(_) => println!("page must be a number"),
        },
        ("next", _) => dash.next_page(),
        ("prev", _) => dash.prev_page(),
        ("show", Some(id)) => {
            let found = dash.find(id).map(|p| p.id.clone());
            match found {
                Some(id) => {
                    dash.select(&id);
                }
                None => println!("No paper with id {}", id),
            }
        }
        ("close", _) => dash.clear_selection(),
        ("refresh" | "retry", _) => {
            println!("Loading research papers...");
            if let Err(e) = dash.refresh(source).await {
                debug!(error = %e, "Refresh failed");
            }
        }
        ("export", Some(kind)) => {
            let format = match kind {
                "csv" => ExportFormat::Csv,
                "print" | "pdf" => ExportFormat::Print,
                other => {
                    println!("unknown export format '{}' (csv or print)", other);
                    return Ok(true);
                }
            };
            let output = parts.next().map(PathBuf::from);
            match export_set(dash, config, format, output) {
                Ok(path) => println!("Saved {} papers to {}", dash.export_set().len(), path.display()),
                Err(e) => println!("Export failed: {:#}", e),
            }
        }
        _ => println!("unknown command ':{}' (:help for a list)", command),
    }
    Ok(true)
}
