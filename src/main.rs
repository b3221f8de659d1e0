use anyhow::Result;
use clap::Parser;
use logscore::{
    init_tracing_once, load_dotenv_if_present, read_app_id, Credentials, Environment, LogExport, OutputMode,
    DEFAULT_BASE_URL, DEFAULT_DOTENV_PATH, DEFAULT_MANIFEST_PATH, DEFAULT_PAYLOAD_POINTER, DEFAULT_WINDOW_MINUTES,
};
use std::path::PathBuf;
use std::time::Duration;

/// Export recent app logs and rank the `[name](contact): score` lines found in them.
///
/// Credentials come from FORGE_API_EMAIL / FORGE_API_TOKEN (a `.env` file is
/// consulted for variables not already set). The app id is read from the
/// manifest unless given explicitly.
#[derive(Parser, Debug)]
#[command(name = "logscore")]
#[command(version)]
struct Cli {
    /// Window length in minutes ending now (clamped to 1..=60)
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW_MINUTES, allow_negative_numbers = true)]
    window_minutes: i64,

    /// aggregate: ranked JSON summary; raw: one NDJSON line per page
    #[arg(short = 'm', long, default_value = "aggregate")]
    mode: OutputMode,

    /// Output file (default ./summary.json for aggregate, ./export.log for raw)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// production | staging | development | <environment id>
    #[arg(short = 'e', long, default_value = "production")]
    environment: Environment,

    /// Log level filter; repeat for several
    #[arg(long = "level", default_values = ["INFO", "ERROR"])]
    levels: Vec<String>,

    /// Do not filter by level at all
    #[arg(long, conflicts_with = "levels")]
    all_levels: bool,

    /// Substring filter on the log message
    #[arg(long)]
    message: Option<String>,

    /// Installation/site scope filter; repeat for several
    #[arg(long = "scope")]
    scopes: Vec<String>,

    /// App id; overrides the manifest lookup
    #[arg(long)]
    app_id: Option<String>,

    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    manifest: PathBuf,

    #[arg(long, default_value = DEFAULT_DOTENV_PATH)]
    env_file: PathBuf,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// JSON pointer to the score text inside each log entry
    #[arg(long, default_value = DEFAULT_PAYLOAD_POINTER)]
    payload_pointer: String,

    /// Stop after this many pages even if the server keeps returning a cursor
    #[arg(long)]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Entries listed in the console summary
    #[arg(long, default_value_t = 10)]
    top: usize,

    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_once();

    load_dotenv_if_present(&cli.env_file);
    let creds = Credentials::from_env()?;
    let app_id = match cli.app_id {
        Some(id) => id,
        None => read_app_id(&cli.manifest)?,
    };

    let levels = if cli.all_levels { Vec::new() } else { cli.levels };

    let mut export = LogExport::new()
        .window_minutes(cli.window_minutes)
        .output_mode(cli.mode)
        .environment(cli.environment)
        .levels(levels)
        .scope_ids(cli.scopes)
        .base_url(cli.base_url)
        .payload_pointer(cli.payload_pointer)
        .max_pages(cli.max_pages)
        .request_timeout(cli.timeout_secs.map(Duration::from_secs))
        .top_n(cli.top)
        .progress(!cli.no_progress);
    if let Some(msg) = cli.message {
        export = export.message_filter(msg);
    }
    if let Some(out) = cli.output {
        export = export.output_path(out);
    }

    let summary = export.run(&creds, &app_id)?;
    tracing::debug!(pages = summary.pages, records = summary.outcome.records, "done");
    Ok(())
}
