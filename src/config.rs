use crate::window::DEFAULT_WINDOW_MINUTES;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.atlassian.com";
pub const DEFAULT_PAYLOAD_POINTER: &str = "/body/stringValue";
pub const DEFAULT_AGGREGATE_PATH: &str = "./summary.json";
pub const DEFAULT_RAW_PATH: &str = "./export.log";

/// Output durability strategy. Selected explicitly, never auto-detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Drain every page, then write the ranked score table once.
    #[default]
    Aggregate,
    /// Append each page body as one NDJSON line as soon as it arrives.
    Raw,
}

impl OutputMode {
    pub fn default_path(self) -> &'static str {
        match self {
            OutputMode::Aggregate => DEFAULT_AGGREGATE_PATH,
            OutputMode::Raw => DEFAULT_RAW_PATH,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Aggregate => f.write_str("aggregate"),
            OutputMode::Raw => f.write_str("raw"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggregate" | "summary" => Ok(OutputMode::Aggregate),
            "raw" | "ndjson" => Ok(OutputMode::Raw),
            other => Err(format!("unknown output mode '{other}' (expected aggregate|raw)")),
        }
    }
}

/// Deployment environments known to the log API, plus an escape hatch for raw ids.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
    Custom(String),
}

impl Environment {
    pub fn id(&self) -> &str {
        match self {
            Environment::Production => "f10b2a25-7c74-4df5-8717-05841514369a",
            Environment::Staging => "d325df3a-9f3c-4dab-84f4-b981f1b90d14",
            Environment::Development => "3b20b74f-8cb6-4b8e-8c9e-8bf11cc3d5a0",
            Environment::Custom(id) => id,
        }
    }
}

impl FromStr for Environment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err("environment must not be empty".into());
        }
        Ok(match t.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stg" => Environment::Staging,
            "development" | "dev" => Environment::Development,
            _ => Environment::Custom(t.to_string()),
        })
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub window_minutes: i64,          // clamped to [1, 60] when the window is resolved
    pub output_mode: OutputMode,
    pub output_path: Option<PathBuf>, // None -> mode default
    pub environment: Environment,
    pub levels: Vec<String>,          // sent as repeated `level` params
    pub message_filter: Option<String>,
    pub scope_ids: Vec<String>,       // sent as repeated `installationContext` params
    pub base_url: String,
    pub payload_pointer: String,      // JSON pointer to the score text inside a log entry
    pub max_pages: Option<usize>,     // None trusts the server's cursor as the only stop signal
    pub request_timeout: Option<Duration>,
    pub top_n: usize,
    pub progress: bool,

    pub write_buffer_bytes: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            output_mode: OutputMode::Aggregate,
            output_path: None,
            environment: Environment::Production,
            levels: vec!["INFO".to_string(), "ERROR".to_string()],
            message_filter: None,
            scope_ids: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            payload_pointer: DEFAULT_PAYLOAD_POINTER.to_string(),
            max_pages: None,
            request_timeout: None,
            top_n: 10,
            progress: true,

            write_buffer_bytes: 64 * 1024,
        }
    }
}

impl ExportOptions {
    pub fn with_window_minutes(mut self, minutes: i64) -> Self {
        self.window_minutes = minutes;
        self
    }
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.environment = env;
        self
    }
    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_message_filter(mut self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.message_filter = if msg.is_empty() { None } else { Some(msg) };
        self
    }
    pub fn with_scope_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope_ids = ids.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
    pub fn with_payload_pointer(mut self, ptr: impl Into<String>) -> Self {
        self.payload_pointer = ptr.into();
        self
    }
    pub fn with_max_pages(mut self, cap: Option<usize>) -> Self {
        self.max_pages = cap.map(|n| n.max(1));
        self
    }
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }

    /// Effective output path: the explicit one, or the default for the selected mode.
    pub fn resolved_output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.output_mode.default_path()))
    }
}
