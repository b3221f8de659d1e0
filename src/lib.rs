mod config;
mod window;
mod query;
mod error;
mod transport;
mod fetch;

mod extract;
mod aggregate;
mod ndjson;
mod sink;
mod progress;

mod credentials;
mod manifest;
mod util;
mod pipeline;

pub use crate::config::{Environment, ExportOptions, OutputMode, DEFAULT_BASE_URL, DEFAULT_PAYLOAD_POINTER};
pub use crate::window::{clamp_minutes, format_iso, TimeWindow, DEFAULT_WINDOW_MINUTES, MAX_WINDOW_MINUTES, MIN_WINDOW_MINUTES};
pub use crate::query::{PageRequest, QueryFilters};
pub use crate::pipeline::{LogExport, RunSummary};

// Fetch layer: typed errors, the HTTP seam, and the lazy page iterator.
pub use crate::error::FetchError;
pub use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use crate::fetch::{PageFetcher, PageResponse};

// Extraction + ranking.
pub use crate::extract::{extract_score, ScoreExtractor, ScoreRecord};
pub use crate::aggregate::{Ranking, ScoreBoard};

// Output sinks and the NDJSON writer they build on.
pub use crate::sink::{write_ranking, write_top_n, AggregateSink, RawSink, Sink, SinkOutcome};
pub use crate::ndjson::NdjsonWriter;
pub use crate::progress::PageProgress;

// Startup inputs: credentials, app id, dotenv, tracing.
pub use crate::credentials::{required_var, Credentials, EMAIL_VAR, TOKEN_VAR};
pub use crate::manifest::{parse_app_id, read_app_id, DEFAULT_MANIFEST_PATH};
pub use crate::util::{init_tracing_once, load_dotenv_if_present, parse_dotenv_line, DEFAULT_DOTENV_PATH};
