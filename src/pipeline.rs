use crate::config::{Environment, ExportOptions, OutputMode};
use crate::credentials::Credentials;
use crate::fetch::PageFetcher;
use crate::progress::PageProgress;
use crate::query::QueryFilters;
use crate::sink::{Sink, SinkOutcome};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::util::init_tracing_once;
use crate::window::TimeWindow;
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use time::OffsetDateTime;

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub window: TimeWindow,
    pub pages: usize,
    pub outcome: SinkOutcome,
}

/// One export run: window → pages → sink. Configure with the builder methods,
/// then call `run` (real HTTP) or `run_with` (any transport).
#[derive(Clone, Debug, Default)]
pub struct LogExport {
    pub(crate) opts: ExportOptions,
    anchor: Option<OffsetDateTime>,
}

impl LogExport {
    pub fn new() -> Self {
        Self { opts: ExportOptions::default(), anchor: None }
    }

    pub fn from_options(opts: ExportOptions) -> Self {
        Self { opts, anchor: None }
    }

    // -------- Builder methods --------
    pub fn window_minutes(mut self, minutes: i64) -> Self { self.opts = self.opts.with_window_minutes(minutes); self }
    pub fn output_mode(mut self, mode: OutputMode) -> Self { self.opts = self.opts.with_output_mode(mode); self }
    pub fn output_path(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_path(path); self }
    pub fn environment(mut self, env: Environment) -> Self { self.opts = self.opts.with_environment(env); self }
    pub fn levels<I, S>(mut self, levels: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> { self.opts = self.opts.with_levels(levels); self }
    pub fn message_filter(mut self, msg: impl Into<String>) -> Self { self.opts = self.opts.with_message_filter(msg); self }
    pub fn scope_ids<I, S>(mut self, ids: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> { self.opts = self.opts.with_scope_ids(ids); self }
    pub fn base_url(mut self, url: impl Into<String>) -> Self { self.opts = self.opts.with_base_url(url); self }
    pub fn payload_pointer(mut self, ptr: impl Into<String>) -> Self { self.opts = self.opts.with_payload_pointer(ptr); self }
    pub fn max_pages(mut self, cap: Option<usize>) -> Self { self.opts = self.opts.with_max_pages(cap); self }
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self { self.opts = self.opts.with_request_timeout(timeout); self }
    pub fn top_n(mut self, n: usize) -> Self { self.opts = self.opts.with_top_n(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }
    /// Pin "now" for the window instead of reading the clock at run time.
    pub fn anchor_time(mut self, now: OffsetDateTime) -> Self { self.anchor = Some(now); self }

    pub fn options(&self) -> &ExportOptions {
        &self.opts
    }

    pub fn resolve_window(&self) -> TimeWindow {
        match self.anchor {
            Some(now) => TimeWindow::resolve(self.opts.window_minutes, now),
            None => TimeWindow::last_minutes(self.opts.window_minutes),
        }
    }

    /// Run against the live API with a `reqwest` transport, reporting to stdout.
    pub fn run(&self, creds: &Credentials, app_id: &str) -> Result<RunSummary> {
        let transport = ReqwestTransport::new(self.opts.request_timeout)?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with(&transport, creds, app_id, &mut out)
    }

    /// Drive the page loop to completion through `transport`.
    ///
    /// Any fetch failure ends the run with an error: raw output keeps the pages
    /// written before it, aggregate output is not written at all.
    pub fn run_with<T, W>(&self, transport: &T, creds: &Credentials, app_id: &str, report: &mut W) -> Result<RunSummary>
    where
        T: HttpTransport + ?Sized,
        W: Write,
    {
        init_tracing_once();

        let window = self.resolve_window();
        let filters = QueryFilters::from_options(app_id, &self.opts)?;
        let auth = creds.basic_auth_header();
        let mode = self.opts.output_mode;
        let out_path = self.opts.resolved_output_path();

        tracing::info!(
            app_id,
            environment = filters.environment_id.as_str(),
            %window,
            %mode,
            output = %out_path.display(),
            "starting log export"
        );

        let mut sink = Sink::open(&self.opts)?;
        let progress = PageProgress::new("Fetching logs", self.opts.progress);
        writeln!(report, "Fetching logs...")?;

        let mut fetcher = PageFetcher::new(transport, &auth, &filters, window).max_pages(self.opts.max_pages);
        while let Some(next) = fetcher.next() {
            let page = match next {
                Ok(page) => page,
                Err(e) => {
                    let pages = fetcher.pages_fetched();
                    progress.abandon(format!("failed after {pages} pages"));
                    sink.abort();
                    return Err(anyhow::Error::new(e).context(format!("fetching logs (page {})", pages + 1)));
                }
            };
            progress.inc_page();
            write!(report, ".")?;
            report.flush()?;
            if let Err(e) = sink.on_page(&page) {
                progress.abandon("output write failed");
                sink.abort();
                return Err(e);
            }
        }

        let pages = fetcher.pages_fetched();
        progress.finish(format!("{pages} pages"));
        writeln!(report, "\nDone fetching.")?;

        let outcome = sink.complete(report)?;
        tracing::info!(pages, records = outcome.records, path = %outcome.output_path.display(), "log export finished");
        Ok(RunSummary { window, pages, outcome })
    }
}
