//! Output sinks for the two durability modes.
//!
//! - Aggregate: pages feed a `ScoreBoard`; the ranking is written once, only after
//!   the page loop drained cleanly. A failed run leaves no summary file behind.
//! - Raw: the output file is truncated up front and every page body is appended as
//!   an NDJSON line on arrival, so pages fetched before a failure stay on disk.

use crate::aggregate::{Ranking, ScoreBoard};
use crate::config::{ExportOptions, OutputMode};
use crate::extract::ScoreExtractor;
use crate::fetch::PageResponse;
use crate::ndjson::NdjsonWriter;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What a completed sink produced.
#[derive(Clone, Debug)]
pub struct SinkOutcome {
    pub mode: OutputMode,
    pub output_path: PathBuf,
    /// Ranked entries (aggregate) or page lines (raw).
    pub records: u64,
    pub ranking: Option<Ranking>,
}

pub struct AggregateSink {
    path: PathBuf,
    board: ScoreBoard,
    extractor: ScoreExtractor,
    top_n: usize,
}

impl AggregateSink {
    pub fn new(path: &Path, extractor: ScoreExtractor, top_n: usize) -> Self {
        Self { path: path.to_path_buf(), board: ScoreBoard::new(), extractor, top_n }
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }
}

pub struct RawSink {
    writer: NdjsonWriter,
}

pub enum Sink {
    Aggregate(AggregateSink),
    Raw(RawSink),
}

impl Sink {
    /// Prepare the sink for a run. Raw mode creates/truncates its file here, so an
    /// unwritable path fails the run before any request goes out.
    pub fn open(opts: &ExportOptions) -> Result<Self> {
        let path = opts.resolved_output_path();
        match opts.output_mode {
            OutputMode::Aggregate => Ok(Sink::Aggregate(AggregateSink::new(
                &path,
                ScoreExtractor::json_pointer(opts.payload_pointer.clone()),
                opts.top_n,
            ))),
            OutputMode::Raw => Ok(Sink::Raw(RawSink { writer: NdjsonWriter::create(&path, opts.write_buffer_bytes)? })),
        }
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            Sink::Aggregate(_) => OutputMode::Aggregate,
            Sink::Raw(_) => OutputMode::Raw,
        }
    }

    /// Hand one page to the sink. Returns the number of new scores (aggregate)
    /// or lines written (raw).
    pub fn on_page(&mut self, page: &PageResponse) -> Result<usize> {
        match self {
            Sink::Aggregate(s) => Ok(s.board.ingest_page(page, &s.extractor)),
            Sink::Raw(s) => {
                s.writer.write_value(page.body())?;
                Ok(1)
            }
        }
    }

    /// Failure path: raw output is flushed and closed, aggregate state is dropped unwritten.
    pub fn abort(self) {
        match self {
            Sink::Aggregate(s) => {
                tracing::warn!(scores = s.board.len(), path = %s.path.display(), "run failed; summary not written");
            }
            Sink::Raw(mut s) => {
                let lines = s.writer.lines_written();
                if let Err(e) = s.writer.finish() {
                    tracing::warn!(error = %e, "closing raw output after failure");
                }
                tracing::warn!(pages = lines, path = %s.writer.path().display(), "run failed; kept pages written so far");
            }
        }
    }

    /// Success path: persist and report to `report`.
    pub fn complete<W: Write>(self, report: &mut W) -> Result<SinkOutcome> {
        match self {
            Sink::Aggregate(s) => {
                let ranking = s.board.finalize();
                write_ranking(&s.path, &ranking)?;
                writeln!(report, "\nSummary written to {}", s.path.display())?;
                write_top_n(report, &ranking, s.top_n)?;
                writeln!(report, "\nWrote {} ranked entries.", ranking.len())?;
                Ok(SinkOutcome {
                    mode: OutputMode::Aggregate,
                    output_path: s.path,
                    records: ranking.len() as u64,
                    ranking: Some(ranking),
                })
            }
            Sink::Raw(mut s) => {
                s.writer.finish()?;
                let lines = s.writer.lines_written();
                writeln!(report, "\nWrote {} pages to {}", lines, s.writer.path().display())?;
                Ok(SinkOutcome {
                    mode: OutputMode::Raw,
                    output_path: s.writer.path().to_path_buf(),
                    records: lines,
                    ranking: None,
                })
            }
        }
    }
}

/// Overwrite `path` with the ranking as a pretty JSON object in rank order.
pub fn write_ranking(path: &Path, ranking: &Ranking) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, ranking).with_context(|| format!("write {}", path.display()))?;
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// `Top N:` header followed by `rank. key: value` lines, 1-indexed.
pub fn write_top_n<W: Write>(out: &mut W, ranking: &Ranking, n: usize) -> std::io::Result<()> {
    writeln!(out, "\nTop {}:", n)?;
    for (idx, (key, val)) in ranking.top(n).iter().enumerate() {
        writeln!(out, "{}. {}: {}", idx + 1, key, val)?;
    }
    Ok(())
}
