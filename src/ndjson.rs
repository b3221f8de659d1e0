use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered NDJSON writer: one compact JSON document per line.
/// The file is created (or truncated) on `create`; `finish` flushes and closes it.
pub struct NdjsonWriter {
    path: PathBuf,
    w: Option<BufWriter<File>>,
    lines: u64,
}

impl NdjsonWriter {
    pub fn create(path: &Path, buf_bytes: usize) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            w: Some(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)),
            lines: 0,
        })
    }

    pub fn write_value<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if let Some(w) = &mut self.w {
            serde_json::to_writer(&mut *w, value).with_context(|| format!("write {}", self.path.display()))?;
            w.write_all(b"\n").with_context(|| format!("write {}", self.path.display()))?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered lines and close the file. Idempotent.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl Drop for NdjsonWriter {
    fn drop(&mut self) {
        if let Some(mut w) = self.w.take() {
            if let Err(e) = w.flush() {
                tracing::warn!(path = %self.path.display(), error = %e, "flush on drop failed");
            }
        }
    }
}
