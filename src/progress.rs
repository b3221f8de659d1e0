//! Page-count spinner shown while the fetch loop runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner that ticks once per fetched page. A disabled scope is a no-op.
pub struct PageProgress {
    pb: Option<ProgressBar>,
}

impl PageProgress {
    pub fn new<T: Into<String>>(label: T, enabled: bool) -> Self {
        if !enabled {
            return Self { pb: None };
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} pages: {pos}  elapsed: {elapsed_precise}") {
            pb.set_style(style);
        }
        pb.set_message(label.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb: Some(pb) }
    }

    #[inline]
    pub fn inc_page(&self) {
        if let Some(pb) = &self.pb {
            pb.inc(1);
        }
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb {
            pb.finish_with_message(msg.into());
        }
    }

    pub fn abandon<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb {
            pb.abandon_with_message(msg.into());
        }
    }
}
