//! Query filters and per-page request rendering for the app-log endpoint.

use crate::config::ExportOptions;
use crate::window::TimeWindow;
use anyhow::{anyhow, Context, Result};
use reqwest::Url;

/// Read-only filters applied to every page request of a run.
#[derive(Clone, Debug)]
pub struct QueryFilters {
    endpoint: Url, // {base}/v1/app/logs/{resource_id}
    pub resource_id: String,
    pub environment_id: String,
    pub levels: Vec<String>,
    pub message: Option<String>,
    pub scope_ids: Vec<String>,
}

impl QueryFilters {
    /// Build filters for `resource_id` under `base_url` with no level/message/scope narrowing.
    pub fn new(base_url: &str, resource_id: impl Into<String>, environment_id: impl Into<String>) -> Result<Self> {
        let resource_id = resource_id.into();
        let mut endpoint = Url::parse(base_url).with_context(|| format!("invalid API base URL '{base_url}'"))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| anyhow!("API base URL '{base_url}' cannot carry a path"))?
            .pop_if_empty()
            .extend(["v1", "app", "logs", resource_id.as_str()]);
        Ok(Self {
            endpoint,
            resource_id,
            environment_id: environment_id.into(),
            levels: Vec::new(),
            message: None,
            scope_ids: Vec::new(),
        })
    }

    pub fn from_options(resource_id: impl Into<String>, opts: &ExportOptions) -> Result<Self> {
        let mut f = Self::new(&opts.base_url, resource_id, opts.environment.id())?;
        f.levels = opts.levels.clone();
        f.message = opts.message_filter.clone().filter(|m| !m.is_empty());
        f.scope_ids = opts.scope_ids.clone();
        Ok(f)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// One HTTP round trip's worth of parameters. Built, rendered, dropped.
#[derive(Clone, Copy, Debug)]
pub struct PageRequest<'a> {
    pub filters: &'a QueryFilters,
    pub window: &'a TimeWindow,
    pub cursor: Option<&'a str>,
}

impl<'a> PageRequest<'a> {
    pub fn new(filters: &'a QueryFilters, window: &'a TimeWindow, cursor: Option<&'a str>) -> Self {
        Self { filters, window, cursor }
    }

    /// Render the full request URL.
    /// `level` and `installationContext` are appended once per value, never comma-joined.
    pub fn url(&self) -> Url {
        let f = self.filters;
        let mut url = f.endpoint.clone();
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("environmentId", &f.environment_id);
            q.append_pair("startDate", &self.window.start_param());
            q.append_pair("endDate", &self.window.end_param());
            for lvl in &f.levels {
                q.append_pair("level", lvl);
            }
            if let Some(msg) = f.message.as_deref().filter(|m| !m.is_empty()) {
                q.append_pair("message", msg);
            }
            for scope in &f.scope_ids {
                q.append_pair("installationContext", scope);
            }
            if let Some(cursor) = self.cursor.filter(|c| !c.is_empty()) {
                q.append_pair("cursor", cursor);
            }
        }
        url
    }
}
