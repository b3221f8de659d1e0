//! Cursor-driven page loop. One request in flight at a time; request N+1 is only
//! built once response N has yielded its cursor.

use crate::error::FetchError;
use crate::query::{PageRequest, QueryFilters};
use crate::transport::HttpTransport;
use crate::window::TimeWindow;
use serde_json::Value;

/// One decoded page of the log API.
#[derive(Clone, Debug)]
pub struct PageResponse {
    body: Value,
    cursor: Option<String>,
}

impl PageResponse {
    /// Parse a page body. Missing `appLogs` reads as an empty page; a missing,
    /// null or empty `cursor` marks the last page.
    pub fn from_body(body: &str) -> Result<Self, FetchError> {
        let body: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(body))
    }

    pub fn from_value(body: Value) -> Self {
        let cursor = body
            .get("cursor")
            .and_then(|c| c.as_str())
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self { body, cursor }
    }

    pub fn entries(&self) -> &[Value] {
        self.body
            .get("appLogs")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// The full page body as received. Key order and number text survive
    /// re-encoding (`preserve_order` + `arbitrary_precision`).
    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Lazy page sequence. Yields `Ok(page)` until a page arrives without a cursor,
/// or a single `Err` after which the sequence is over.
///
/// With `max_pages == None` the server's cursor is the only stop signal: a server
/// that keeps returning one keeps this loop going.
pub struct PageFetcher<'a, T: HttpTransport + ?Sized> {
    transport: &'a T,
    auth_header: &'a str,
    filters: &'a QueryFilters,
    window: TimeWindow,
    cursor: Option<String>,
    max_pages: Option<usize>,
    pages: usize,
    done: bool,
}

impl<'a, T: HttpTransport + ?Sized> PageFetcher<'a, T> {
    pub fn new(transport: &'a T, auth_header: &'a str, filters: &'a QueryFilters, window: TimeWindow) -> Self {
        Self {
            transport,
            auth_header,
            filters,
            window,
            cursor: None,
            max_pages: None,
            pages: 0,
            done: false,
        }
    }

    pub fn max_pages(mut self, cap: Option<usize>) -> Self {
        self.max_pages = cap;
        self
    }

    /// Pages successfully fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    fn fetch_next(&mut self) -> Result<PageResponse, FetchError> {
        if let Some(cap) = self.max_pages {
            if self.pages >= cap {
                return Err(FetchError::PageLimit(cap));
            }
        }

        let url = PageRequest::new(self.filters, &self.window, self.cursor.as_deref()).url();
        let headers = [("Authorization", self.auth_header), ("Accept", "application/json")];
        let resp = self.transport.get(&url, &headers)?;

        if !resp.is_success() {
            return Err(FetchError::Status {
                status: resp.status,
                status_text: resp.status_text,
                body: resp.body,
            });
        }

        PageResponse::from_body(&resp.body)
    }
}

impl<'a, T: HttpTransport + ?Sized> Iterator for PageFetcher<'a, T> {
    type Item = Result<PageResponse, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.fetch_next() {
            Ok(page) => {
                self.pages += 1;
                self.cursor = page.cursor().map(str::to_string);
                self.done = self.cursor.is_none();
                tracing::debug!(
                    page = self.pages,
                    entries = page.entries().len(),
                    has_cursor = !self.done,
                    "fetched page"
                );
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                tracing::debug!(page = self.pages + 1, error = %e, "page fetch failed");
                Some(Err(e))
            }
        }
    }
}
