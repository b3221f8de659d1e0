//! HTTP seam for the fetch loop: a blocking `GET` returning status and body text.
//! The fetcher only talks to `HttpTransport`, so tests can script responses.

use crate::error::FetchError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;

/// What the fetcher needs from one HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpTransport {
    /// Issue a `GET` with the given headers. Non-2xx statuses are returned as responses,
    /// not errors; only failures to obtain a response at all map to `FetchError`.
    fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// Real transport on `reqwest`'s blocking client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout: None` disables the client's request timeout entirely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("logscore/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url.clone());
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.send().map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        let body = if status.is_success() {
            response.text().map_err(|e| FetchError::Transport(e.to_string()))?
        } else {
            // best-effort: the status is what matters on the failure path
            response.text().unwrap_or_default()
        };

        Ok(HttpResponse { status: status.as_u16(), status_text, body })
    }
}
