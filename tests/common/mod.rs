#![allow(dead_code)]

use logscore::{Credentials, FetchError, HttpResponse, HttpTransport};
use reqwest::Url;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use time::macros::datetime;
use time::OffsetDateTime;

/// Fixed "now" so windows and URLs are deterministic.
pub const NOW: OffsetDateTime = datetime!(2025-03-01 12:00:00 UTC);

pub const APP_ID: &str = "0f3c2a1e-6b7d-4c8e-9a10-1b2c3d4e5f60";

/// One recorded request.
#[derive(Clone, Debug)]
pub struct Call {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl Call {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// All values of a query parameter, in order.
    pub fn params(&self, key: &str) -> Vec<String> {
        self.url.query_pairs().filter(|(k, _)| k == key).map(|(_, v)| v.into_owned()).collect()
    }
}

/// Transport that replays scripted outcomes in order and records every request.
/// Running past the script is a test bug and panics.
pub struct ScriptedTransport {
    script: RefCell<VecDeque<Result<HttpResponse, FetchError>>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, FetchError>>) -> Self {
        Self { script: RefCell::new(script.into()), calls: RefCell::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        self.calls.borrow_mut().push(Call {
            url: url.clone(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        self.script
            .borrow_mut()
            .pop_front()
            .expect("transport called more times than scripted")
    }
}

/// A log entry shaped like the API's: the message lives at `/body/stringValue`.
pub fn log_entry(msg: &str) -> Value {
    json!({
        "timestamp": "2025-03-01T11:59:00.000Z",
        "level": "INFO",
        "body": { "stringValue": msg }
    })
}

pub fn page_body(messages: &[&str], cursor: Option<&str>) -> Value {
    let logs: Vec<Value> = messages.iter().map(|m| log_entry(m)).collect();
    match cursor {
        Some(c) => json!({ "appLogs": logs, "cursor": c }),
        None => json!({ "appLogs": logs }),
    }
}

pub fn ok_page(messages: &[&str], cursor: Option<&str>) -> Result<HttpResponse, FetchError> {
    Ok(HttpResponse { status: 200, status_text: "OK".into(), body: page_body(messages, cursor).to_string() })
}

pub fn status_page(status: u16, status_text: &str, body: &str) -> Result<HttpResponse, FetchError> {
    Ok(HttpResponse { status, status_text: status_text.into(), body: body.into() })
}

pub fn test_creds() -> Credentials {
    Credentials::new("user@example.com", "secret")
}

pub fn scratch_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Read a JSONL file into values (skips empty lines).
pub fn read_jsonl_values(path: &Path) -> Vec<Value> {
    let f = File::open(path).unwrap();
    BufReader::new(f)
        .lines()
        .map(|l| l.unwrap())
        .filter(|s| !s.is_empty())
        .map(|s| serde_json::from_str(&s).unwrap())
        .collect()
}
