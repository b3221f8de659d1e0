//! App id lookup from the app descriptor (`manifest.yml`).
//! Only the `id: ari:...:app/<uuid>` line matters; the rest of the YAML is ignored.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_MANIFEST_PATH: &str = "manifest.yml";

static APP_ID_RE: OnceLock<Regex> = OnceLock::new();

fn app_id_re() -> &'static Regex {
    APP_ID_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*id:\s*ari:[^\n]*app/([0-9a-fA-F-]{36})").expect("app id pattern is valid")
    })
}

/// First `id: ari:...app/<uuid>` match in `text`, if any.
pub fn parse_app_id(text: &str) -> Option<String> {
    app_id_re().captures(text).map(|c| c[1].to_string())
}

pub fn read_app_id(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_app_id(&text).ok_or_else(|| {
        anyhow!("Unable to read app UUID from {} (id: ari:...:app/<uuid>)", path.display())
    })
}
