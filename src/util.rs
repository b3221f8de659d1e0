use std::fs;
use std::path::Path;

pub const DEFAULT_DOTENV_PATH: &str = ".env";

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        // stderr: stdout carries the report
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

// -------- dotenv-style local configuration --------

/// Parse one `KEY=VALUE` line. Blank lines, `#` comments, lines without `=`
/// and lines with an empty key yield `None`. Key and value are trimmed.
pub fn parse_dotenv_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, val) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, val.trim()))
}

/// Load `path` into the process environment if it exists. Variables already set
/// are never overwritten. Returns how many variables were set.
/// Best-effort: an unreadable file is logged and skipped.
pub fn load_dotenv_if_present(path: &Path) -> usize {
    if !path.exists() {
        return 0;
    }
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "dotenv file present but unreadable; skipping");
            return 0;
        }
    };

    let mut applied = 0;
    for line in content.lines() {
        if let Some((key, val)) = parse_dotenv_line(line) {
            if std::env::var_os(key).is_none() {
                std::env::set_var(key, val);
                applied += 1;
            }
        }
    }
    tracing::debug!(path = %path.display(), applied, "loaded dotenv file");
    applied
}
