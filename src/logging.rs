use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogRotation, LoggingConfig};

/// Keeps the non-blocking file writer alive; drop it only at shutdown.
#[allow(dead_code)]
pub struct LogGuard(Option<tracing_appender::non_blocking::WorkerGuard>);

/// Initialize process logging.
///
/// Logs go to stdout unless `logging.file` is set, in which case they are
/// written through a non-blocking appender (single file or daily rolling).
/// `RUST_LOG` overrides the configured filter.
pub fn init(config: &LoggingConfig) -> Result<LogGuard> {
    let (writer, guard, log_path): (BoxMakeWriter, _, Option<PathBuf>) = match config.file.as_deref() {
        None => (BoxMakeWriter::new(std::io::stdout), None, None),
        Some(raw) => {
            let path = PathBuf::from(expand_tilde(raw));
            let (non_blocking, guard) = match config.rotation {
                LogRotation::None => {
                    ensure_parent_dir(&path)?;
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&path)
                        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                    tracing_appender::non_blocking(file)
                }
                LogRotation::Daily => {
                    let (dir, base_name) = split_dir_and_name(&path)?;
                    std::fs::create_dir_all(&dir).with_context(|| {
                        format!("Failed to create log directory: {}", dir.display())
                    })?;
                    let appender = tracing_appender::rolling::daily(&dir, &base_name);
                    tracing_appender::non_blocking(appender)
                }
            };
            (BoxMakeWriter::new(non_blocking), Some(guard), Some(path))
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(log_path.is_none())
        .with_target(true)
        .with_writer(writer);

    // If already initialized (e.g., in tests), don't crash.
    if config.json {
        builder.json().try_init().ok();
    } else {
        builder.try_init().ok();
    }

    if let Some(path) = &log_path {
        tracing::info!(log_file = %path.display(), rotation = ?config.rotation, "writing logs to file");
    }

    Ok(LogGuard(guard))
}

fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    Ok(())
}

fn split_dir_and_name(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid logging.file: not valid UTF-8")?
        .to_string();
    Ok((dir, name))
}

/// Key prefixes used by the upstream providers.
const SECRET_PREFIXES: &[&str] = &["sk-", "tvly-"];

/// Best-effort redaction for common API key patterns (`sk-...`, `tvly-...`).
pub fn redact_secrets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut last = 0usize;
    let mut i = 0usize;

    while i < input.len() {
        if let Some(prefix) = SECRET_PREFIXES.iter().find(|p| input[i..].starts_with(**p)) {
            let start = i + prefix.len();
            let mut j = start;
            while j < input.len() {
                match bytes[j] {
                    b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => j += 1,
                    _ => break,
                }
            }

            // Require a minimum length to reduce false positives.
            if j.saturating_sub(start) >= 8 {
                out.push_str(&input[last..i]);
                out.push_str(prefix);
                out.push_str("***REDACTED***");
                last = j;
                i = j;
                continue;
            }
        }

        let ch_len = input[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        i += ch_len;
    }

    out.push_str(&input[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_anthropic_and_tavily_keys() {
        let input = "bad key sk-ant-api03-abcdefghijk and tvly-0123456789abc here";
        let out = redact_secrets(input);
        assert_eq!(out, "bad key sk-***REDACTED*** and tvly-***REDACTED*** here");
    }

    #[test]
    fn short_tokens_are_left_alone() {
        assert_eq!(redact_secrets("sk-abc task-list"), "sk-abc task-list");
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(redact_secrets("résumé ✓"), "résumé ✓");
    }

    #[test]
    fn split_dir_defaults_to_current_dir() {
        let (dir, name) = split_dir_and_name(Path::new("server.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "server.log");
    }
}
