//! Helpers shared by the `qrtool` binary

use crate::config::Settings;
use crate::error::{QrError, Result};
use crate::utils::codec::to_base64;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Filter directives: a non-blank `RUST_LOG` wins, otherwise `debug` or `warn`
fn filter_directives(verbose: bool, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ if verbose => "debug".to_string(),
        _ => "warn".to_string(),
    }
}

/// Install a stderr fmt subscriber filtered by `RUST_LOG` or `--verbose`
pub fn init_tracing(verbose: bool) {
    let directives = filter_directives(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("ignoring invalid {}: {e}", EnvFilter::DEFAULT_ENV);
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Settings from an optional TOML file, otherwise defaults; env overrides apply to both
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path),
        None => Settings::from_env(),
    }
}

/// Read a whole file, rejecting empty files
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Err(QrError::InvalidInput(format!("{} is empty", path.display())));
    }
    Ok(bytes)
}

/// Read an image file and return it base64-encoded, as a request would carry it
pub fn logo_base64_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(to_base64(&read_bytes(path)?))
}
