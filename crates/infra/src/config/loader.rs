//! Settings loader
//!
//! ## Loading Strategy
//! 1. Use the explicit path if one is given
//! 2. Otherwise probe the standard locations
//! 3. Detect JSON or TOML by file extension
//! 4. Validate before returning
//!
//! Fields missing from the file keep their defaults, so a file may override
//! only what it cares about:
//!
//! ```toml
//! context_capacity = 100
//! ttl_ms = 3600000
//!
//! [compaction]
//! history_window = 30
//! ```
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./convointel.toml` or `./convointel.json` (current working directory)
//! 2. `./config/convointel.toml` or `./config/convointel.json`
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use convointel_domain::{CacheSettings, ConvoIntelError, Result};

const FILE_NAMES: [&str; 4] =
    ["convointel.toml", "convointel.json", "config/convointel.toml", "config/convointel.json"];

/// Load settings from a file
///
/// If `path` is `None`, probes the standard locations with
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `ConvoIntelError::Config` if:
/// - File not found (when path is specified)
/// - No settings file found (when path is `None`)
/// - File format is invalid
/// - The parsed settings fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<CacheSettings> {
    let settings_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConvoIntelError::Config(format!(
                    "Settings file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConvoIntelError::Config(
                "No settings file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %settings_path.display(), "Loading cache settings from file");

    let contents = std::fs::read_to_string(&settings_path)
        .map_err(|e| ConvoIntelError::Config(format!("Failed to read settings file: {}", e)))?;

    parse_settings(&contents, &settings_path)
}

/// Load settings from the standard locations, falling back to defaults
///
/// A file that exists but fails to parse or validate is an error; only a
/// missing file yields the defaults.
///
/// # Errors
/// Returns `ConvoIntelError::Config` for an unreadable or invalid file.
pub fn load_or_default() -> Result<CacheSettings> {
    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No cache settings file found, using defaults");
            Ok(CacheSettings::default())
        }
    }
}

/// Parse and validate settings from string content
///
/// Format is detected by file extension (`.json` or `.toml`); a path without
/// an extension is read as JSON.
///
/// # Errors
/// Returns `ConvoIntelError::Config` if the format is unsupported, parsing
/// fails or validation rejects the values.
pub fn parse_settings(contents: &str, path: &Path) -> Result<CacheSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let settings: CacheSettings = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConvoIntelError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConvoIntelError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => {
            return Err(ConvoIntelError::Config(format!(
                "Unsupported settings format: {}",
                extension
            )))
        }
    };

    settings.validate()?;
    Ok(settings)
}

/// Probe the standard locations for a settings file
///
/// # Returns
/// The first file found, or `None` if none exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    first_existing(&roots)
}

fn first_existing(roots: &[PathBuf]) -> Option<PathBuf> {
    candidates(roots).find(|path| path.is_file())
}

fn candidates(roots: &[PathBuf]) -> impl Iterator<Item = PathBuf> + '_ {
    roots.iter().flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
}
