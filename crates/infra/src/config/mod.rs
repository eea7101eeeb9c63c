//! Cache settings loading
//!
//! Settings are read once, at initialization, from a JSON or TOML file.
//! Nothing is environment driven.

pub mod loader;

// Re-export commonly used items
pub use loader::{load_from_file, load_or_default, parse_settings, probe_config_paths};
