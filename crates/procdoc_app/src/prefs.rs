use std::fs;
use std::path::Path;

use client_logging::{client_error, client_info, client_warn};
use procdoc_client::AtomicFileWriter;
use serde::{Deserialize, Serialize};

const PREFS_FILENAME: &str = ".procdoc.ron";

/// Persisted CLI defaults. Everything is optional; command-line flags win.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prefs {
    pub base_url: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub agent_type: Option<String>,
}

/// Read preferences from `{dir}/.procdoc.ron`. Missing or unparsable files
/// degrade to defaults; a bad prefs file must never block the CLI.
pub fn load(dir: &Path) -> Prefs {
    let path = dir.join(PREFS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Prefs::default();
        }
        Err(err) => {
            client_warn!("Failed to read preferences from {:?}: {}", path, err);
            return Prefs::default();
        }
    };

    match ron::from_str(&content) {
        Ok(prefs) => prefs,
        Err(err) => {
            client_warn!("Failed to parse preferences from {:?}: {}", path, err);
            Prefs::default()
        }
    }
}

pub fn save(dir: &Path, prefs: &Prefs) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(prefs, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize preferences: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    match writer.write(PREFS_FILENAME, &content) {
        Ok(path) => client_info!("Saved preferences to {:?}", path),
        Err(err) => client_error!("Failed to write preferences to {:?}: {}", dir, err),
    }
}
