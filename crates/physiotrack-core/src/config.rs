//! Runtime configuration.
//!
//! Resolved once by the host at startup and passed in; the core never reads
//! environment variables itself.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "physiotrack.db";
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:5173/";

/// Host configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    data_path: PathBuf,
    share_base_url: String,
    seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            share_base_url: DEFAULT_SHARE_BASE_URL.into(),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    pub fn new(data_path: PathBuf, share_base_url: String, seed_demo_data: bool) -> Self {
        Self {
            data_path,
            share_base_url,
            seed_demo_data,
        }
    }

    /// Build from optional overrides, keeping defaults for anything unset.
    ///
    /// `seed` accepts `1/0`, `true/false`, `yes/no`, `on/off`; anything else
    /// keeps the default.
    pub fn from_overrides(
        data_path: Option<PathBuf>,
        share_base_url: Option<String>,
        seed: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            data_path: data_path.unwrap_or(defaults.data_path),
            share_base_url: share_base_url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.share_base_url),
            seed_demo_data: seed.and_then(parse_flag).unwrap_or(defaults.seed_demo_data),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn share_base_url(&self) -> &str {
        &self.share_base_url
    }

    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
