//! User configuration and command line.
//!
//! Values come from `~/.answer-term/config.json` (or `--config` /
//! `ANSWER_TERM_CONFIG`), then environment, then flags. A missing file means
//! defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::policy::{TrustedDomains, DEFAULT_TRUSTED_DOMAINS};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Parser)]
#[command(name = "answer-term", version, about = "Browse AI answers and preview their sources in the terminal")]
pub struct Cli {
    /// Transcript JSON file to display.
    pub transcript: PathBuf,

    /// Configuration file.
    #[arg(long, env = "ANSWER_TERM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the content/summarize/knowledgebase service.
    #[arg(long, env = "ANSWER_TERM_BACKEND")]
    pub backend: Option<String>,

    /// JSON library of notes and knowledgebase entries.
    #[arg(long)]
    pub notes: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub trusted_domains: Vec<String>,
    pub request_timeout_secs: u64,
    pub notes_path: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            trusted_domains: DEFAULT_TRUSTED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            notes_path: None,
            user_agent: concat!("answer-term/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    home.join(".answer-term").join("config.json")
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config JSON at {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load the file named by the command line (or the default one) and apply
    /// flag overrides.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        let mut config = Self::load(&path)?;
        config.apply_overrides(cli.backend.clone(), cli.notes.clone());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, backend: Option<String>, notes: Option<PathBuf>) {
        if let Some(backend) = backend.filter(|b| !b.trim().is_empty()) {
            self.backend_url = Some(backend);
        }
        if let Some(notes) = notes {
            self.notes_path = Some(notes);
        }
    }

    pub fn trusted(&self) -> TrustedDomains {
        self.trusted_domains.iter().collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
