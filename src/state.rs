//! Persisted derived state.
//!
//! Lifecycle events write drift flags, diff text and identities into
//! this file; nothing here is ever fed back into argument building.
//! The file lives in the state directory and is loaded as default when
//! missing.

use anyhow::{Context, Result};
use carvelkit::{DerivedState, RenderState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

const STATE_FILE: &str = "state.toml";

/// State tracked for every resource caravela has reconciled.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaravelaState {
    /// Derived state per kapp-managed app, keyed by manifest name
    #[serde(default)]
    pub apps: BTreeMap<String, AppState>,

    /// Derived state per kbld template, keyed by manifest name
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateState>,

    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,
}

impl Default for CaravelaState {
    fn default() -> Self {
        Self {
            apps: BTreeMap::new(),
            templates: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }
}

/// Derived state for one app plus bookkeeping.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppState {
    #[serde(flatten)]
    pub derived: DerivedState,

    /// When the last lifecycle event ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event: Option<DateTime<Utc>>,
}

/// Derived state for one template plus bookkeeping.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TemplateState {
    #[serde(flatten)]
    pub render: RenderState,

    /// When the last render ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event: Option<DateTime<Utc>>,
}

impl CaravelaState {
    fn state_file() -> Result<PathBuf> {
        Ok(paths::state_dir()?.join(STATE_FILE))
    }

    /// Load state from disk, or return default if the file is missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::state_file()?)
    }

    /// Save state to the default location.
    pub fn save(&mut self) -> Result<()> {
        let path = Self::state_file()?;
        self.save_to(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded state from {}", path.display());
        Ok(state)
    }

    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        self.last_updated = Utc::now();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Get or create app state
    pub fn app_mut(&mut self, name: &str) -> &mut AppState {
        self.apps.entry(name.to_string()).or_default()
    }

    /// Get or create template state
    pub fn template_mut(&mut self, name: &str) -> &mut TemplateState {
        self.templates.entry(name.to_string()).or_default()
    }
}
