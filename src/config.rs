//! Manifest loading.
//!
//! The manifest is a TOML file listing kapp-managed apps and
//! kbld-templated resources. Each entry is validated once at load and
//! turned into the typed records carvelkit operates on.

use anyhow::{bail, Context, Result};
use carvelkit::{DeployConfig, TemplateConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Default manifest file name inside the config directory
const MANIFEST_FILE: &str = "caravela.toml";

/// The user's manifest: apps and templates keyed by name.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub apps: BTreeMap<String, AppEntry>,
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateEntry>,
}

/// One kapp-managed app in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppEntry {
    pub namespace: String,
    #[serde(default)]
    pub config_yaml: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub diff_changes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_context: Option<u32>,
    #[serde(default)]
    pub debug_logs: bool,
}

impl AppEntry {
    /// Build the typed record for this app, with its manifest key as
    /// the app name.
    pub fn to_config(&self, name: &str) -> DeployConfig {
        DeployConfig {
            app: name.to_string(),
            namespace: self.namespace.clone(),
            config_yaml: self.config_yaml.clone(),
            files: self.files.clone(),
            diff_changes: self.diff_changes,
            diff_context: self.diff_context,
            debug_logs: self.debug_logs,
        }
    }
}

/// One kbld-templated resource in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateEntry {
    #[serde(default)]
    pub config_yaml: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub debug_logs: bool,
}

impl TemplateEntry {
    pub fn to_config(&self) -> TemplateConfig {
        TemplateConfig {
            config_yaml: self.config_yaml.clone(),
            files: self.files.clone(),
            debug_logs: self.debug_logs,
        }
    }
}

impl Manifest {
    /// Default manifest path inside the config directory.
    pub fn default_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join(MANIFEST_FILE))
    }

    /// Load the manifest from `path`, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read manifest {}", path.display()))?;
        let manifest: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        for (name, app) in &self.apps {
            if name.is_empty() {
                bail!("App entries need a non-empty name");
            }
            if app.namespace.is_empty() {
                bail!("App {name} is missing a namespace");
            }
        }
        for (name, template) in &self.templates {
            if template.files.is_empty() && template.config_yaml.is_empty() {
                bail!("Template {name} needs files or config_yaml");
            }
        }
        Ok(())
    }

    /// Select apps by name, or all of them.
    pub fn select_apps(&self, name: Option<&str>) -> Result<Vec<(&String, &AppEntry)>> {
        match name {
            Some(n) => match self.apps.get_key_value(n) {
                Some(pair) => Ok(vec![pair]),
                None => bail!("App {n} is not in the manifest"),
            },
            None => Ok(self.apps.iter().collect()),
        }
    }

    /// Select templates by name, or all of them.
    pub fn select_templates(&self, name: Option<&str>) -> Result<Vec<(&String, &TemplateEntry)>> {
        match name {
            Some(n) => match self.templates.get_key_value(n) {
                Some(pair) => Ok(vec![pair]),
                None => bail!("Template {n} is not in the manifest"),
            },
            None => Ok(self.templates.iter().collect()),
        }
    }
}
