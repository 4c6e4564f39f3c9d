//! Typed resource records.
//!
//! The caller hands each lifecycle event a fully-validated record; the
//! core never does stringly-typed field lookups. Records are immutable
//! for the duration of one event.

use serde::{Deserialize, Serialize};

/// Declarative description of a kapp-managed app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// App name (kapp `-a`)
    pub app: String,
    /// Namespace holding the app record (kapp `-n`)
    pub namespace: String,

    /// Inline configuration piped to the tool on stdin, may be indented
    #[serde(default)]
    pub config_yaml: String,
    /// File paths or URLs, passed in order; later files win
    #[serde(default)]
    pub files: Vec<String>,

    /// Show line-level changes in diff output
    #[serde(default)]
    pub diff_changes: bool,
    /// Number of context lines around changed lines
    #[serde(default)]
    pub diff_context: Option<u32>,

    /// Emit debug logs for lifecycle events on this record
    #[serde(default)]
    pub debug_logs: bool,
}

impl DeployConfig {
    /// Caller-visible identity for this record: `<namespace>/<app>`.
    pub fn identity(&self) -> String {
        format!("{}/{}", self.namespace, self.app)
    }
}

/// Declarative description of a kbld-templated resource.
///
/// Unlike [`DeployConfig`] there is no remote identity; the resource is
/// identified by a content hash of its rendered output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Inline configuration piped to the tool on stdin, may be indented
    #[serde(default)]
    pub config_yaml: String,
    /// File paths or URLs, passed in order
    #[serde(default)]
    pub files: Vec<String>,

    /// Emit debug logs for lifecycle events on this record
    #[serde(default)]
    pub debug_logs: bool,
}
