//! kbld templating variant.
//!
//! A template resource has no remote identity: its identity is a
//! content hash of the rendered output, so identity changes exactly
//! when the output does.

use crate::args;
use crate::config::TemplateConfig;
use crate::error::{Error, Result};
use crate::outcome::{classify, OpKind, Outcome};
use crate::runner::Runner;
use serde::{Deserialize, Serialize};

pub(crate) const KBLD: &str = "kbld";

/// State derived from a template render, persisted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    /// Content hash of `result`, `None` before the first render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Last successful rendered output (sensitive)
    #[serde(default)]
    pub result: String,
}

/// Drives renders for one kbld-templated resource.
pub struct Templater<'a> {
    config: &'a TemplateConfig,
    runner: &'a dyn Runner,
}

impl<'a> Templater<'a> {
    pub fn new(config: &'a TemplateConfig, runner: &'a dyn Runner) -> Self {
        Self { config, runner }
    }

    /// Render the resource, storing the output and its hash identity.
    ///
    /// Exit 0 is the only success; any non-zero exit fails the event
    /// and leaves the previous result and identity untouched.
    pub fn render(&self, state: &mut RenderState) -> Result<()> {
        let cmd = args::template_args(self.config)?;
        let output = self.runner.run(KBLD, &cmd)?;

        match classify(OpKind::Apply, &output)? {
            Outcome::Applied { stdout } => {
                state.id = Some(content_hash(&stdout));
                state.result = stdout;
                if self.config.debug_logs {
                    log::debug!("kbld/render: id={}", state.id.as_deref().unwrap_or(""));
                }
                Ok(())
            }
            Outcome::Failed { code, stderr } => Err(Error::CommandFailed {
                program: KBLD.to_string(),
                code,
                stderr,
            }),
            outcome => Err(Error::Classifier {
                message: format!("unexpected outcome for render: {outcome:?}"),
            }),
        }
    }
}

/// Hex content hash used as a template resource's identity.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
