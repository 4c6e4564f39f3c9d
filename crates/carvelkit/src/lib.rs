//! # carvelkit
//!
//! Reconciliation core for the Carvel `kapp` and `kbld` CLIs.
//!
//! The crate turns a declarative resource record into deterministic CLI
//! invocations and interprets the tool's exit codes and streams as a
//! small state machine, feeding the result back into persisted derived
//! state so a caller can detect drift and decide whether to re-apply.
//!
//! ## Components
//!
//! - [`args`]: record → ordered argument list plus optional stdin
//! - [`runner`]: spawn the tool, capture streams in full, report status
//! - [`outcome`]: exit status → semantic outcome, per operation kind
//! - [`reconciler`]: lifecycle events over [`DerivedState`]
//! - [`template`]: the kbld variant with content-hash identity
//!
//! Everything is synchronous and single-threaded; callers serialize
//! lifecycle events per resource identity. The external process is the
//! only concurrency boundary and is always fully reaped before its
//! result is inspected.

pub mod args;
pub mod config;
pub mod error;
pub mod heredoc;
pub mod kapp;
pub mod outcome;
pub mod reconciler;
pub mod runner;
pub mod template;

pub use args::CommandLine;
pub use config::{DeployConfig, TemplateConfig};
pub use error::{Error, Result};
pub use kapp::Kapp;
pub use outcome::{classify, OpKind, Outcome};
pub use reconciler::{DerivedState, Reconciler};
pub use runner::{CliRunner, RunOutput, Runner};
pub use template::{content_hash, RenderState, Templater};
