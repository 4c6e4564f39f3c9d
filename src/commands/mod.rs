//! Command handlers, one module per subcommand.

pub mod apply;
pub mod delete;
pub mod diff;
pub mod status;
pub mod template;
