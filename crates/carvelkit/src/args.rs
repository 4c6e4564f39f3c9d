//! Argument building for kapp and kbld invocations.
//!
//! Pure functions from a resource record to the exact ordered argument
//! list and optional stdin payload. The flag order matters: mode flags
//! first, then diff options, then `-f-` for inline config, then file
//! references in manifest order (later files override earlier ones on
//! the tool side).

use crate::config::{DeployConfig, TemplateConfig};
use crate::error::Result;
use crate::heredoc::strip_indent;

/// A fully-built invocation: arguments plus optional stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// Build arguments for `kapp deploy`.
pub fn deploy_args(config: &DeployConfig) -> Result<CommandLine> {
    let mut args = vec![
        "deploy".to_string(),
        "-a".to_string(),
        config.app.clone(),
        "-n".to_string(),
        config.namespace.clone(),
        "--yes".to_string(),
        "--tty".to_string(),
    ];

    if config.diff_changes {
        args.push("--diff-changes".to_string());
    }
    if let Some(context) = config.diff_context {
        args.push(format!("--diff-context={context}"));
    }

    let stdin = inline_config(&mut args, &config.config_yaml)?;

    for file in &config.files {
        args.push(format!("--file={file}"));
    }

    Ok(CommandLine { args, stdin })
}

/// Build arguments for a diff-only `kapp deploy` run.
///
/// Identical to [`deploy_args`] plus the flags that turn the run into a
/// non-mutating preview reporting drift through its exit code.
pub fn diff_args(config: &DeployConfig) -> Result<CommandLine> {
    let mut cmd = deploy_args(config)?;
    cmd.args.push("--diff-run".to_string());
    cmd.args.push("--diff-exit-status".to_string());
    Ok(cmd)
}

/// Build arguments for `kapp delete`.
///
/// Delete only needs identity; diff, file and inline-config arguments
/// are never emitted.
pub fn delete_args(config: &DeployConfig) -> CommandLine {
    CommandLine {
        args: vec![
            "delete".to_string(),
            "-a".to_string(),
            config.app.clone(),
            "-n".to_string(),
            config.namespace.clone(),
            "--yes".to_string(),
            "--tty".to_string(),
        ],
        stdin: None,
    }
}

/// Build arguments for a `kbld` render.
pub fn template_args(config: &TemplateConfig) -> Result<CommandLine> {
    let mut args = Vec::new();

    let stdin = inline_config(&mut args, &config.config_yaml)?;

    for file in &config.files {
        args.push(format!("--file={file}"));
    }

    Ok(CommandLine { args, stdin })
}

/// Append the stdin flag and de-indent the inline config, if present.
fn inline_config(args: &mut Vec<String>, config_yaml: &str) -> Result<Option<String>> {
    if config_yaml.is_empty() {
        return Ok(None);
    }
    args.push("-f-".to_string());
    let stripped = strip_indent("config_yaml", config_yaml)?;
    Ok(Some(stripped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> DeployConfig {
        DeployConfig {
            app: "web".to_string(),
            namespace: "prod".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn deploy_args_minimal() {
        let cmd = deploy_args(&base_config()).expect("valid record");
        assert_eq!(
            cmd.args,
            vec!["deploy", "-a", "web", "-n", "prod", "--yes", "--tty"]
        );
        assert_eq!(cmd.stdin, None);
    }

    #[test]
    fn files_preserve_manifest_order_without_stdin() {
        let config = DeployConfig {
            files: vec!["a.yml".to_string(), "b.yml".to_string()],
            ..base_config()
        };
        let cmd = deploy_args(&config).expect("valid record");
        assert_eq!(
            &cmd.args[cmd.args.len() - 2..],
            &["--file=a.yml".to_string(), "--file=b.yml".to_string()]
        );
        assert!(!cmd.args.contains(&"-f-".to_string()));
        assert_eq!(cmd.stdin, None);
    }

    #[test]
    fn inline_config_adds_stdin_flag_once_and_dedents() {
        let config = DeployConfig {
            config_yaml: "  kind: Config\n  minimumRequiredVersion: 0.23.0\n".to_string(),
            ..base_config()
        };
        let cmd = deploy_args(&config).expect("valid record");
        assert_eq!(cmd.args.iter().filter(|a| *a == "-f-").count(), 1);
        assert_eq!(
            cmd.stdin.as_deref(),
            Some("kind: Config\nminimumRequiredVersion: 0.23.0\n")
        );
    }

    #[test]
    fn inconsistent_inline_config_fails() {
        let config = DeployConfig {
            config_yaml: "    a: 1\n  b: 2\n".to_string(),
            ..base_config()
        };
        assert!(deploy_args(&config).is_err());
    }

    #[test]
    fn diff_options_come_before_files() {
        let config = DeployConfig {
            diff_changes: true,
            diff_context: Some(4),
            files: vec!["a.yml".to_string()],
            ..base_config()
        };
        let cmd = deploy_args(&config).expect("valid record");
        assert_eq!(
            &cmd.args[7..],
            &[
                "--diff-changes".to_string(),
                "--diff-context=4".to_string(),
                "--file=a.yml".to_string(),
            ]
        );
    }

    #[test]
    fn diff_args_append_preview_flags() {
        let cmd = diff_args(&base_config()).expect("valid record");
        assert_eq!(
            &cmd.args[cmd.args.len() - 2..],
            &["--diff-run".to_string(), "--diff-exit-status".to_string()]
        );
    }

    #[test]
    fn delete_args_carry_identity_only() {
        let config = DeployConfig {
            config_yaml: "  a: 1\n".to_string(),
            files: vec!["a.yml".to_string()],
            diff_changes: true,
            diff_context: Some(2),
            ..base_config()
        };
        let cmd = delete_args(&config);
        assert_eq!(
            cmd.args,
            vec!["delete", "-a", "web", "-n", "prod", "--yes", "--tty"]
        );
        assert_eq!(cmd.stdin, None);
    }

    #[test]
    fn template_args_take_files_and_stdin() {
        let config = TemplateConfig {
            config_yaml: "  images: []\n".to_string(),
            files: vec!["kbld.yml".to_string()],
            debug_logs: false,
        };
        let cmd = template_args(&config).expect("valid record");
        assert_eq!(
            cmd.args,
            vec!["-f-".to_string(), "--file=kbld.yml".to_string()]
        );
        assert_eq!(cmd.stdin.as_deref(), Some("images: []\n"));
    }
}
