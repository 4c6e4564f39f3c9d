//! De-indentation for inline YAML configuration.
//!
//! Manifests embed config blocks indented to match the surrounding
//! document. Before the block is piped to the tool on stdin, the shared
//! leading whitespace has to be stripped, and a line that does not
//! share it is an authoring mistake worth failing on rather than
//! silently producing invalid YAML.

use crate::error::{Error, Result};

/// Strip the common leading indentation from `text`.
///
/// The first non-blank line fixes the indent prefix. Every other
/// non-blank line must start with the same prefix; otherwise an
/// [`Error::Format`] is returned naming the offending line. Blank lines
/// pass through empty, and a trailing newline is preserved.
pub fn strip_indent(field: &'static str, text: &str) -> Result<String> {
    let prefix = match text.lines().find(|line| !line.trim().is_empty()) {
        Some(line) => &line[..line.len() - line.trim_start().len()],
        None => return Ok(text.to_string()),
    };

    let mut out = String::with_capacity(text.len());
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            out.push('\n');
            continue;
        }
        let stripped = line.strip_prefix(prefix).ok_or_else(|| Error::Format {
            field,
            message: format!(
                "line {} is not indented consistently with the first line",
                lineno + 1
            ),
        })?;
        out.push_str(stripped);
        out.push('\n');
    }

    if !text.ends_with('\n') {
        out.pop();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_common_indent() {
        let text = "    kind: Config\n    apiVersion: kapp.k14s.io/v1alpha1\n";
        let out = strip_indent("config_yaml", text).expect("consistent indent");
        assert_eq!(out, "kind: Config\napiVersion: kapp.k14s.io/v1alpha1\n");
    }

    #[test]
    fn preserves_relative_indent() {
        let text = "  a:\n    b: 1\n";
        let out = strip_indent("config_yaml", text).expect("consistent indent");
        assert_eq!(out, "a:\n  b: 1\n");
    }

    #[test]
    fn blank_lines_are_allowed() {
        let text = "  a: 1\n\n  b: 2\n";
        let out = strip_indent("config_yaml", text).expect("blank lines ok");
        assert_eq!(out, "a: 1\n\nb: 2\n");
    }

    #[test]
    fn inconsistent_indent_is_a_format_error() {
        let text = "    a: 1\n  b: 2\n";
        let err = strip_indent("config_yaml", text).expect_err("shallower line");
        assert!(matches!(err, Error::Format { field: "config_yaml", .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn tabs_and_spaces_do_not_mix() {
        let text = "\ta: 1\n  b: 2\n";
        assert!(strip_indent("config_yaml", text).is_err());
    }

    #[test]
    fn unindented_text_passes_through() {
        let text = "a: 1\nb: 2";
        let out = strip_indent("config_yaml", text).expect("no indent");
        assert_eq!(out, "a: 1\nb: 2");
    }

    #[test]
    fn empty_text_passes_through() {
        assert_eq!(strip_indent("config_yaml", "").expect("empty"), "");
    }
}
