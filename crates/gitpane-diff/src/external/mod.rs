//! External diff renderer passthrough (e.g. `delta`).
//!
//! The raw diff text is piped through the tool, which returns pre-styled
//! output. Terminal mode switches in that output are stripped so the tool
//! cannot toggle mouse reporting, the alternate screen or bracketed paste on
//! the host terminal.

mod ansi;

pub use ansi::ansi_to_lines;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use thiserror::Error;

/// Which renderer to use for diffs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolMode {
    /// Use the external tool when it is installed.
    #[default]
    Auto,
    /// Always try the external tool.
    Delta,
    /// Never use the external tool.
    Builtin,
}

/// Errors from running an external diff renderer.
#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("external diff tool is not available")]
    NotAvailable,
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("I/O error talking to external diff tool: {0}")]
    Io(#[from] std::io::Error),
}

/// A renderer that turns raw unified diff text into styled terminal output.
pub trait ExternalDiffTool: Send + Sync {
    /// Whether the tool can be used on this host.
    fn available(&self) -> bool;

    /// Render `raw_diff` for a pane `width` columns wide.
    fn render(&self, raw_diff: &str, side_by_side: bool, width: u16)
        -> Result<String, ExternalToolError>;
}

/// The `delta` pager, located on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct DeltaTool {
    program: Option<PathBuf>,
}

impl DeltaTool {
    /// Look up `delta` on `PATH`.
    pub fn detect() -> Self {
        let program = which::which("delta").ok();
        match &program {
            Some(path) => log::info!("Found delta at {}", path.display()),
            None => log::debug!("delta not found on PATH"),
        }
        Self { program }
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }
}

impl ExternalDiffTool for DeltaTool {
    fn available(&self) -> bool {
        self.program.is_some()
    }

    fn render(
        &self,
        raw_diff: &str,
        side_by_side: bool,
        width: u16,
    ) -> Result<String, ExternalToolError> {
        let program = self.program.as_ref().ok_or(ExternalToolError::NotAvailable)?;
        let name = program.display().to_string();

        let mut command = Command::new(program);
        command
            .arg("--paging=never")
            .arg(format!("--width={}", width));
        if side_by_side {
            command.arg("--side-by-side");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExternalToolError::Spawn {
                program: name.clone(),
                source,
            })?;

        // The child may fill stdout before it has read all of stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = raw_diff.to_string();
            std::thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::debug!("Writing diff to {} failed: {}", name, e),
                Err(_) => log::warn!("{} stdin writer panicked", name),
            }
        }
        if !output.status.success() {
            return Err(ExternalToolError::Failed {
                program: name,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(sanitize_terminal_output(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Whether diffs should go through `tool` under `mode`.
pub fn should_use_external(mode: ToolMode, tool: &dyn ExternalDiffTool) -> bool {
    match mode {
        ToolMode::Builtin => false,
        ToolMode::Auto => tool.available(),
        ToolMode::Delta => {
            if !tool.available() {
                log::warn!("Diff tool mode is delta but the tool is not installed");
            }
            tool.available()
        }
    }
}

/// Render through the tool, or `None` to fall back to the built-in renderer.
pub fn render_external(
    mode: ToolMode,
    tool: &dyn ExternalDiffTool,
    raw_diff: &str,
    side_by_side: bool,
    width: u16,
) -> Option<String> {
    if !should_use_external(mode, tool) || raw_diff.trim().is_empty() {
        return None;
    }
    match tool.render(raw_diff, side_by_side, width) {
        Ok(output) => Some(sanitize_terminal_output(&output)),
        Err(e) => {
            log::warn!("External diff tool failed, using built-in renderer: {}", e);
            None
        }
    }
}

fn private_mode_regex() -> &'static Regex {
    static PRIVATE_MODE: OnceLock<Regex> = OnceLock::new();
    // DEC private mode set/reset: ESC [ ? <params> h|l. Covers mouse
    // reporting (1000..1006, 1015), alternate screen (47, 1047, 1049) and
    // bracketed paste (2004).
    PRIVATE_MODE.get_or_init(|| Regex::new(r"\x1b\[\?[0-9;]*[hl]").unwrap())
}

/// Remove escape sequences that would change terminal modes on the host.
pub fn sanitize_terminal_output(output: &str) -> String {
    private_mode_regex().replace_all(output, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    struct StubTool {
        available: bool,
        output: Result<&'static str, ()>,
    }

    impl ExternalDiffTool for StubTool {
        fn available(&self) -> bool {
            self.available
        }

        fn render(
            &self,
            _raw_diff: &str,
            _side_by_side: bool,
            _width: u16,
        ) -> Result<String, ExternalToolError> {
            self.output
                .map(str::to_string)
                .map_err(|_| ExternalToolError::NotAvailable)
        }
    }

    #[test]
    fn test_sanitize_strips_mode_switches() {
        let raw = concat!(
            "\x1b[?1000h\x1b[?1006h\x1b[?1049h\x1b[?2004h",
            "\x1b[31mred\x1b[0m",
            "\x1b[?1000;1006l\x1b[?1049l",
        );
        let clean = sanitize_terminal_output(raw);

        for code in ["1000", "1001", "1002", "1003", "1004", "1005", "1006", "1049", "2004"] {
            assert!(!clean.contains(&format!("\x1b[?{}h", code)));
            assert!(!clean.contains(&format!("\x1b[?{}l", code)));
        }
        assert_eq!(clean, "\x1b[31mred\x1b[0m");
    }

    #[test]
    fn test_render_external_sanitizes_and_falls_back() {
        let tool = StubTool {
            available: true,
            output: Ok("\x1b[?1049hdiff\x1b[?2004l"),
        };
        assert_eq!(
            render_external(ToolMode::Auto, &tool, "raw", false, 80),
            Some("diff".to_string())
        );
        assert_eq!(render_external(ToolMode::Builtin, &tool, "raw", false, 80), None);
        assert_eq!(render_external(ToolMode::Auto, &tool, "  ", false, 80), None);

        let failing = StubTool {
            available: true,
            output: Err(()),
        };
        assert_eq!(render_external(ToolMode::Delta, &failing, "raw", true, 80), None);

        let missing = StubTool {
            available: false,
            output: Ok("x"),
        };
        assert!(!should_use_external(ToolMode::Auto, &missing));
        assert!(!should_use_external(ToolMode::Delta, &missing));
    }

    #[test]
    fn test_tool_mode_names() {
        assert_eq!(ToolMode::from_str("delta").unwrap(), ToolMode::Delta);
        assert_eq!(ToolMode::Builtin.to_string(), "builtin");
        assert_eq!(ToolMode::default(), ToolMode::Auto);
    }

    #[test]
    fn test_missing_delta_is_unavailable() {
        let tool = DeltaTool::default();
        assert!(!tool.available());
        assert!(matches!(
            tool.render("x", false, 80),
            Err(ExternalToolError::NotAvailable)
        ));
    }
}
