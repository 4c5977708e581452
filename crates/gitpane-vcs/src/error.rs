use std::path::PathBuf;
use thiserror::Error;

/// Failure of a provider call.
///
/// `CommandFailed` keeps the combined stdout and stderr of the subprocess so
/// the view can show git's own diagnostics verbatim.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "git {args} failed{}: {output}",
        .code.map(|c| format!(" (exit {})", c)).unwrap_or_default()
    )]
    CommandFailed {
        args: String,
        code: Option<i32>,
        output: String,
    },
    #[error("unexpected git output: {0}")]
    Parse(String),
    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),
}

impl VcsError {
    /// Text to show the user: git's output when there is some, else the error.
    pub fn output(&self) -> String {
        match self {
            VcsError::CommandFailed { output, .. } if !output.trim().is_empty() => {
                output.trim().to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VcsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_prefers_git_text() {
        let err = VcsError::CommandFailed {
            args: "push".into(),
            code: Some(1),
            output: "  rejected: non-fast-forward\n".into(),
        };
        assert_eq!(err.output(), "rejected: non-fast-forward");
        assert_eq!(
            err.to_string(),
            "git push failed (exit 1):   rejected: non-fast-forward\n"
        );

        let parse = VcsError::Parse("bad".into());
        assert_eq!(parse.output(), "unexpected git output: bad");
    }
}
