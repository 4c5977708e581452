use clap::Parser;
use gitpane_diff::ToolMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitpane")]
#[command(about = "Terminal git status and history explorer")]
#[command(version)]
pub struct Cli {
    /// Repository or any directory inside it
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Do not refresh when files change; use `r` instead
    #[arg(long)]
    pub no_watch: bool,

    /// Diff renderer to use
    #[arg(long, value_parser = parse_tool_mode)]
    pub diff_tool: Option<ToolMode>,

    /// Config file to load instead of the default locations
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn parse_tool_mode(value: &str) -> Result<ToolMode, String> {
    value
        .parse()
        .map_err(|_| format!("expected auto, delta or builtin, got {:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["gitpane"]);
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(!cli.no_watch);
        assert_eq!(cli.diff_tool, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["gitpane", "../repo", "--no-watch", "--diff-tool", "builtin"]);
        assert_eq!(cli.path, PathBuf::from("../repo"));
        assert!(cli.no_watch);
        assert_eq!(cli.diff_tool, Some(ToolMode::Builtin));
        assert!(Cli::try_parse_from(["gitpane", "--diff-tool", "meld"]).is_err());
    }
}
