//! Opening commits on the hosting site

use regex::Regex;
use std::sync::OnceLock;

fn remote_regex() -> &'static Regex {
    static REMOTE: OnceLock<Regex> = OnceLock::new();
    // git@host:owner/repo(.git), ssh://git@host[:port]/owner/repo(.git),
    // https://[user@]host/owner/repo(.git)
    REMOTE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:(?:ssh|https?|git)://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/",
            r"|[^@]+@(?P<scp_host>[^:]+):)",
            r"(?P<path>.+?)(?:\.git)?/?$",
        ))
        .unwrap()
    })
}

/// Web URL of `hash` for a remote URL, if it looks like a hosted repository
pub fn commit_url(remote_url: &str, hash: &str) -> Option<String> {
    let captures = remote_regex().captures(remote_url.trim())?;
    let host = captures
        .name("host")
        .or_else(|| captures.name("scp_host"))?
        .as_str();
    let path = captures.name("path")?.as_str().trim_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("https://{}/{}/commit/{}", host, path, hash))
}

/// Hand a URL or local path to the platform's opener
pub async fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let result = tokio::process::Command::new("open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let result = tokio::process::Command::new("cmd")
        .args(["/C", "start", url])
        .spawn();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let result = tokio::process::Command::new("xdg-open").arg(url).spawn();

    result.map(|_| ())
}
