//! Parse unified diff text (as produced by `git diff`) into a [`ParsedDiff`].

use crate::model::{DiffLine, Hunk, LineType, ParsedDiff};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use unidiff::{Hunk as UnidiffHunk, Line as UnidiffLine, PatchSet, PatchedFile};

/// Errors that can occur during diff parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to parse diff: {0}")]
    Malformed(String),
    #[error("Invalid hunk header: {0}")]
    InvalidHunkHeader(String),
}

fn hunk_header_regex() -> &'static Regex {
    static HUNK_HEADER: OnceLock<Regex> = OnceLock::new();
    HUNK_HEADER.get_or_init(|| {
        Regex::new(r"^@@ -\d+(?:,\d+)? \+\d+(?:,\d+)? @@").unwrap()
    })
}

/// Parse a unified diff for a single file.
///
/// Empty input yields an empty diff. When the text holds several files only the
/// first one is kept; callers request diffs one path at a time.
///
/// # Example
/// ```ignore
/// let diff = parse_unified_diff(&raw)?;
/// println!("{} hunks", diff.hunks.len());
/// ```
pub fn parse_unified_diff(diff_text: &str) -> Result<ParsedDiff, ParseError> {
    if diff_text.trim().is_empty() {
        return Ok(ParsedDiff::default());
    }

    if let Some(binary) = detect_binary(diff_text) {
        return Ok(binary);
    }

    validate_hunk_headers(diff_text)?;

    let mut patch_set = PatchSet::new();
    patch_set
        .parse(diff_text)
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let files = patch_set.files();
    let Some(first) = files.first() else {
        return Ok(ParsedDiff::default());
    };
    if files.len() > 1 {
        log::debug!(
            "Diff contains {} files, keeping {}",
            files.len(),
            first.target_file
        );
    }

    let raw_lines: Vec<&str> = diff_text.lines().collect();
    parse_patched_file(first, &raw_lines)
}

fn parse_patched_file(file: &PatchedFile, raw_lines: &[&str]) -> Result<ParsedDiff, ParseError> {
    let mut diff = ParsedDiff::new(clean_path(&file.source_file), clean_path(&file.target_file));
    for hunk in file.hunks() {
        diff.hunks.push(parse_hunk(hunk, raw_lines)?);
    }
    Ok(diff)
}

/// `raw_lines` is the input split the way unidiff numbers it, so each body
/// line's original prefix can be checked.
fn parse_hunk(hunk: &UnidiffHunk, raw_lines: &[&str]) -> Result<Hunk, ParseError> {
    let mut parsed = Hunk::new(
        hunk.source_start as u32,
        hunk.source_length as u32,
        hunk.target_start as u32,
        hunk.target_length as u32,
    );
    parsed.section = hunk.section_header.trim().to_string();

    // Numbering is derived here rather than trusted from the parser so that
    // the advance rules hold even for hunks with "\ No newline" markers.
    let mut old_no = parsed.old_start;
    let mut new_no = parsed.new_start;
    for line in hunk.lines() {
        let raw = line
            .diff_line_no
            .checked_sub(1)
            .and_then(|i| raw_lines.get(i).copied());
        let Some(line_type) = line_type(raw, line)? else {
            continue;
        };
        let content = line.value.trim_end_matches(['\n', '\r']).to_string();
        let parsed_line = match line_type {
            LineType::Context => {
                let l = DiffLine::context(content, old_no, new_no);
                old_no += 1;
                new_no += 1;
                l
            }
            LineType::Add => {
                let l = DiffLine::add(content, new_no);
                new_no += 1;
                l
            }
            LineType::Remove => {
                let l = DiffLine::remove(content, old_no);
                old_no += 1;
                l
            }
            LineType::Header => DiffLine::header(content),
        };
        parsed.lines.push(parsed_line);
    }

    Ok(parsed)
}

/// Classify a hunk body line by its first char.
///
/// unidiff reads any unknown prefix as context, so the raw line decides. An
/// empty line is context with its trailing space stripped.
fn line_type(raw: Option<&str>, line: &UnidiffLine) -> Result<Option<LineType>, ParseError> {
    let prefix = match raw {
        Some(raw) => raw.chars().next(),
        None => line.line_type.chars().next(),
    };
    match prefix {
        Some(' ') | Some('\r') | None => Ok(Some(LineType::Context)),
        Some('+') => Ok(Some(LineType::Add)),
        Some('-') => Ok(Some(LineType::Remove)),
        // "\ No newline at end of file"
        Some('\\') => Ok(None),
        Some(_) => Err(ParseError::Malformed(format!(
            "unexpected diff line: {}",
            raw.unwrap_or(&line.value)
        ))),
    }
}

fn validate_hunk_headers(diff_text: &str) -> Result<(), ParseError> {
    let re = hunk_header_regex();
    for line in diff_text.lines() {
        if line.starts_with("@@") && !re.is_match(line) {
            return Err(ParseError::InvalidHunkHeader(line.to_string()));
        }
    }
    Ok(())
}

/// Recognise `Binary files a/x and b/y differ` and `GIT binary patch` output.
fn detect_binary(diff_text: &str) -> Option<ParsedDiff> {
    let mut old_file = String::new();
    let mut new_file = String::new();

    for line in diff_text.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            if let Some((a, b)) = rest.split_once(" b/") {
                old_file = clean_path(a);
                new_file = b.to_string();
            }
        } else if let Some(rest) = line.strip_prefix("Binary files ") {
            let rest = rest.strip_suffix(" differ").unwrap_or(rest);
            if let Some((a, b)) = rest.split_once(" and ") {
                old_file = clean_path(a);
                new_file = clean_path(b);
            }
            return Some(ParsedDiff::binary(old_file, new_file));
        } else if line == "GIT binary patch" {
            return Some(ParsedDiff::binary(old_file, new_file));
        } else if line.starts_with("@@") {
            return None;
        }
    }

    None
}

/// Remove the `a/` / `b/` prefixes git puts on paths.
fn clean_path(path: &str) -> String {
    let path = path.trim();

    if let Some(stripped) = path.strip_prefix("a/") {
        return stripped.to_string();
    }
    if let Some(stripped) = path.strip_prefix("b/") {
        return stripped.to_string();
    }

    path.to_string()
}
