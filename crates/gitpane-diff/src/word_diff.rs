//! Word-level segmentation of paired removed/added lines.

use crate::model::{DiffLine, LineType, ParsedDiff, WordSegment};
use similar::{ChangeTag, TextDiff};

/// Fill `word_diff` on every Remove/Add pair of the diff.
///
/// Pairing follows the side-by-side rule: a run of removed lines is matched
/// in order with the run of added lines directly after it. Pairs that share
/// no text are left unsegmented.
pub fn annotate_word_diff(diff: &mut ParsedDiff) {
    for hunk in &mut diff.hunks {
        annotate_lines(&mut hunk.lines);
    }
}

fn annotate_lines(lines: &mut [DiffLine]) {
    let mut i = 0;
    while i < lines.len() {
        let removes_start = i;
        while i < lines.len() && lines[i].line_type == LineType::Remove {
            i += 1;
        }
        let adds_start = i;
        while i < lines.len() && lines[i].line_type == LineType::Add {
            i += 1;
        }
        let removes = adds_start - removes_start;
        let adds = i - adds_start;

        for k in 0..removes.min(adds) {
            let (old, new) = segment_pair(
                &lines[removes_start + k].content,
                &lines[adds_start + k].content,
            );
            if old.iter().any(|s| !s.is_change) {
                lines[removes_start + k].word_diff = Some(old);
                lines[adds_start + k].word_diff = Some(new);
            }
        }

        if removes == 0 && adds == 0 {
            i += 1;
        }
    }
}

/// Split two lines into segments. Each side's segments concatenate to its input.
pub fn segment_pair(old: &str, new: &str) -> (Vec<WordSegment>, Vec<WordSegment>) {
    let diff = TextDiff::from_words(old, new);
    let mut old_segments = Vec::new();
    let mut new_segments = Vec::new();

    for change in diff.iter_all_changes() {
        let text = change.value();
        match change.tag() {
            ChangeTag::Equal => {
                push_segment(&mut old_segments, text, false);
                push_segment(&mut new_segments, text, false);
            }
            ChangeTag::Delete => push_segment(&mut old_segments, text, true),
            ChangeTag::Insert => push_segment(&mut new_segments, text, true),
        }
    }

    (old_segments, new_segments)
}

fn push_segment(segments: &mut Vec<WordSegment>, text: &str, is_change: bool) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.is_change == is_change => last.text.push_str(text),
        _ => segments.push(WordSegment::new(text, is_change)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hunk;
    use pretty_assertions::assert_eq;

    fn joined(segments: &[WordSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_segments_partition_content() {
        let old = "let value = compute(a, b);";
        let new = "let result = compute(a, c);";
        let (old_segs, new_segs) = segment_pair(old, new);

        assert_eq!(joined(&old_segs), old);
        assert_eq!(joined(&new_segs), new);
        assert!(old_segs.iter().any(|s| s.is_change && s.text.contains("value")));
        assert!(new_segs.iter().any(|s| s.is_change && s.text.contains("result")));
        assert!(new_segs.iter().any(|s| !s.is_change && s.text.contains("compute")));
    }

    #[test]
    fn test_annotate_pairs_in_order() {
        let mut diff = ParsedDiff::new("a.txt", "a.txt");
        let mut hunk = Hunk::new(1, 3, 1, 2);
        hunk.lines.push(DiffLine::context("keep", 1, 1));
        hunk.lines.push(DiffLine::remove("one two", 2));
        hunk.lines.push(DiffLine::remove("three four", 3));
        hunk.lines.push(DiffLine::add("one 2", 2));
        diff.hunks.push(hunk);

        annotate_word_diff(&mut diff);
        let lines = &diff.hunks[0].lines;

        assert!(lines[0].word_diff.is_none());
        assert!(lines[1].word_diff.is_some());
        assert!(lines[2].word_diff.is_none());
        assert_eq!(joined(lines[3].word_diff.as_ref().unwrap()), "one 2");
    }

    #[test]
    fn test_disjoint_lines_stay_plain() {
        let mut diff = ParsedDiff::new("a.txt", "a.txt");
        let mut hunk = Hunk::new(1, 1, 1, 1);
        hunk.lines.push(DiffLine::remove("alpha", 1));
        hunk.lines.push(DiffLine::add("omega", 1));
        diff.hunks.push(hunk);

        annotate_word_diff(&mut diff);
        assert!(diff.hunks[0].lines.iter().all(|l| l.word_diff.is_none()));
    }
}
