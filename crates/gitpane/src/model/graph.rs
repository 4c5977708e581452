//! ASCII commit graph, one row per commit
//!
//! Lanes track which hash each column is waiting for. A commit takes the
//! lane expecting it (or a free one), other lanes expecting the same hash
//! merge into it with `/`, and extra parents of a merge open lanes drawn
//! as `\`.

use gitpane_vcs::Commit;

/// Widest graph column in terminal cells
pub const MAX_GRAPH_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphLine {
    /// One token per lane: `*`, `|`, `/`, `\` or space
    pub chars: Vec<char>,
    /// Rendered width in cells, at most [`MAX_GRAPH_WIDTH`]
    pub width: usize,
}

impl GraphLine {
    fn new(chars: Vec<char>) -> Self {
        let width = (chars.len() * 2).min(MAX_GRAPH_WIDTH);
        Self { chars, width }
    }

    /// Lanes separated by spaces, cut to `width`
    pub fn render(&self) -> String {
        let mut out: String = self.chars.iter().flat_map(|c| [*c, ' ']).collect();
        out.truncate(self.width);
        out
    }
}

pub fn compute_graph_for_commits(commits: &[Commit]) -> Vec<GraphLine> {
    let mut lanes: Vec<Option<String>> = Vec::new();
    let mut lines = Vec::with_capacity(commits.len());

    for commit in commits {
        let col = match lanes
            .iter()
            .position(|l| l.as_deref() == Some(commit.hash.as_str()))
        {
            Some(col) => col,
            None => match lanes.iter().position(Option::is_none) {
                Some(free) => free,
                None => {
                    lanes.push(None);
                    lanes.len() - 1
                }
            },
        };

        let mut chars: Vec<char> = lanes
            .iter()
            .map(|l| if l.is_some() { '|' } else { ' ' })
            .collect();
        chars[col] = '*';

        for (i, lane) in lanes.iter_mut().enumerate() {
            if i != col && lane.as_deref() == Some(commit.hash.as_str()) {
                chars[i] = '/';
                *lane = None;
            }
        }

        let mut parents = commit.parent_hashes.iter();
        lanes[col] = parents.next().cloned();
        for parent in parents {
            if lanes.iter().any(|l| l.as_ref() == Some(parent)) {
                continue;
            }
            let slot = match lanes.iter().position(Option::is_none) {
                Some(free) if free > col => free,
                _ => {
                    lanes.push(None);
                    chars.push(' ');
                    lanes.len() - 1
                }
            };
            lanes[slot] = Some(parent.clone());
            chars[slot] = '\\';
        }

        while lanes.last().is_some_and(Option::is_none) {
            lanes.pop();
        }
        while chars.len() > 1 && chars.last() == Some(&' ') {
            chars.pop();
        }
        lines.push(GraphLine::new(chars));
    }

    lines
}
