//! Repository models behind the sidebar

pub mod graph;
pub mod history;
pub mod tree;

pub use graph::{compute_graph_for_commits, GraphLine, MAX_GRAPH_WIDTH};
pub use history::{append_page, merge_commits, populate_push_status, CommitHistory};
pub use tree::{parse_status, Bucket, DiffStats, EntryKey, EntryRef, FileEntry, FileTree};
