//! Version control provider for gitpane
//!
//! The status view reads and mutates the repository only through the
//! [`VcsProvider`] trait. [`GitCli`] implements it by running the `git`
//! binary; tests substitute their own implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │             VcsProvider trait            │
//! │  - status_porcelain_v2_z()               │
//! │  - recent_commits() / commit_detail()    │
//! │  - push() / fetch() / pull()             │
//! │  - branches() / checkout() / stash_*()   │
//! └──────────────────────────────────────────┘
//!                      │
//!                      ▼
//!              ┌───────────────┐
//!              │    GitCli     │
//!              │ (subprocess)  │
//!              └───────────────┘
//! ```
//!
//! Failures carry git's combined output in [`VcsError::CommandFailed`] so
//! the caller can show it verbatim.

pub mod error;
pub mod git;
pub mod parse;
pub mod provider;
pub mod types;

pub use error::{Result, VcsError};
pub use git::GitCli;
pub use provider::VcsProvider;
pub use types::{
    format_ahead_behind, short_hash, Branch, Commit, CommitFile, CommitFilter, CommitStats,
    FileStatus, NumstatEntry, PushStatus, PushVariant, Stash, StashList, SHORT_HASH_LEN,
};
