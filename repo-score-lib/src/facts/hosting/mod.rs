//! Read-only access to the repository hosting API

mod client;

pub use client::{
    Account, COMMIT_PAGE_SIZE, Client, Commit, CommitDetail, DEFAULT_API_URL, EntryKind, ISSUE_PAGE_SIZE, Issue, IssueFilter,
    IssueState, RateLimitStatus, Signature, StateFilter, TreeEntry,
};
