//! Repository identity and remote data access
//!
//! Everything the metrics know about a repository comes through this module:
//!
//! - [`RepoRef`] resolves a repository URL into an owner/name pair.
//! - [`hosting::Client`] wraps the hosting API endpoints the metrics consume
//!   (rate limit, commits, issues, directory listings).
//! - [`shallow_clone`] produces a [`Checkout`], a depth-1 clone that lives in a
//!   private temporary directory and is deleted when the `Checkout` is dropped.
//!
//! Nothing here caches or persists data between invocations.

mod clone;
pub mod hosting;
mod repo_ref;

pub use clone::{Checkout, shallow_clone};
pub use repo_ref::RepoRef;
