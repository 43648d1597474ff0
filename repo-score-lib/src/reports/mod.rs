//! Result formatting
//!
//! Two generators turn [`NetScoreResult`](crate::metrics::NetScoreResult) values into text:
//! - **NDJSON**: one JSON object per repository, one per line, for programmatic use
//! - **Console**: an aligned, optionally colored table for people
//!
//! Both write a single repository at a time so results can be emitted as soon as
//! they are ready, in input order.

mod common;
mod console;
mod ndjson;

pub use console::{generate as generate_console, generate_header as generate_console_header};
pub use ndjson::generate as generate_ndjson;
