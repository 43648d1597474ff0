#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-score
//!
//! This library holds all functionality for the repo-score tool, which estimates
//! how safe it is to depend on a GitHub repository.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, configuration, and orchestration
//! - [`error`]: Metric failure kinds
//! - [`facts`]: Repository identity and remote data access
//! - [`metrics`]: Metric evaluators and the net score aggregator
//! - [`reports`]: Result formatting

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod error;
pub mod facts;
pub mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
