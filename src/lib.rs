//! Git repository summary library.
//!
//! This crate summarises every git repository in a folder, one line each:
//! - Inspecting repositories in parallel on a worker pool
//! - Formatting branch, local changes and ahead/behind counts
//! - Rewriting each line in place as its result arrives, or appending plain
//!   lines in order when output is not a terminal

pub mod collect;
pub mod config;
pub mod constants;
pub mod git;
pub mod output;
pub mod render;
pub mod repo;
pub mod summary;
pub mod terminal;
