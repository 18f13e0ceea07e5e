//! Shared test utilities for git-tree-compare integration tests
//!
//! Tests run against real git repositories created in temporary directories.

pub mod assertions;
pub mod fixtures;
pub mod repository;
