//! CLI integration tests for modplan.

mod common;
