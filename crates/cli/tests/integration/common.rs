//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding `modplan.json`.
pub struct TestEnv {
  pub temp: TempDir,
  pub project_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to a temporary `modplan.json` file.
  pub fn from_fixture(name: &str) -> Self {
    Self::from_content(&fixture_content(name))
  }

  /// Create from inline project JSON.
  pub fn from_content(content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let project_path = temp.path().join("modplan.json");
    std::fs::write(&project_path, content).unwrap();
    Self { temp, project_path }
  }

  /// Get a Command for the modplan binary, pointed at this project.
  ///
  /// Runs inside the temp directory and clears `MODPLAN_PROJECT` and `RUST_LOG`
  /// so the caller's environment does not leak in. Sets `NO_COLOR` so log
  /// output on stderr is plain text.
  pub fn modplan_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("modplan");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("MODPLAN_PROJECT");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
  }
}
