//! Common utilities for CLI E2E tests.
//!
//! Every [`Sandbox`] gets its own data directory, so tests never share state
//! and never touch the user's real configuration.

#![allow(dead_code)]

use std::process::Command;
use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// A sandbox with a registered, signed-in user.
    pub fn signed_in() -> Self {
        let sandbox = Self::new();
        sandbox.run_success(&[
            "auth",
            "register",
            "an@uni.edu",
            "secret",
            "--name",
            "Nguyen Van An",
            "--university",
            "VNU",
        ]);
        sandbox.run_success(&["auth", "login", "an@uni.edu", "secret", "--remember"]);
        sandbox
    }

    /// Invoke a CLI command and return (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        self.run_with_log(args, None)
    }

    /// Like [`Sandbox::run`], with `STUDYROOM_LOG` set when `filter` is given.
    pub fn run_with_log(&self, args: &[&str], filter: Option<&str>) -> (String, String, i32) {
        let mut command = Command::new(env!("CARGO_BIN_EXE_studyroom-cli"));
        command
            .args(args)
            .env("STUDYROOM_DATA_DIR", self.dir.path())
            .env_remove("STUDYROOM_LOG");
        if let Some(filter) = filter {
            command.env("STUDYROOM_LOG", filter);
        }
        let output = command
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(
            code, 0,
            "CLI command failed with code {}: {:?}\nstderr: {}",
            code, args, stderr
        );
        stdout
    }

    /// Invoke a CLI command and expect failure. Returns stderr.
    pub fn run_failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {:?}", args);
        stderr
    }

    /// Run and parse stdout as a single JSON document.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        parse_json(&self.run_success(args))
    }

    /// Create a task and return its id.
    pub fn create_task(&self, args: &[&str]) -> String {
        let mut full = vec!["task", "create"];
        full.extend_from_slice(args);
        let task = self.run_json(&full);
        task["id"].as_str().expect("task id").to_string()
    }
}

/// Parse JSON output from CLI.
pub fn parse_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> T {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

/// Check if string contains substring
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{}' to contain '{}'",
        haystack,
        needle
    );
}

/// Parse stdout holding several JSON documents back to back.
pub fn parse_json_stream(output: &str) -> Vec<serde_json::Value> {
    serde_json::Deserializer::from_str(output)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("Failed to parse JSON stream")
}
