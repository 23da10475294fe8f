#![allow(dead_code)]

mod server;

pub use server::{MockServer, Shape};

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper struct to run folio commands in an isolated temp directory
pub struct FolioTest {
    pub temp_dir: TempDir,
}

impl FolioTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        FolioTest { temp_dir }
    }

    /// A workspace whose config points at `server` with its endpoint shapes.
    pub fn with_server(server: &MockServer) -> Self {
        let test = Self::new();
        test.run_success(&["config", "set", "base_url", &server.base_url]);
        if server.shape == Shape::Rest {
            for kind in ["publications", "projects"] {
                for (field, value) in [
                    ("list", "root"),
                    ("create", "root"),
                    ("delete", "path"),
                    ("update", "wrapped"),
                ] {
                    test.run_success(&["config", "set", &format!("{kind}.{field}"), value]);
                }
            }
        }
        test
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute folio command")
    }

    /// Run with `input` on stdin.
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        use std::io::Write;
        use std::process::Stdio;

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn folio command");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child.wait_with_output().expect("Failed to wait for folio")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        assert_eq!(output.status.code(), Some(1));
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("command output is not JSON")
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.temp_dir.path().join(".folio").join("config.yaml"))
            .expect("Failed to read config file")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_folio"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("FOLIO_CONFIG")
            .env_remove("FOLIO_BASE_URL")
            .env_remove("FOLIO_TOKEN")
            .env("FOLIO_LOG", "off");
        command
    }
}
