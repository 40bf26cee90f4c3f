use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated home directory and session file for one test.
pub struct TestEnv {
    pub home: TempDir,
    pub api_url: String,
}

impl TestEnv {
    pub fn new(server_uri: &str) -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp dir"),
            api_url: format!("{}/api", server_uri),
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.home.path().join("session.json")
    }

    /// Seed the session file as a previous login would have left it.
    pub fn write_session(&self, access: &str, refresh: &str) {
        let session = serde_json::json!({
            "access_token": access,
            "refresh_token": refresh,
            "username": "alice"
        });
        std::fs::write(self.session_file(), session.to_string())
            .expect("Failed to write session file");
    }

    /// Parsed contents of the session file, or null when it is absent.
    pub fn read_session(&self) -> serde_json::Value {
        match std::fs::read_to_string(self.session_file()) {
            Ok(content) => serde_json::from_str(&content).expect("Invalid session file"),
            Err(_) => serde_json::Value::Null,
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bookshelf"));
        cmd.args(args);
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_DATA_HOME", self.home.path().join("data"));
        cmd.env("BOOKSHELF_API_URL", &self.api_url);
        cmd.env("BOOKSHELF_SESSION_FILE", self.session_file());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("BOOKSHELF_MEDIA_URL");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run the CLI off the async runtime so the mock server keeps serving.
    pub async fn run(&self, args: &[&str]) -> Output {
        let mut cmd = self.command(&args.iter().map(|a| a.to_string()).collect::<Vec<_>>());
        tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
            .await
            .expect("CLI task panicked")
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub async fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
