#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use study_buddy::model::{Account, Session, TaskItem};
use study_buddy::storage::{ACCOUNTS_KEY, SESSION_KEY, TASKS_KEY};
use tempfile::TempDir;

/// An isolated data directory for one test.
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `buddy` pointed at this data directory with a clean environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("buddy").expect("binary");
        cmd.env_remove("BUDDY_PASSWORD")
            .env_remove("RUST_LOG")
            .env("BUDDY_DATA_DIR", self.path());
        cmd
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path().join("buddy.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.path().join(format!("{key}.json"))
    }

    pub fn read_accounts(&self) -> Result<Vec<Account>, Box<dyn std::error::Error>> {
        self.read_record(ACCOUNTS_KEY)
    }

    pub fn read_tasks(&self) -> Result<Vec<TaskItem>, Box<dyn std::error::Error>> {
        self.read_record(TASKS_KEY)
    }

    pub fn read_session(&self) -> Result<Option<Session>, Box<dyn std::error::Error>> {
        let path = self.record_path(SESSION_KEY);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }

    fn read_record<T: serde::de::DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, Box<dyn std::error::Error>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Sign up `username` with a valid password, leaving them logged in.
    pub fn signup(&self, username: &str) {
        self.cmd()
            .args(["signup", username, "--password", "Secret1!"])
            .assert()
            .success();
    }
}
