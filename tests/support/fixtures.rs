//! Temp-file fixtures for file adapters, config and the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A scratch directory holding a config file and its data files.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read fixture")
    }

    /// Write a config whose data paths point into this workspace.
    pub fn write_config(&self, sources: &str) -> PathBuf {
        let root = self.path().display().to_string();
        let config = format!(
            r#"
[logging]
level = "warn"
format = "pretty"

[engine]
pivot_currency = "USD"
snapshot_capacity = 3
max_concurrent_fetches = 2

[store]
path = "{root}/items.json"

[rates]
path = "{root}/rates.json"

[graphs]
dir = "{root}/graphs"

{sources}
"#
        );
        self.write("config.toml", &config)
    }
}

pub const STANDARD_RATES: &str = r#"{
    "history": [],
    "live": {"USD": "1", "EUR": "0.9137", "CNY": "7.2431"}
}"#;
