//! Canonical items persisted as one JSON document.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{AppId, CanonicalItem, ItemKey};
use crate::error::{Error, Result};
use crate::port::ItemStore;

/// File-backed [`ItemStore`].
///
/// A missing file is an empty store. Saves rewrite the whole document through
/// a temporary file and a rename, so readers never see a partial write.
#[derive(Debug)]
pub struct JsonItemStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonItemStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<CanonicalItem>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::Store(format!("{}: {e}", self.path.display()))),
        }
    }
}

impl ItemStore for JsonItemStore {
    async fn load_items(&self, app_id: AppId) -> Result<Vec<CanonicalItem>> {
        let items = self.read_all().await?;
        Ok(items.into_iter().filter(|item| item.app_id == app_id).collect())
    }

    async fn save_batch(&self, items: &[CanonicalItem]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut all: BTreeMap<(AppId, ItemKey), CanonicalItem> = self
            .read_all()
            .await?
            .into_iter()
            .map(|item| ((item.app_id, item.key.clone()), item))
            .collect();
        for item in items {
            all.insert((item.app_id, item.key.clone()), item.clone());
        }

        let records: Vec<&CanonicalItem> = all.values().collect();
        let content = serde_json::to_string_pretty(&records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| Error::Store(format!("{}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))?;

        debug!(path = %self.path.display(), saved = items.len(), total = all.len(), "Item store written");
        Ok(())
    }
}
