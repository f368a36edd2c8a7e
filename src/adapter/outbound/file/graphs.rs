//! Order and sales graphs read from a JSON directory tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::read_json;
use crate::domain::{AppId, ItemKey, OrderGraph, SalesGraph};
use crate::error::{Error, Result};
use crate::port::GraphAdapter;

#[derive(Debug, Clone)]
pub struct JsonGraphs {
    dir: PathBuf,
}

impl JsonGraphs {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn lookup<T: DeserializeOwned>(&self, app_id: AppId, file: &str, key: &ItemKey) -> Result<T> {
        let path = self.dir.join(app_id.to_string()).join(file);
        let mut graphs: HashMap<ItemKey, T> = read(&path, key).await?;
        graphs.remove(key).ok_or_else(|| Error::Graph {
            key: key.clone(),
            reason: format!("no entry in {}", path.display()),
        })
    }
}

async fn read<T: DeserializeOwned>(path: &Path, key: &ItemKey) -> Result<T> {
    read_json(path).await.map_err(|e| Error::Graph {
        key: key.clone(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl GraphAdapter for JsonGraphs {
    async fn order_graph(&self, app_id: AppId, key: &ItemKey) -> Result<OrderGraph> {
        self.lookup(app_id, "orders.json", key).await
    }

    async fn sales_graph(&self, app_id: AppId, key: &ItemKey) -> Result<SalesGraph> {
        self.lookup(app_id, "sales.json", key).await
    }
}
