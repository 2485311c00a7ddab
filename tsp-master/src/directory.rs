use std::{collections::BTreeMap, path::Path, sync::Arc};

use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tsp_api::{Api, BindReq};
use tsp_utils::dejsonify;

use crate::worker_handle::{LocalWorker, RemoteWorker, WorkerHandle};

/// Where the master finds its workers.
pub trait Directory: Send + Sync {
    fn list_names(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    fn lookup<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Arc<dyn WorkerHandle>>>;

    fn bind(&self, handle: Arc<dyn WorkerHandle>) -> BoxFuture<'_, Result<()>>;
}

/// Directory backed by a running `tsp-registry`.
pub struct HttpDirectory {
    api: Api,
}

impl HttpDirectory {
    pub fn new(registry_url: String) -> Self {
        Self {
            api: Api::new(registry_url),
        }
    }
}

impl Directory for HttpDirectory {
    fn list_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { Ok(self.api.list_names().await?.names) })
    }

    fn lookup<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Arc<dyn WorkerHandle>>> {
        Box::pin(async move {
            let resp = self.api.lookup(name).await?;
            Ok(Arc::new(RemoteWorker::new(resp.name, resp.url)) as Arc<dyn WorkerHandle>)
        })
    }

    fn bind(&self, handle: Arc<dyn WorkerHandle>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.api
                .bind(BindReq {
                    name: handle.name().to_string(),
                    url: handle.endpoint(),
                })
                .await?;
            Ok(())
        })
    }
}

/// Fixed name to url table, usually read from a JSON file such as
/// `{"TSPWorker-a": "http://10.0.0.2:4000"}`.
pub struct StaticDirectory {
    entries: RwLock<BTreeMap<String, String>>,
}

impl StaticDirectory {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries = dejsonify::<BTreeMap<String, String>>(json)
            .map_err(|e| anyhow!("Failed to parse workers file: {}", e))?;
        Ok(Self::new(entries))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }
}

impl Directory for StaticDirectory {
    fn list_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { Ok(self.entries.read().await.keys().cloned().collect()) })
    }

    fn lookup<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Arc<dyn WorkerHandle>>> {
        Box::pin(async move {
            let url = self
                .entries
                .read()
                .await
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("{} is not bound", name))?;
            Ok(Arc::new(RemoteWorker::new(name.to_string(), url)) as Arc<dyn WorkerHandle>)
        })
    }

    fn bind(&self, handle: Arc<dyn WorkerHandle>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.entries
                .write()
                .await
                .insert(handle.name().to_string(), handle.endpoint());
            Ok(())
        })
    }
}

/// Holds worker handles directly, for in-process workers and tests.
#[derive(Default)]
pub struct InMemoryDirectory {
    handles: RwLock<BTreeMap<String, Arc<dyn WorkerHandle>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handles(handles: Vec<Arc<dyn WorkerHandle>>) -> Self {
        Self {
            handles: RwLock::new(
                handles
                    .into_iter()
                    .map(|h| (h.name().to_string(), h))
                    .collect(),
            ),
        }
    }

    /// `num_workers` in-process workers named `<prefix>-0`, `<prefix>-1`, ...
    pub fn with_local_workers(prefix: &str, num_workers: usize) -> Self {
        Self::with_handles(
            (0..num_workers)
                .map(|i| {
                    Arc::new(LocalWorker::new(format!("{}-{}", prefix, i))) as Arc<dyn WorkerHandle>
                })
                .collect(),
        )
    }
}

impl Directory for InMemoryDirectory {
    fn list_names(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move { Ok(self.handles.read().await.keys().cloned().collect()) })
    }

    fn lookup<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Arc<dyn WorkerHandle>>> {
        Box::pin(async move {
            self.handles
                .read()
                .await
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("{} is not bound", name))
        })
    }

    fn bind(&self, handle: Arc<dyn WorkerHandle>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.handles
                .write()
                .await
                .insert(handle.name().to_string(), handle);
            Ok(())
        })
    }
}
