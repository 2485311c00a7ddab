use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
pub use tsp_structs::api::*;
use tsp_utils::{dejsonify, get, jsonify, post};

fn default_headers() -> Option<Vec<(String, String)>> {
    Some(vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("user-agent".to_string(), "TSP API".to_string()),
    ])
}

async fn get_json<T>(url: String) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp = get::<String>(url.as_str(), default_headers()).await?;
    dejsonify::<T>(&resp).map_err(|e| anyhow!("Failed to dejsonify: {}", e))
}

async fn post_json<T>(url: String, body: String) -> Result<T>
where
    T: DeserializeOwned,
{
    let resp = post::<String>(url.as_str(), body.as_str(), default_headers()).await?;
    dejsonify::<T>(&resp).map_err(|e| anyhow!("Failed to dejsonify: {}", e))
}

/// Client for the name registry.
pub struct Api {
    registry_url: String,
}

impl Api {
    pub fn new(registry_url: String) -> Self {
        Self {
            registry_url: registry_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    async fn get<T>(&self, path: String) -> Result<T>
    where
        T: DeserializeOwned,
    {
        get_json(format!("{}/{}", self.registry_url, path)).await
    }

    async fn post<T>(&self, path: String, body: String) -> Result<T>
    where
        T: DeserializeOwned,
    {
        post_json(format!("{}/{}", self.registry_url, path), body).await
    }

    pub async fn list_names(&self) -> Result<ListNamesResp> {
        self.get("names".to_string()).await
    }

    pub async fn lookup(&self, name: &str) -> Result<LookupResp> {
        self.get(format!("lookup/{}", name)).await
    }

    pub async fn bind(&self, req: BindReq) -> Result<BindResp> {
        self.post("bind".to_string(), jsonify(&req)?).await
    }

    pub async fn unbind(&self, req: UnbindReq) -> Result<UnbindResp> {
        self.post("unbind".to_string(), jsonify(&req)?).await
    }
}

/// Client for a single worker endpoint.
#[derive(Clone, Debug)]
pub struct WorkerClient {
    url: String,
}

impl WorkerClient {
    pub fn new(url: String) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Dropping the returned future abandons the request, which is how the
    /// master applies its call deadline.
    pub async fn solve_sub_problem(
        &self,
        req: &SolveSubProblemReq,
    ) -> Result<SolveSubProblemResp> {
        post_json(format!("{}/solve_sub_problem", self.url), jsonify(req)?).await
    }

    pub async fn health(&self) -> Result<HealthResp> {
        get_json(format!("{}/health", self.url)).await
    }
}
