use std::{collections::BTreeMap, convert::Infallible, sync::Arc};

use log::{debug, info};
use tokio::sync::Mutex;
use tsp_structs::api::*;
use tsp_utils::json_response;
use warp::{http::StatusCode, reply::Response, Filter, Rejection};

/// Name to url bindings. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when an existing binding was replaced.
    pub async fn bind(&self, name: String, url: String) -> bool {
        self.entries.lock().await.insert(name, url).is_some()
    }

    pub async fn unbind(&self, name: &str) -> bool {
        self.entries.lock().await.remove(name).is_some()
    }

    /// Bound names in sorted order.
    pub async fn names(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    pub async fn lookup(&self, name: &str) -> Option<String> {
        self.entries.lock().await.get(name).cloned()
    }
}

fn error_response(error: String, status: StatusCode) -> Response {
    json_response(&ErrorResp { error }, status)
}

async fn handle_bind(req: BindReq, registry: Registry) -> Result<Response, Infallible> {
    if req.name.is_empty() || req.url.is_empty() {
        return Ok(error_response(
            "name and url must not be empty".to_string(),
            StatusCode::BAD_REQUEST,
        ));
    }
    let replaced = registry.bind(req.name.clone(), req.url.clone()).await;
    info!("[registry] bound {} to {}", req.name, req.url);
    Ok(json_response(
        &BindResp {
            name: req.name,
            replaced,
        },
        StatusCode::OK,
    ))
}

async fn handle_unbind(req: UnbindReq, registry: Registry) -> Result<Response, Infallible> {
    let removed = registry.unbind(&req.name).await;
    info!("[registry] unbound {} (present: {})", req.name, removed);
    Ok(json_response(
        &UnbindResp {
            name: req.name,
            removed,
        },
        StatusCode::OK,
    ))
}

async fn handle_names(registry: Registry) -> Result<Response, Infallible> {
    let names = registry.names().await;
    debug!("[registry] listing {} names", names.len());
    Ok(json_response(&ListNamesResp { names }, StatusCode::OK))
}

async fn handle_lookup(name: String, registry: Registry) -> Result<Response, Infallible> {
    Ok(match registry.lookup(&name).await {
        Some(url) => json_response(&LookupResp { name, url }, StatusCode::OK),
        None => error_response(format!("{} is not bound", name), StatusCode::NOT_FOUND),
    })
}

/// `POST /bind`, `POST /unbind`, `GET /names` and `GET /lookup/<name>`.
pub fn routes(
    registry: Registry,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let with_registry = warp::any().map(move || registry.clone());
    let bind = warp::path!("bind")
        .and(warp::post())
        .and(warp::body::content_length_limit(64 * 1024))
        .and(warp::body::json())
        .and(with_registry.clone())
        .and_then(handle_bind);
    let unbind = warp::path!("unbind")
        .and(warp::post())
        .and(warp::body::content_length_limit(64 * 1024))
        .and(warp::body::json())
        .and(with_registry.clone())
        .and_then(handle_unbind);
    let names = warp::path!("names")
        .and(warp::get())
        .and(with_registry.clone())
        .and_then(handle_names);
    let lookup = warp::path!("lookup" / String)
        .and(warp::get())
        .and(with_registry)
        .and_then(handle_lookup);
    bind.or(unbind)
        .unify()
        .or(names)
        .unify()
        .or(lookup)
        .unify()
}
