use std::{convert::Infallible, sync::Arc};

use log::{debug, warn};
use tsp_structs::{api::*, error::TspError};
use tsp_utils::json_response;
use warp::{http::StatusCode, reply::Response, Filter, Rejection};

use crate::Worker;

const MAX_BODY_BYTES: u64 = 1024 * 1024;

async fn solve_sub_problem(
    req: SolveSubProblemReq,
    worker: Arc<Worker>,
) -> Result<Response, Infallible> {
    match worker.handle(req).await {
        Ok(resp) => Ok(json_response(&resp, StatusCode::OK)),
        Err(e) => {
            warn!("[worker] {}: rejecting request: {}", worker.name(), e);
            let status = match e {
                TspError::MalformedSubProblem(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Ok(json_response(
                &ErrorResp {
                    error: e.to_string(),
                },
                status,
            ))
        }
    }
}

/// `POST /solve_sub_problem` and `GET /health`.
pub fn routes(
    worker: Arc<Worker>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let with_worker = warp::any().map(move || worker.clone());
    let solve = warp::path("solve_sub_problem")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_worker.clone())
        .and_then(solve_sub_problem);
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_worker)
        .map(|worker: Arc<Worker>| {
            debug!("[worker] {}: health check", worker.name());
            json_response(
                &HealthResp {
                    name: worker.name().to_string(),
                },
                StatusCode::OK,
            )
        });
    solve.or(health).unify()
}
