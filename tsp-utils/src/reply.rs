use serde::Serialize;
use warp::{
    http::StatusCode,
    reply::{Reply, Response},
};

use crate::jsonify;

/// Sorted-key JSON body with `status`. Falls back to a plain-text 500 when the
/// value cannot be encoded.
pub fn json_response<T: Serialize>(value: &T, status: StatusCode) -> Response {
    match jsonify(value) {
        Ok(body) => warp::reply::with_status(
            warp::reply::with_header(body, "content-type", "application/json"),
            status,
        )
        .into_response(),
        Err(e) => warp::reply::with_status(
            format!("failed to encode response: {}", e),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response(),
    }
}
