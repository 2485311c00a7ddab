use std::sync::Arc;

use tsp_structs::{api::*, core::*};
use tsp_utils::dejsonify;
use tsp_worker::{server::routes, Worker};
use warp::http::StatusCode;

fn worker() -> Arc<Worker> {
    Arc::new(Worker::new("TSPWorker-42".to_string()))
}

fn square_req() -> SolveSubProblemReq {
    SolveSubProblemReq {
        origin: City::new("A", 0, 0),
        fixed_second: City::new("B", 0, 10).with_id(1),
        remaining: vec![
            City::new("C", 10, 10).with_id(2),
            City::new("D", 10, 0).with_id(3),
        ],
    }
}

#[tokio::test]
async fn test_solve_sub_problem() {
    let resp = warp::test::request()
        .method("POST")
        .path("/solve_sub_problem")
        .json(&square_req())
        .reply(&routes(worker()))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = std::str::from_utf8(resp.body()).unwrap();
    let resp: SolveSubProblemResp = dejsonify(body).unwrap();
    assert_eq!(resp.worker, "TSPWorker-42");
    assert_eq!(resp.result.distance, 40.0);
}

#[tokio::test]
async fn test_malformed_request() {
    let mut req = square_req();
    req.remaining.push(City::new("A", 0, 0));
    let resp = warp::test::request()
        .method("POST")
        .path("/solve_sub_problem")
        .json(&req)
        .reply(&routes(worker()))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = std::str::from_utf8(resp.body()).unwrap();
    let err: ErrorResp = dejsonify(body).unwrap();
    assert!(err.error.starts_with("malformed sub-problem"));
}

#[tokio::test]
async fn test_unparseable_body() {
    let resp = warp::test::request()
        .method("POST")
        .path("/solve_sub_problem")
        .header("content-type", "application/json")
        .body("{\"origin\":")
        .reply(&routes(worker()))
        .await;
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_health() {
    let resp = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes(worker()))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(resp.body()).unwrap(),
        serde_json::json!({ "name": "TSPWorker-42" })
    );

    let resp = warp::test::request()
        .method("GET")
        .path("/missing")
        .reply(&routes(worker()))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
