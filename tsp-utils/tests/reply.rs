#![cfg(feature = "reply")]

use std::collections::BTreeMap;

use tsp_utils::json_response;
use warp::http::StatusCode;

#[test]
fn test_json_response() {
    let body: BTreeMap<&str, u32> = [("b", 2), ("a", 1)].into_iter().collect();
    let resp = json_response(&body, StatusCode::NOT_FOUND);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
}

#[test]
fn test_unencodable_value() {
    // Map keys must be strings in JSON.
    let body: BTreeMap<(u8, u8), u32> = [((0, 1), 2)].into_iter().collect();
    let resp = json_response(&body, StatusCode::OK);
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
