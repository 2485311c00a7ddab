use tsp_registry::{routes, Registry};
use tsp_structs::api::*;
use tsp_utils::dejsonify;
use warp::http::StatusCode;

fn body<'a, T: serde::Deserialize<'a>>(bytes: &'a [u8]) -> T {
    dejsonify(std::str::from_utf8(bytes).unwrap()).unwrap()
}

#[tokio::test]
async fn test_registry_table() {
    let registry = Registry::new();
    assert!(!registry.bind("b".to_string(), "http://b".to_string()).await);
    assert!(!registry.bind("a".to_string(), "http://a".to_string()).await);
    assert!(registry.bind("a".to_string(), "http://a2".to_string()).await);
    assert_eq!(registry.names().await, vec!["a", "b"]);
    assert_eq!(registry.lookup("a").await, Some("http://a2".to_string()));

    let shared = registry.clone();
    assert!(shared.unbind("a").await);
    assert!(!shared.unbind("a").await);
    assert_eq!(registry.lookup("a").await, None);
}

#[tokio::test]
async fn test_bind_lookup_unbind() {
    let filter = routes(Registry::new());

    let resp = warp::test::request()
        .method("POST")
        .path("/bind")
        .json(&BindReq {
            name: "TSPWorker-1".to_string(),
            url: "http://127.0.0.1:4000".to_string(),
        })
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bound: BindResp = body(resp.body());
    assert_eq!(bound.name, "TSPWorker-1");
    assert!(!bound.replaced);

    let resp = warp::test::request().path("/names").reply(&filter).await;
    let names: ListNamesResp = body(resp.body());
    assert_eq!(names.names, vec!["TSPWorker-1"]);

    let resp = warp::test::request()
        .path("/lookup/TSPWorker-1")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found: LookupResp = body(resp.body());
    assert_eq!(found.url, "http://127.0.0.1:4000");

    let resp = warp::test::request()
        .method("POST")
        .path("/unbind")
        .json(&UnbindReq {
            name: "TSPWorker-1".to_string(),
        })
        .reply(&filter)
        .await;
    let unbound: UnbindResp = body(resp.body());
    assert!(unbound.removed);

    let resp = warp::test::request()
        .path("/lookup/TSPWorker-1")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorResp = body(resp.body());
    assert_eq!(err.error, "TSPWorker-1 is not bound");
}

#[tokio::test]
async fn test_bind_rejects_empty_name() {
    let resp = warp::test::request()
        .method("POST")
        .path("/bind")
        .json(&BindReq {
            name: String::new(),
            url: "http://127.0.0.1:4000".to_string(),
        })
        .reply(&routes(Registry::new()))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
