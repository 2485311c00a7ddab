use std::{collections::BTreeMap, io::Write, sync::Arc};

use tsp_master::*;
use tsp_structs::core::*;

#[tokio::test]
async fn test_static_directory() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"TSPWorker-b": "http://10.0.0.2:4000/", "TSPWorker-a": "http://10.0.0.1:4000"}}"#
    )
    .unwrap();
    let directory = StaticDirectory::from_file(file.path()).unwrap();
    assert_eq!(
        directory.list_names().await.unwrap(),
        vec!["TSPWorker-a", "TSPWorker-b"]
    );
    let worker = directory.lookup("TSPWorker-b").await.unwrap();
    assert_eq!(worker.name(), "TSPWorker-b");
    assert_eq!(worker.endpoint(), "http://10.0.0.2:4000");
    assert!(directory.lookup("TSPWorker-c").await.is_err());

    directory
        .bind(Arc::new(RemoteWorker::new(
            "TSPWorker-c".to_string(),
            "http://10.0.0.3:4000".to_string(),
        )))
        .await
        .unwrap();
    assert_eq!(directory.list_names().await.unwrap().len(), 3);

    assert!(StaticDirectory::from_json("[1, 2]").is_err());
    assert!(StaticDirectory::from_file(file.path().with_extension("missing")).is_err());
}

#[tokio::test]
async fn test_in_memory_directory() {
    let directory = InMemoryDirectory::with_local_workers("TSPWorker", 2);
    assert_eq!(
        directory.list_names().await.unwrap(),
        vec!["TSPWorker-0", "TSPWorker-1"]
    );
    let worker = directory.lookup("TSPWorker-1").await.unwrap();
    assert_eq!(worker.endpoint(), "local://TSPWorker-1");

    directory
        .bind(Arc::new(LocalWorker::new("TSPWorker-2".to_string())))
        .await
        .unwrap();
    assert!(directory.lookup("TSPWorker-2").await.is_ok());
    assert!(directory.lookup("TSPWorker-3").await.is_err());

    let empty = InMemoryDirectory::new();
    assert!(empty.list_names().await.unwrap().is_empty());

    let mut map = BTreeMap::new();
    map.insert("x".to_string(), "http://x".to_string());
    assert_eq!(
        StaticDirectory::new(map).list_names().await.unwrap(),
        vec!["x"]
    );
}

#[tokio::test]
async fn test_local_worker() {
    let worker = LocalWorker::new("TSPWorker-0".to_string());
    let result = worker
        .solve(SubProblem {
            origin: City::new("A", 0, 0),
            fixed_second: City::new("D", 10, 0),
            remaining: vec![City::new("B", 0, 10), City::new("C", 10, 10)],
        })
        .await
        .unwrap();
    assert_eq!(result.route_names().unwrap(), vec!["A", "D", "C", "B", "A"]);
    assert_eq!(result.distance, 40.0);
}
