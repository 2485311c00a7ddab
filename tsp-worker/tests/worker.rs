use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::time::timeout;
use tsp_structs::{api::*, core::*, error::TspError};
use tsp_worker::{validate, Worker};

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

/// Eleven cities, so nine are permuted.
fn large_req() -> SolveSubProblemReq {
    let city = |i: usize| {
        let (x, y) = ((i * 37 % 101) as i32, (i * 53 % 97) as i32);
        City::new(format!("P{}", i), x, y).with_id(i)
    };
    SolveSubProblemReq {
        origin: city(0),
        fixed_second: city(1),
        remaining: (2..11).map(city).collect(),
    }
}

async fn timed_full_search(worker: &Worker) -> Duration {
    let started = Instant::now();
    worker.solve(large_req()).await.unwrap();
    started.elapsed()
}

#[test]
fn test_validate() {
    assert!(validate(&square_req()).is_ok());

    let mut req = square_req();
    req.fixed_second = req.origin.clone();
    assert!(matches!(
        validate(&req),
        Err(TspError::MalformedSubProblem(_))
    ));

    let mut req = square_req();
    req.remaining.push(req.origin.clone());
    assert!(matches!(
        validate(&req),
        Err(TspError::MalformedSubProblem(_))
    ));

    let mut req = square_req();
    req.remaining.push(req.fixed_second.clone());
    assert!(validate(&req).is_err());

    let mut req = square_req();
    req.remaining.push(City::new("C", 10, 10).with_id(2));
    assert!(validate(&req).is_err());

    // Same name and position at another index is another stop.
    let mut req = square_req();
    req.remaining.push(City::new("C", 10, 10).with_id(4));
    assert!(validate(&req).is_ok());
    let mut req = square_req();
    req.remaining.push(City::new("A", 0, 0).with_id(4));
    assert!(validate(&req).is_ok());
}

#[tokio::test]
async fn test_solve_with_repeated_entry() {
    let worker = Worker::new("TSPWorker-1".to_string());
    let mut req = square_req();
    req.remaining.push(City::new("B", 0, 10).with_id(4));
    let result = worker.solve(req).await.unwrap();
    assert_eq!(result.distance, 40.0);
    assert_eq!(
        result.route_names().unwrap(),
        vec!["A", "B", "B", "C", "D", "A"]
    );
}

#[tokio::test]
async fn test_solve() {
    let worker = Worker::new("TSPWorker-1".to_string());
    let resp = worker.handle(square_req()).await.unwrap();
    assert_eq!(resp.worker, "TSPWorker-1");
    assert_eq!(resp.num_permutations, Some(2));
    assert_eq!(resp.result.distance, 40.0);
    assert_eq!(
        resp.result.route_names().unwrap(),
        vec!["A", "B", "C", "D", "A"]
    );

    let result = worker.solve(square_req()).await.unwrap();
    assert_eq!(result, resp.result);
}

#[tokio::test]
async fn test_malformed_is_not_searched() {
    let worker = Worker::new("TSPWorker-1".to_string());
    let mut req = square_req();
    req.fixed_second = req.origin.clone();
    assert!(matches!(
        worker.solve(req).await,
        Err(TspError::MalformedSubProblem(_))
    ));
}

#[tokio::test]
async fn test_concurrent_calls() {
    let worker = Arc::new(Worker::new("TSPWorker-1".to_string()));
    let full = timed_full_search(&worker).await;

    let started = Instant::now();
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let worker = worker.clone();
            tokio::spawn(async move { worker.solve(large_req()).await })
        })
        .collect();
    let mut distances = Vec::new();
    for handle in handles {
        distances.push(handle.await.unwrap().unwrap().distance);
    }
    assert!(distances.iter().all(|d| *d == distances[0]));
    let elapsed = started.elapsed();
    assert!(
        elapsed >= full * 2,
        "three searches took {:?}, one takes {:?}",
        elapsed,
        full
    );
}

#[tokio::test]
async fn test_abandoned_call_keeps_worker_busy() {
    let worker = Worker::new("TSPWorker-1".to_string());
    let full = timed_full_search(&worker).await;

    assert!(timeout(full / 10, worker.solve(large_req())).await.is_err());
    let started = Instant::now();
    let result = worker.solve(square_req()).await.unwrap();
    assert_eq!(result.distance, 40.0);
    assert!(
        started.elapsed() >= full / 2,
        "next call finished after {:?} while a search takes {:?}",
        started.elapsed(),
        full
    );
}
