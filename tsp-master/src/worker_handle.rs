use std::sync::Arc;

use futures::future::BoxFuture;
use tsp_api::{SolveSubProblemReq, WorkerClient};
use tsp_structs::{core::*, error::TspError};
use tsp_worker::Worker;

/// A worker the master can hand sub-problems to. The returned future owns
/// everything it needs, so it can be spawned.
pub trait WorkerHandle: Send + Sync {
    fn name(&self) -> &str;

    fn endpoint(&self) -> String;

    fn solve(&self, sub_problem: SubProblem) -> BoxFuture<'static, Result<TspResult, TspError>>;
}

/// Worker reached over HTTP.
pub struct RemoteWorker {
    name: String,
    client: WorkerClient,
}

impl RemoteWorker {
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            client: WorkerClient::new(url),
        }
    }
}

impl WorkerHandle for RemoteWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> String {
        self.client.url().to_string()
    }

    fn solve(&self, sub_problem: SubProblem) -> BoxFuture<'static, Result<TspResult, TspError>> {
        let name = self.name.clone();
        let client = self.client.clone();
        Box::pin(async move {
            let req = SolveSubProblemReq::from(sub_problem);
            client
                .solve_sub_problem(&req)
                .await
                .map(|resp| resp.result)
                .map_err(|e| TspError::RemoteCall {
                    worker: name,
                    reason: e.to_string(),
                })
        })
    }
}

/// Worker running inside the master process.
#[derive(Clone)]
pub struct LocalWorker {
    worker: Arc<Worker>,
}

impl LocalWorker {
    pub fn new(name: String) -> Self {
        Self {
            worker: Arc::new(Worker::new(name)),
        }
    }
}

impl WorkerHandle for LocalWorker {
    fn name(&self) -> &str {
        self.worker.name()
    }

    fn endpoint(&self) -> String {
        format!("local://{}", self.worker.name())
    }

    fn solve(&self, sub_problem: SubProblem) -> BoxFuture<'static, Result<TspResult, TspError>> {
        let worker = self.worker.clone();
        Box::pin(async move { worker.solve(sub_problem.into()).await })
    }
}
