pub mod directory;
pub mod orchestrator;
pub mod retry;
pub mod worker_handle;

pub use directory::{Directory, HttpDirectory, InMemoryDirectory, StaticDirectory};
pub use orchestrator::{Orchestrator, Phase, RunReport, SubProblemFailure};
pub use retry::RetryPolicy;
pub use worker_handle::{LocalWorker, RemoteWorker, WorkerHandle};
