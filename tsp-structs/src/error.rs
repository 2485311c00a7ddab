use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TspError {
    #[error("insufficient cities: {num_cities} given, at least 2 are required")]
    InsufficientCities { num_cities: usize },

    #[error("invalid input: {0}")]
    Input(String),

    #[error("aborted: {num_cities} cities exceeds the exhaustive search limit of {max_cities}")]
    InfeasibleSize { num_cities: usize, max_cities: usize },

    #[error("worker discovery failed: {0}")]
    Discovery(String),

    #[error("no workers available")]
    NoWorkers,

    #[error("call to {worker} failed: {reason}")]
    RemoteCall { worker: String, reason: String },

    #[error("malformed sub-problem: {0}")]
    MalformedSubProblem(String),

    #[error("no solution was found")]
    NoSolution,
}
