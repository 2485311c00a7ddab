use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use tokio::{
    sync::Semaphore,
    task::{spawn_blocking, JoinHandle},
    time::{sleep, timeout},
};
use tsp_algorithms::{check_size, partition};
use tsp_challenges::Challenge;
use tsp_structs::{config::MasterConfig, core::*, error::TspError};

use crate::{directory::Directory, retry::RetryPolicy, worker_handle::WorkerHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Discovering,
    Dispatching,
    Awaiting,
    Reducing,
    Done,
    Failed(TspError),
}

/// A sub-problem whose result was not used.
#[derive(Debug, Clone, PartialEq)]
pub struct SubProblemFailure {
    /// Position in emission order.
    pub index: usize,
    pub fixed_second: City,
    /// One entry per failed attempt, or the verification error.
    pub errors: Vec<TspError>,
}

impl SubProblemFailure {
    pub fn last_error(&self) -> Option<&TspError> {
        self.errors.last()
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: TspResult,
    pub phases: Vec<Phase>,
    pub failures: Vec<SubProblemFailure>,
    pub num_workers: usize,
    pub num_sub_problems: usize,
    pub elapsed: Duration,
}

impl RunReport {
    fn new() -> Self {
        Self {
            result: TspResult::none(),
            phases: Vec::new(),
            failures: Vec::new(),
            num_workers: 0,
            num_sub_problems: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn error(&self) -> Option<&TspError> {
        match self.phases.last() {
            Some(Phase::Failed(e)) => Some(e),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phases.last(), Some(Phase::Done))
    }

    fn enter(&mut self, phase: Phase) {
        debug!("[master] phase {:?}", phase);
        self.phases.push(phase);
    }

    fn fail(mut self, error: TspError, start: Instant) -> Self {
        warn!("[master] run failed: {}", error);
        self.result = TspResult::none();
        self.enter(Phase::Failed(error));
        self.elapsed = start.elapsed();
        self
    }
}

/// Splits an instance into sub-problems, farms them out to the workers found
/// in a [`Directory`] and keeps the shortest verified tour.
pub struct Orchestrator<D: Directory> {
    directory: D,
    config: MasterConfig,
}

impl<D: Directory> Orchestrator<D> {
    pub fn new(directory: D, config: MasterConfig) -> Self {
        Self { directory, config }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn config(&self) -> &MasterConfig {
        &self.config
    }

    /// Workers whose name carries the configured prefix. Names that fail to
    /// resolve are skipped.
    pub async fn discover(&self) -> Result<Vec<Arc<dyn WorkerHandle>>, TspError> {
        let filter = self.config.name_filter();
        let names = self
            .directory
            .list_names()
            .await
            .map_err(|e| TspError::Discovery(e.to_string()))?;
        let mut workers = Vec::new();
        for name in names.iter().filter(|n| n.starts_with(&filter)) {
            match self.directory.lookup(name).await {
                Ok(handle) => {
                    debug!("[master] found {} at {}", name, handle.endpoint());
                    workers.push(handle);
                }
                Err(e) => warn!("[master] skipping {}: {}", name, e),
            }
        }
        Ok(workers)
    }

    pub async fn run(&self, cities: Vec<City>) -> RunReport {
        let start = Instant::now();
        let report = RunReport::new();

        if let Err(e) = check_size(cities.len(), self.config.max_cities) {
            return report.fail(e, start);
        }
        let challenge = Arc::new(Challenge::from_cities(cities));
        self.run_challenge(challenge, report, start).await
    }

    async fn run_challenge(
        &self,
        challenge: Arc<Challenge>,
        mut report: RunReport,
        start: Instant,
    ) -> RunReport {
        report.enter(Phase::Discovering);
        let workers = match self.discover().await {
            Ok(workers) if workers.is_empty() => return report.fail(TspError::NoWorkers, start),
            Ok(workers) => Arc::new(workers),
            Err(e) => return report.fail(e, start),
        };
        report.num_workers = workers.len();
        info!(
            "[master] discovered {} workers: {:?}",
            workers.len(),
            workers.iter().map(|w| w.name()).collect::<Vec<_>>()
        );

        report.enter(Phase::Dispatching);
        let sub_problems = match partition(&challenge.cities, self.config.max_cities)
            .into_sub_problems()
        {
            Ok(sub_problems) => sub_problems,
            Err(e) => return report.fail(e, start),
        };
        report.num_sub_problems = sub_problems.len();
        let policy = RetryPolicy::from_config(&self.config);
        let call_timeout = Duration::from_millis(self.config.call_timeout_ms);
        let permits = Arc::new(Semaphore::new(workers.len()));
        let mut worker_index = 0;
        let mut handles: Vec<(usize, City, JoinHandle<Result<(String, TspResult), Vec<TspError>>>)> =
            Vec::with_capacity(sub_problems.len());
        for (index, sub_problem) in sub_problems.into_iter().enumerate() {
            debug!(
                "[master] sub-problem {} ({} second) -> {}",
                index,
                sub_problem.fixed_second,
                workers[worker_index].name()
            );
            let fixed_second = sub_problem.fixed_second.clone();
            let call = SubProblemCall {
                sub_problem,
                workers: workers.clone(),
                first_worker: worker_index,
                policy,
                call_timeout,
                permits: permits.clone(),
                local_fallback: self.config.local_fallback,
            };
            handles.push((index, fixed_second, tokio::spawn(call.execute())));
            worker_index = (worker_index + 1) % workers.len();
        }

        report.enter(Phase::Awaiting);
        let mut results = Vec::with_capacity(handles.len());
        for (index, fixed_second, handle) in handles {
            let errors = match handle.await {
                Ok(Ok((worker, result))) => {
                    results.push((index, fixed_second, worker, result));
                    continue;
                }
                Ok(Err(errors)) => errors,
                Err(e) => vec![TspError::RemoteCall {
                    worker: "master".to_string(),
                    reason: format!("task failed: {}", e),
                }],
            };
            warn!(
                "[master] excluding sub-problem {} ({} second) after {} failed attempts",
                index,
                fixed_second,
                errors.len()
            );
            report.failures.push(SubProblemFailure {
                index,
                fixed_second,
                errors,
            });
        }

        report.enter(Phase::Reducing);
        let mut best = TspResult::none();
        for (index, fixed_second, worker, result) in results {
            if let Err(e) = challenge.verify_result(&result) {
                warn!(
                    "[master] discarding result of sub-problem {} from {}: {}",
                    index, worker, e
                );
                report.failures.push(SubProblemFailure {
                    index,
                    fixed_second,
                    errors: vec![TspError::RemoteCall {
                        worker,
                        reason: format!("invalid result: {}", e),
                    }],
                });
                continue;
            }
            if result.is_better_than(&best) {
                best = result;
            }
        }
        report.failures.sort_by_key(|f| f.index);

        if !best.is_solution() {
            return report.fail(TspError::NoSolution, start);
        }
        report.result = best;
        report.enter(Phase::Done);
        report.elapsed = start.elapsed();
        info!(
            "[master] best distance {:.2} from {} sub-problems ({} failed) in {}ms",
            report.result.distance,
            report.num_sub_problems,
            report.failures.len(),
            report.elapsed.as_millis()
        );
        report
    }
}

struct SubProblemCall {
    sub_problem: SubProblem,
    workers: Arc<Vec<Arc<dyn WorkerHandle>>>,
    first_worker: usize,
    policy: RetryPolicy,
    call_timeout: Duration,
    permits: Arc<Semaphore>,
    local_fallback: bool,
}

impl SubProblemCall {
    async fn execute(self) -> Result<(String, TspResult), Vec<TspError>> {
        let mut errors = Vec::new();
        for attempt in 0..self.policy.attempts() {
            if attempt > 0 {
                sleep(self.policy.delay(attempt)).await;
            }
            let worker =
                &self.workers[self
                    .policy
                    .worker_for(self.first_worker, attempt, self.workers.len())];
            match self.attempt(worker.as_ref()).await {
                Ok(result) => return Ok((worker.name().to_string(), result)),
                Err(e) => {
                    warn!("[master] attempt {} failed: {}", attempt + 1, e);
                    errors.push(e);
                }
            }
        }
        if self.local_fallback {
            info!(
                "[master] solving sub-problem ({} second) locally",
                self.sub_problem.fixed_second
            );
            let sub_problem = self.sub_problem.clone();
            match spawn_blocking(move || tsp_worker::solve_sub_problem(sub_problem)).await {
                Ok((result, _)) => return Ok(("master".to_string(), result)),
                Err(e) => errors.push(TspError::RemoteCall {
                    worker: "master".to_string(),
                    reason: format!("local search failed: {}", e),
                }),
            }
        }
        Err(errors)
    }

    async fn attempt(&self, worker: &dyn WorkerHandle) -> Result<TspResult, TspError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| TspError::RemoteCall {
                worker: worker.name().to_string(),
                reason: e.to_string(),
            })?;
        match timeout(self.call_timeout, worker.solve(self.sub_problem.clone())).await {
            Ok(result) => result,
            Err(_) => Err(TspError::RemoteCall {
                worker: worker.name().to_string(),
                reason: format!("timed out after {}ms", self.call_timeout.as_millis()),
            }),
        }
    }
}
