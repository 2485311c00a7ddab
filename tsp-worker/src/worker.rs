use std::{collections::HashSet, sync::Arc};

use log::debug;
use tokio::sync::Mutex;
use tsp_algorithms::brute_force::search_sub_route;
use tsp_structs::{api::*, core::*, error::TspError};

/// Checks that a request describes a genuine sub-problem: the two fixed cities
/// differ and every remaining city is distinct from them and from each other.
/// Cities are told apart by id, so repeated coordinates are fine.
pub fn validate(req: &SolveSubProblemReq) -> Result<(), TspError> {
    if req.fixed_second == req.origin {
        return Err(TspError::MalformedSubProblem(format!(
            "fixed_second {} is the origin",
            req.fixed_second
        )));
    }
    let mut seen: HashSet<&City> = HashSet::with_capacity(req.remaining.len() + 2);
    seen.insert(&req.origin);
    seen.insert(&req.fixed_second);
    for city in req.remaining.iter() {
        if !seen.insert(city) {
            return Err(TspError::MalformedSubProblem(format!(
                "city {} appears more than once",
                city
            )));
        }
    }
    Ok(())
}

/// Runs the search for one sub-problem on the calling thread.
pub fn solve_sub_problem(sub_problem: SubProblem) -> (TspResult, u64) {
    let SubProblem {
        origin,
        fixed_second,
        mut remaining,
    } = sub_problem;
    let outcome = search_sub_route(&origin, &fixed_second, &mut remaining);
    let num_permutations = outcome.num_permutations;
    (outcome.into_result(), num_permutations)
}

/// Remote search service. Holds no state between calls; concurrent calls on
/// one instance are run one after another.
pub struct Worker {
    name: String,
    lock: Arc<Mutex<()>>,
}

impl Worker {
    pub fn new(name: String) -> Self {
        Self {
            name,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn handle(&self, req: SolveSubProblemReq) -> Result<SolveSubProblemResp, TspError> {
        validate(&req)?;
        // Released when the search ends, even if the caller stopped waiting.
        let guard = self.lock.clone().lock_owned().await;
        debug!(
            "[worker] {}: solving sub-problem {} -> {} with {} remaining",
            self.name,
            req.origin,
            req.fixed_second,
            req.remaining.len()
        );
        let (result, num_permutations) = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            solve_sub_problem(req.into())
        })
        .await
        .map_err(|e| TspError::RemoteCall {
            worker: self.name.clone(),
            reason: format!("search task failed: {}", e),
        })?;
        debug!(
            "[worker] {}: best distance {} over {} permutations",
            self.name, result.distance, num_permutations
        );
        Ok(SolveSubProblemResp {
            worker: self.name.clone(),
            result,
            num_permutations: Some(num_permutations),
        })
    }

    pub async fn solve(&self, req: SolveSubProblemReq) -> Result<TspResult, TspError> {
        Ok(self.handle(req).await?.result)
    }
}
