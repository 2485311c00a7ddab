use crate::{core::*, serializable_struct};
use serde::{Deserialize, Serialize};

// Worker endpoints
serializable_struct! {
    SolveSubProblemReq {
        origin: City,
        fixed_second: City,
        remaining: Vec<City>,
    }
}
impl From<SubProblem> for SolveSubProblemReq {
    fn from(sub_problem: SubProblem) -> Self {
        Self {
            origin: sub_problem.origin,
            fixed_second: sub_problem.fixed_second,
            remaining: sub_problem.remaining,
        }
    }
}
impl From<SolveSubProblemReq> for SubProblem {
    fn from(req: SolveSubProblemReq) -> Self {
        Self {
            origin: req.origin,
            fixed_second: req.fixed_second,
            remaining: req.remaining,
        }
    }
}

serializable_struct! {
    SolveSubProblemResp {
        worker: String,
        result: TspResult,
        num_permutations: Option<u64>,
    }
}

serializable_struct! {
    HealthResp {
        name: String,
    }
}

serializable_struct! {
    ErrorResp {
        error: String,
    }
}

// Registry endpoints
serializable_struct! {
    BindReq {
        name: String,
        url: String,
    }
}

serializable_struct! {
    BindResp {
        name: String,
        replaced: bool,
    }
}

serializable_struct! {
    UnbindReq {
        name: String,
    }
}

serializable_struct! {
    UnbindResp {
        name: String,
        removed: bool,
    }
}

serializable_struct! {
    ListNamesResp {
        names: Vec<String>,
    }
}

serializable_struct! {
    LookupResp {
        name: String,
        url: String,
    }
}
