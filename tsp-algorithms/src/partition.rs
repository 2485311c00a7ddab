use tsp_structs::{config::DEFAULT_MAX_CITIES, core::*, error::TspError};

/// Largest instance accepted by default. 13 cities already mean 12! tours.
pub const MAX_CITIES: usize = DEFAULT_MAX_CITIES;

#[derive(Debug, Clone, PartialEq)]
pub enum Partition {
    Insufficient { num_cities: usize },
    Infeasible { num_cities: usize, max_cities: usize },
    SubProblems(Vec<SubProblem>),
}

impl Partition {
    pub fn into_sub_problems(self) -> Result<Vec<SubProblem>, TspError> {
        match self {
            Partition::Insufficient { num_cities } => {
                Err(TspError::InsufficientCities { num_cities })
            }
            Partition::Infeasible {
                num_cities,
                max_cities,
            } => Err(TspError::InfeasibleSize {
                num_cities,
                max_cities,
            }),
            Partition::SubProblems(sub_problems) => Ok(sub_problems),
        }
    }
}

pub fn check_size(num_cities: usize, max_cities: usize) -> Result<(), TspError> {
    if num_cities < 2 {
        Err(TspError::InsufficientCities { num_cities })
    } else if num_cities > max_cities {
        Err(TspError::InfeasibleSize {
            num_cities,
            max_cities,
        })
    } else {
        Ok(())
    }
}

/// Splits the tours of `cities` by their second stop. The first city is the
/// origin; for each other city `k` there is one sub-problem fixing `k` second,
/// with every remaining city in input order.
pub fn partition(cities: &[City], max_cities: usize) -> Partition {
    match check_size(cities.len(), max_cities) {
        Err(TspError::InsufficientCities { num_cities }) => {
            return Partition::Insufficient { num_cities }
        }
        Err(TspError::InfeasibleSize {
            num_cities,
            max_cities,
        }) => {
            return Partition::Infeasible {
                num_cities,
                max_cities,
            }
        }
        _ => {}
    }
    let origin = &cities[0];
    let sub_problems = (1..cities.len())
        .map(|k| SubProblem {
            origin: origin.clone(),
            fixed_second: cities[k].clone(),
            remaining: cities[1..]
                .iter()
                .enumerate()
                .filter(|(i, _)| i + 1 != k)
                .map(|(_, c)| c.clone())
                .collect(),
        })
        .collect();
    Partition::SubProblems(sub_problems)
}
