use tsp_challenges::{Challenge, DistanceMatrix};
use tsp_structs::core::*;

/// Best tour found by [`search`] together with the number of complete tours
/// that were evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<T> {
    /// Closed tour: `prefix`, then a permutation of `remaining`, then `prefix[0]` again.
    pub best_route: Option<Vec<T>>,
    pub best_distance: f64,
    pub num_permutations: u64,
}

impl<T> SearchOutcome<T> {
    fn empty() -> Self {
        Self {
            best_route: None,
            best_distance: f64::INFINITY,
            num_permutations: 0,
        }
    }
}

/// Exhaustive search over every ordering of `remaining` appended to the fixed
/// `prefix`. Orderings are produced in place by swapping, and each swap is
/// undone before the next one, so `remaining` is left in its original order.
///
/// A tour replaces the current best only when it is strictly shorter, which
/// keeps the first tour found among equals.
pub fn search<T, F>(prefix: &[T], remaining: &mut [T], dist: F) -> SearchOutcome<T>
where
    T: Clone,
    F: Fn(&T, &T) -> f64,
{
    let mut outcome = SearchOutcome::empty();
    if prefix.len() + remaining.len() < 2 {
        return outcome;
    }
    permute(prefix, remaining, 0, &dist, &mut outcome);
    outcome
}

fn permute<T, F>(
    prefix: &[T],
    remaining: &mut [T],
    depth: usize,
    dist: &F,
    outcome: &mut SearchOutcome<T>,
) where
    T: Clone,
    F: Fn(&T, &T) -> f64,
{
    if depth == remaining.len() {
        outcome.num_permutations += 1;
        let distance = tour_distance(prefix, remaining, dist);
        if distance < outcome.best_distance {
            outcome.best_distance = distance;
            outcome.best_route = Some(
                prefix
                    .iter()
                    .chain(remaining.iter())
                    .chain(prefix.first().or(remaining.first()))
                    .cloned()
                    .collect(),
            );
        }
        return;
    }
    for i in depth..remaining.len() {
        remaining.swap(depth, i);
        permute(prefix, remaining, depth + 1, dist, outcome);
        remaining.swap(depth, i);
    }
}

fn tour_distance<T, F>(prefix: &[T], remaining: &[T], dist: &F) -> f64
where
    F: Fn(&T, &T) -> f64,
{
    let mut tour = prefix.iter().chain(remaining.iter());
    let first = match tour.next() {
        Some(first) => first,
        None => return f64::INFINITY,
    };
    let (last, total) = tour.fold((first, 0.0), |(prev, total), next| {
        (next, total + dist(prev, next))
    });
    total + dist(last, first)
}

impl SearchOutcome<City> {
    pub fn into_result(self) -> TspResult {
        match self.best_route {
            Some(route) => TspResult::new(route, self.best_distance),
            None => TspResult::none(),
        }
    }
}

/// Searches every tour leaving `origin` for `fixed_second`. `remaining` is
/// permuted in place and restored before returning.
pub fn search_sub_route(
    origin: &City,
    fixed_second: &City,
    remaining: &mut [City],
) -> SearchOutcome<City> {
    let prefix = [origin.clone(), fixed_second.clone()];
    search(&prefix, remaining, |a: &City, b: &City| a.distance_to(b))
}

pub fn solve_sub_route(origin: &City, fixed_second: &City, mut remaining: Vec<City>) -> TspResult {
    search_sub_route(origin, fixed_second, &mut remaining).into_result()
}

/// Index based search over a precomputed matrix. Every index not in `prefix`
/// is permuted.
pub fn solve_indices(matrix: &DistanceMatrix, prefix: &[usize]) -> (Option<Vec<usize>>, f64) {
    let mut remaining: Vec<usize> = (0..matrix.len()).filter(|i| !prefix.contains(i)).collect();
    let outcome = search(prefix, &mut remaining, |&a: &usize, &b: &usize| {
        matrix.get(a, b)
    });
    (outcome.best_route, outcome.best_distance)
}

/// Single-process reference solver: fixes only the origin and searches the
/// whole instance.
pub fn solve_sequential(challenge: &Challenge) -> TspResult {
    if challenge.num_cities() < 2 {
        return TspResult::none();
    }
    match solve_indices(&challenge.distance_matrix, &[0]) {
        (Some(route), distance) => TspResult::new(
            route
                .into_iter()
                .map(|i| challenge.cities[i].clone())
                .collect(),
            distance,
        ),
        (None, _) => TspResult::none(),
    }
}
