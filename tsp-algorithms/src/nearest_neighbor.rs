use tsp_structs::core::*;

/// Greedy tour from `cities[0]`: always move to the closest unvisited city,
/// preferring the earliest one on a tie, then return to the start.
pub fn solve(cities: &[City]) -> TspResult {
    let num_cities = cities.len();
    if num_cities < 2 {
        return TspResult::none();
    }
    let mut visited = vec![false; num_cities];
    let mut route = Vec::with_capacity(num_cities + 1);
    let mut distance = 0.0;
    let mut current = 0;
    visited[0] = true;
    route.push(cities[0].clone());
    while route.len() < num_cities {
        let mut next: Option<(usize, f64)> = None;
        for (i, city) in cities.iter().enumerate().filter(|(i, _)| !visited[*i]) {
            let d = cities[current].distance_to(city);
            if next.map_or(true, |(_, best)| d < best) {
                next = Some((i, d));
            }
        }
        let Some((i, d)) = next else { break };
        visited[i] = true;
        route.push(cities[i].clone());
        distance += d;
        current = i;
    }
    distance += cities[current].distance_to(&cities[0]);
    route.push(cities[0].clone());
    TspResult::new(route, distance)
}
