use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tsp_structs::{core::*, error::TspError};

/// Relative tolerance used when comparing a claimed tour length against a
/// recomputed one.
const DISTANCE_EPSILON: f64 = 1e-9;

const GRID_MAX: i32 = 1000;
const GRID_POSITIONS: usize = (GRID_MAX as usize + 1) * (GRID_MAX as usize + 1);

/// Symmetric table of pairwise Euclidean distances, indexed by city position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn from_cities(cities: &[City]) -> Self {
        let distances = cities
            .iter()
            .map(|from| cities.iter().map(|to| from.distance_to(to)).collect())
            .collect();
        Self { distances }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Challenge {
    pub cities: Vec<City>,
    pub distance_matrix: DistanceMatrix,
}

impl Challenge {
    /// Builds an instance from an ordered city list. The first city is the
    /// origin of every tour. Each city's `id` is reset to its position, so a
    /// repeated entry stays a separate stop.
    pub fn from_cities(cities: Vec<City>) -> Self {
        let cities: Vec<City> = cities
            .into_iter()
            .enumerate()
            .map(|(i, city)| city.with_id(i))
            .collect();
        let distance_matrix = DistanceMatrix::from_cities(&cities);
        Self {
            cities,
            distance_matrix,
        }
    }

    /// Random instance on a 1001x1001 grid with distinct positions. Cities are
    /// named `C0`, `C1`, ... in generation order.
    pub fn generate_instance(seed: &[u8; 32], num_cities: usize) -> Result<Self, TspError> {
        if num_cities < 2 {
            return Err(TspError::InsufficientCities { num_cities });
        }
        if num_cities > GRID_POSITIONS {
            return Err(TspError::Input(format!(
                "cannot place {} cities on {} distinct grid positions",
                num_cities, GRID_POSITIONS
            )));
        }
        let mut rng = SmallRng::from_seed(seed.clone());

        let mut cities: Vec<City> = Vec::with_capacity(num_cities);
        let mut positions: HashSet<(i32, i32)> = HashSet::with_capacity(num_cities);
        while cities.len() < num_cities {
            let pos = (rng.gen_range(0..=GRID_MAX), rng.gen_range(0..=GRID_MAX));
            if !positions.insert(pos) {
                continue;
            }
            cities.push(City::new(format!("C{}", cities.len()), pos.0, pos.1));
        }
        Ok(Self::from_cities(cities))
    }

    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    pub fn origin(&self) -> Option<&City> {
        self.cities.first()
    }

    /// Length of a closed route given as cities, first and last entry equal.
    /// Cities are matched to the instance by id, name and position.
    pub fn calc_route_distance(&self, route: &[City]) -> Result<f64> {
        let index: HashMap<&City, usize> =
            self.cities.iter().enumerate().map(|(i, c)| (c, i)).collect();
        let positions = route
            .iter()
            .map(|city| {
                index
                    .get(city)
                    .copied()
                    .ok_or_else(|| anyhow!("Route contains unknown city {}", city.name))
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(positions
            .windows(2)
            .map(|w| self.distance_matrix.get(w[0], w[1]))
            .sum())
    }

    /// Checks that `result` is a closed tour starting and ending at the origin,
    /// visiting every other city exactly once, with a distance matching the
    /// route.
    pub fn verify_result(&self, result: &TspResult) -> Result<()> {
        let route = result
            .route
            .as_ref()
            .ok_or_else(|| anyhow!("Result has no route"))?;
        let num_cities = self.num_cities();
        if route.len() != num_cities + 1 {
            return Err(anyhow!(
                "Route length ({}) does not match number of cities plus return ({})",
                route.len(),
                num_cities + 1
            ));
        }
        let origin = self.origin().ok_or_else(|| anyhow!("Instance has no cities"))?;
        if &route[0] != origin || &route[num_cities] != origin {
            return Err(anyhow!("Route must start and end at {}", origin.name));
        }
        let visited = route[..num_cities].iter().collect::<HashSet<&City>>();
        if visited.len() != num_cities {
            return Err(anyhow!("Route contains duplicate cities"));
        }
        let total_distance = self.calc_route_distance(route)?;
        let tolerance = DISTANCE_EPSILON * total_distance.max(1.0);
        if (total_distance - result.distance).abs() > tolerance {
            return Err(anyhow!(
                "Claimed distance ({}) does not match route distance ({})",
                result.distance,
                total_distance
            ));
        }
        Ok(())
    }
}

/// Parses `name,x,y` lines into cities numbered in file order. Surrounding
/// whitespace is ignored, lines without exactly three fields are skipped and a
/// non-integer coordinate is an error.
pub fn parse_cities(text: &str) -> Result<Vec<City>, TspError> {
    let mut cities = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() != 3 {
            continue;
        }
        let coord = |field: &str| {
            field.parse::<i32>().map_err(|_| {
                TspError::Input(format!(
                    "line {}: invalid coordinate '{}'",
                    line_no + 1,
                    field
                ))
            })
        };
        let city = City::new(fields[0], coord(fields[1])?, coord(fields[2])?);
        cities.push(city.with_id(cities.len()));
    }
    Ok(cities)
}

pub fn load_cities(path: impl AsRef<Path>) -> Result<Vec<City>, TspError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| TspError::Input(format!("failed to read {}: {}", path.display(), e)))?;
    parse_cities(&text)
}
