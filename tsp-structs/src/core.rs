use serde::{Deserialize, Serialize};
use std::fmt;

/// A labelled point. `id` is the entry's position in the instance, so a city
/// listed twice under the same name and coordinates is still two cities.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct City {
    #[serde(default)]
    pub id: usize,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl City {
    pub fn new(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            x,
            y,
        }
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    pub fn distance_to(&self, other: &City) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Best closed tour found by a search. `route == None` with an infinite
/// distance means no tour was found.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TspResult {
    #[serde(default)]
    pub route: Option<Vec<City>>,
    #[serde(with = "infinite_as_null")]
    pub distance: f64,
}

impl TspResult {
    pub fn new(route: Vec<City>, distance: f64) -> Self {
        Self {
            route: Some(route),
            distance,
        }
    }

    pub fn none() -> Self {
        Self {
            route: None,
            distance: f64::INFINITY,
        }
    }

    pub fn is_solution(&self) -> bool {
        self.route.is_some() && self.distance.is_finite()
    }

    /// Strictly shorter than `other`. Equal distances never replace, so the
    /// first result seen wins a tie.
    pub fn is_better_than(&self, other: &TspResult) -> bool {
        self.distance < other.distance
    }

    pub fn route_names(&self) -> Option<Vec<&str>> {
        self.route
            .as_ref()
            .map(|route| route.iter().map(|c| c.name.as_str()).collect())
    }
}

impl Default for TspResult {
    fn default() -> Self {
        Self::none()
    }
}

/// Independent slice of the search space: every tour that leaves `origin`
/// for `fixed_second` and then visits `remaining` in some order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubProblem {
    pub origin: City,
    pub fixed_second: City,
    pub remaining: Vec<City>,
}

impl SubProblem {
    pub fn fixed_prefix(&self) -> [&City; 2] {
        [&self.origin, &self.fixed_second]
    }

    pub fn num_cities(&self) -> usize {
        self.remaining.len() + 2
    }
}

// JSON has no representation for infinity, so the "no solution" distance
// travels as null.
mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
