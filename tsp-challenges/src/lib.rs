pub mod travelling_salesman;
pub use travelling_salesman::{load_cities, parse_cities, Challenge, DistanceMatrix};
