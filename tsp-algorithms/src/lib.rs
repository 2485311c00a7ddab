pub mod brute_force;
pub mod nearest_neighbor;
pub mod partition;

pub use partition::{check_size, partition, Partition, MAX_CITIES};
