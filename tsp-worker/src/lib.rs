mod worker;
pub use worker::*;
pub mod server;
