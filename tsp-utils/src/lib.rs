mod hash;
pub use hash::*;
mod json;
pub use json::*;
#[cfg(feature = "request")]
mod request;
#[cfg(feature = "request")]
pub use request::*;
#[cfg(feature = "reply")]
mod reply;
#[cfg(feature = "reply")]
pub use reply::*;
