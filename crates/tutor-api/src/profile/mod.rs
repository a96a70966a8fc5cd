pub mod model;
pub mod routes;

pub use routes::{preferred_language, routes};
