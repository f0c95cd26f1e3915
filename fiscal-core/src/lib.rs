pub mod calculations;
pub mod models;
pub mod report;

pub use models::*;
