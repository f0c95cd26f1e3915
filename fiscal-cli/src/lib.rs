pub mod app;
pub mod config;
pub mod logging;
pub mod pdf;
pub mod state;
pub mod utils;

pub use config::{AppConfig, ConfigError};
pub use state::{Calculation, LoginError, Session};
