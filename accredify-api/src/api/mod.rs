//! HTTP API for accredify-api

pub mod frequency_logs;
pub mod health;
pub mod import;
pub mod indicators;
pub mod tasks;

pub use frequency_logs::frequency_log_routes;
pub use health::health_routes;
pub use import::import_routes;
pub use indicators::indicator_routes;
pub use tasks::task_routes;
