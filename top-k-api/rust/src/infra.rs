pub mod config;
pub mod os;
pub mod telemetry;
