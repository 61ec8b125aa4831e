//! Core of the forecast store: domain types, ports and the application service.
//!
//! Adapters implement the ports (`ForecastRepository`, `ForecastWriter`); the
//! core never touches SQL, HTTP or file formats itself.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

pub use application::{ForecastServiceImpl, IngestReport};
pub use config::StoreConfig;
pub use domain::{ForecastRecord, ForecastView, TemperatureKind};
pub use error::ForecastError;
