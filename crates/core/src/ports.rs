use chrono::NaiveDate;

use crate::domain::{ForecastRecord, ForecastView};
use crate::error::ForecastError;

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Durable store for decoded forecast days.
pub trait ForecastRepository: Send + Sync {
    /// Upserts one record atomically: either every row it touches is written or none is.
    fn save(&self, record: &ForecastRecord) -> Result<()>;

    /// Reconstructs the view for one area and date. `Ok(None)` when nothing was saved for it.
    fn get_forecast(&self, area_code: &str, date: NaiveDate) -> Result<Option<ForecastView>>;
}

/// Trait for writing forecast reports
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ForecastWriter: Send + Sync {
    fn write(&self, area_code: &str, views: &[ForecastView]) -> Result<()>;
}
