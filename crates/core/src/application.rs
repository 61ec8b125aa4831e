use chrono::{Days, NaiveDate};

use crate::domain::{ForecastRecord, ForecastView};
use crate::ports::{ForecastRepository, ForecastWriter, Result};

/// Outcome of saving a fetched batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub saved: usize,
    pub failed: usize,
}

/// Application service connecting a fetched forecast to the store and to report output
pub struct ForecastServiceImpl {
    repository: Box<dyn ForecastRepository>,
    writer: Box<dyn ForecastWriter>,
}

impl ForecastServiceImpl {
    /// Creates a new ForecastServiceImpl with the given dependencies
    pub fn new(repository: Box<dyn ForecastRepository>, writer: Box<dyn ForecastWriter>) -> Self {
        Self { repository, writer }
    }

    /// Saves every record of a batch. Each day is its own transaction, so one
    /// bad day is logged and counted without losing the others.
    pub fn ingest(&self, records: &[ForecastRecord]) -> IngestReport {
        let mut report = IngestReport::default();

        for record in records {
            match self.repository.save(record) {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    tracing::warn!(
                        area_code = %record.area_code,
                        forecast_date = %record.forecast_date,
                        retryable = e.is_retryable(),
                        "Failed to save forecast: {}",
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::info!(saved = report.saved, failed = report.failed, "Forecast batch ingested");
        report
    }

    pub fn lookup(&self, area_code: &str, date: NaiveDate) -> Result<Option<ForecastView>> {
        self.repository.get_forecast(area_code, date)
    }

    /// Writes a report of the stored days in `[from, from + days)`. Dates with
    /// nothing stored are skipped; returns how many days were written.
    pub fn export(&self, area_code: &str, from: NaiveDate, days: u32) -> Result<usize> {
        let mut views = Vec::new();
        for offset in 0..days {
            let Some(date) = from.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            if let Some(view) = self.repository.get_forecast(area_code, date)? {
                views.push(view);
            }
        }

        if views.is_empty() {
            tracing::info!(area_code, "No stored forecasts to export");
            return Ok(0);
        }

        self.writer.write(area_code, &views)?;
        Ok(views.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryRepository {
        rows: Mutex<HashMap<(String, NaiveDate), ForecastRecord>>,
    }

    impl ForecastRepository for MemoryRepository {
        fn save(&self, record: &ForecastRecord) -> Result<()> {
            record.validate()?;
            if record.weather_code == "locked" {
                return Err(ForecastError::Unavailable("database is locked".into()));
            }
            self.rows
                .lock()
                .unwrap()
                .insert((record.area_code.clone(), record.forecast_date), record.clone());
            Ok(())
        }

        fn get_forecast(&self, area_code: &str, date: NaiveDate) -> Result<Option<ForecastView>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.get(&(area_code.to_string(), date)).map(|r| ForecastView {
                area_name: r.area_name.clone(),
                forecast_date: r.forecast_date,
                weather_description: r.weather_description.clone(),
                icon_path: format!("icons/{}.svg", r.weather_code),
                temperature_max: r.temperature_max,
                temperature_min: r.temperature_min,
                precipitation_probability: r.precipitation_probability,
                updated_at: Utc::now(),
            }))
        }
    }

    #[derive(Default, Clone)]
    struct CapturingWriter {
        written: Arc<Mutex<Vec<(String, Vec<ForecastView>)>>>,
    }

    impl ForecastWriter for CapturingWriter {
        fn write(&self, area_code: &str, views: &[ForecastView]) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .push((area_code.to_string(), views.to_vec()));
            Ok(())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn record(d: u32, weather_code: &str) -> ForecastRecord {
        ForecastRecord {
            area_code: "130000".to_string(),
            area_name: "東京".to_string(),
            region_code: "13".to_string(),
            region_name: None,
            forecast_date: day(d),
            weather_code: weather_code.to_string(),
            weather_description: "晴れ".to_string(),
            temperature_max: Some(28),
            temperature_min: None,
            precipitation_probability: Some(10),
        }
    }

    fn service(writer: CapturingWriter) -> ForecastServiceImpl {
        ForecastServiceImpl::new(Box::new(MemoryRepository::default()), Box::new(writer))
    }

    #[test]
    fn test_ingest_counts_saved_and_failed() {
        let service = service(CapturingWriter::default());
        let records = vec![record(1, "100"), record(2, ""), record(3, "locked"), record(4, "200")];

        let report = service.ingest(&records);

        assert_eq!(report, IngestReport { saved: 2, failed: 2 });
        assert!(service.lookup("130000", day(1)).unwrap().is_some());
        assert!(service.lookup("130000", day(2)).unwrap().is_none());
        assert!(service.lookup("130000", day(4)).unwrap().is_some());
    }

    #[test]
    fn test_ingest_empty_batch() {
        let service = service(CapturingWriter::default());
        assert_eq!(service.ingest(&[]), IngestReport::default());
    }

    #[test]
    fn test_export_skips_missing_days() {
        let writer = CapturingWriter::default();
        let service = service(writer.clone());
        service.ingest(&[record(1, "100"), record(3, "300")]);

        let written = service.export("130000", day(1), 3).unwrap();

        assert_eq!(written, 2);
        let captured = writer.written.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].0, "130000");
        let dates: Vec<NaiveDate> = captured[0].1.iter().map(|v| v.forecast_date).collect();
        assert_eq!(dates, vec![day(1), day(3)]);
    }

    #[test]
    fn test_export_with_nothing_stored_writes_nothing() {
        let writer = CapturingWriter::default();
        let service = service(writer.clone());

        assert_eq!(service.export("130000", day(1), 7).unwrap(), 0);
        assert!(writer.written.lock().unwrap().is_empty());
    }
}
