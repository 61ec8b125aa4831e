//! SQLite-backed forecast store.
//!
//! Reference data (regions, areas, weather types) and per-day forecast facts
//! live in a small normalized schema. Every `save` runs in one immediate
//! transaction; reads run in WAL mode and only ever see committed data.

use chrono::{DateTime, NaiveDate, Utc};
use forecast_core::config::StoreConfig;
use forecast_core::domain::{icon_path, ForecastRecord, ForecastView, TemperatureKind};
use forecast_core::error::ForecastError;
use forecast_core::ports::{ForecastRepository, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};

const SCHEMA_VERSION: i32 = 1;

/// Extension trait for classifying rusqlite errors into the store's error kinds.
pub trait RusqliteErrorExt {
    fn into_forecast_error(self) -> ForecastError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_forecast_error(self) -> ForecastError {
        let code = match &self {
            rusqlite::Error::SqliteFailure(err, _) => Some(err.code),
            _ => None,
        };
        match code {
            Some(ErrorCode::ConstraintViolation) => ForecastError::Constraint(self.to_string()),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure,
            ) => ForecastError::Unavailable(self.to_string()),
            Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt) => {
                ForecastError::Corrupt(self.to_string())
            }
            _ => ForecastError::Storage(self.to_string()),
        }
    }
}

/// SQLite implementation of the ForecastRepository trait.
///
/// Holds only settings; each call checks out its own connection, so clones can
/// be handed to other threads freely.
#[derive(Debug, Clone)]
pub struct SqliteForecastRepository {
    config: StoreConfig,
}

impl SqliteForecastRepository {
    /// Opens the store, creating the database file and schema if they don't exist.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let repo = Self { config };
        let mut conn = repo.connect()?;

        let journal_mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(RusqliteErrorExt::into_forecast_error)?;

        let version = init_schema(&mut conn).map_err(RusqliteErrorExt::into_forecast_error)?;
        if version > SCHEMA_VERSION {
            return Err(ForecastError::Storage(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }

        tracing::info!(
            db_path = %repo.config.db_path.display(),
            journal_mode = %journal_mode,
            schema_version = version,
            "Forecast store ready"
        );
        Ok(repo)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn connect(&self) -> Result<Connection> {
        let conn =
            Connection::open(&self.config.db_path).map_err(RusqliteErrorExt::into_forecast_error)?;
        conn.busy_timeout(self.config.busy_timeout)
            .map_err(RusqliteErrorExt::into_forecast_error)?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(RusqliteErrorExt::into_forecast_error)?;
        Ok(conn)
    }

    fn write_record(&self, conn: &mut Connection, record: &ForecastRecord) -> rusqlite::Result<i64> {
        let now = Utc::now();
        // A blank name carries no information; treat it like an absent one.
        let region_name = record
            .region_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO regions (region_code, region_name, created_at, updated_at)
             VALUES (?1, COALESCE(?2, ?1), ?3, ?3)
             ON CONFLICT (region_code) DO UPDATE SET
                region_name = COALESCE(?2, regions.region_name),
                updated_at = excluded.updated_at",
            params![record.region_code, region_name, now],
        )?;

        tx.execute(
            "INSERT INTO areas (area_code, area_name, region_code, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (area_code) DO UPDATE SET
                area_name = excluded.area_name,
                region_code = excluded.region_code,
                updated_at = excluded.updated_at",
            params![record.area_code, record.area_name, record.region_code, now],
        )?;

        tx.execute(
            "INSERT INTO weather_types (weather_code, weather_description, icon_path, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (weather_code) DO UPDATE SET
                weather_description = excluded.weather_description,
                icon_path = excluded.icon_path,
                updated_at = excluded.updated_at",
            params![
                record.weather_code,
                record.weather_description,
                icon_path(&self.config.icon_base_url, &record.weather_code),
                now
            ],
        )?;

        tx.execute(
            "INSERT INTO weather_forecasts (area_code, forecast_date, weather_code, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (area_code, forecast_date) DO UPDATE SET
                weather_code = excluded.weather_code,
                updated_at = excluded.updated_at",
            params![record.area_code, record.forecast_date, record.weather_code, now],
        )?;

        let forecast_id: i64 = tx.query_row(
            "SELECT id FROM weather_forecasts WHERE area_code = ?1 AND forecast_date = ?2",
            params![record.area_code, record.forecast_date],
            |row| row.get(0),
        )?;

        // Measurements are replaced wholesale: a reading missing from the new
        // record must not survive from an earlier save.
        tx.execute("DELETE FROM temperatures WHERE forecast_id = ?1", params![forecast_id])?;
        tx.execute(
            "DELETE FROM precipitation_probabilities WHERE forecast_id = ?1",
            params![forecast_id],
        )?;

        let readings = [
            (TemperatureKind::Max, record.temperature_max),
            (TemperatureKind::Min, record.temperature_min),
        ];
        for (kind, value) in readings {
            if let Some(temperature) = value {
                tx.execute(
                    "INSERT INTO temperatures (forecast_id, temperature_type, temperature, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![forecast_id, kind.as_str(), temperature, now],
                )?;
            }
        }

        if let Some(probability) = record.precipitation_probability {
            tx.execute(
                "INSERT INTO precipitation_probabilities (forecast_id, probability, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params![forecast_id, probability, now],
            )?;
        }

        tx.commit()?;
        Ok(forecast_id)
    }

    fn row_to_view(row: &Row) -> rusqlite::Result<ForecastView> {
        Ok(ForecastView {
            area_name: row.get(0)?,
            forecast_date: row.get(1)?,
            weather_description: row.get(2)?,
            icon_path: row.get(3)?,
            temperature_max: row.get(4)?,
            temperature_min: row.get(5)?,
            precipitation_probability: row.get(6)?,
            updated_at: row.get::<_, DateTime<Utc>>(7)?,
        })
    }
}

impl ForecastRepository for SqliteForecastRepository {
    fn save(&self, record: &ForecastRecord) -> Result<()> {
        record.validate()?;

        let mut conn = self.connect()?;
        let forecast_id = self
            .write_record(&mut conn, record)
            .map_err(RusqliteErrorExt::into_forecast_error)?;

        tracing::debug!(
            forecast_id,
            area_code = %record.area_code,
            forecast_date = %record.forecast_date,
            "Forecast saved"
        );
        Ok(())
    }

    fn get_forecast(&self, area_code: &str, date: NaiveDate) -> Result<Option<ForecastView>> {
        let conn = self.connect()?;

        conn.query_row(
            r#"
            SELECT
                a.area_name,
                wf.forecast_date,
                wt.weather_description,
                wt.icon_path,
                t_max.temperature AS max_temp,
                t_min.temperature AS min_temp,
                pp.probability AS rain_probability,
                wf.updated_at
            FROM weather_forecasts wf
            JOIN areas a ON wf.area_code = a.area_code
            JOIN weather_types wt ON wf.weather_code = wt.weather_code
            LEFT JOIN temperatures t_max ON wf.id = t_max.forecast_id
                AND t_max.temperature_type = 'max'
            LEFT JOIN temperatures t_min ON wf.id = t_min.forecast_id
                AND t_min.temperature_type = 'min'
            LEFT JOIN precipitation_probabilities pp ON wf.id = pp.forecast_id
            WHERE wf.area_code = ?1 AND wf.forecast_date = ?2
            "#,
            params![area_code, date],
            Self::row_to_view,
        )
        .optional()
        .map_err(RusqliteErrorExt::into_forecast_error)
    }
}

/// Creates the tables if missing and returns the recorded schema version.
fn init_schema(conn: &mut Connection) -> rusqlite::Result<i32> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);

        CREATE TABLE IF NOT EXISTS regions (
            region_code TEXT PRIMARY KEY,
            region_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS areas (
            area_code TEXT PRIMARY KEY,
            area_name TEXT NOT NULL,
            region_code TEXT NOT NULL REFERENCES regions (region_code),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weather_types (
            weather_code TEXT PRIMARY KEY,
            weather_description TEXT NOT NULL,
            icon_path TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS weather_forecasts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            area_code TEXT NOT NULL REFERENCES areas (area_code),
            forecast_date TEXT NOT NULL,
            weather_code TEXT NOT NULL REFERENCES weather_types (weather_code),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (area_code, forecast_date)
        );

        CREATE TABLE IF NOT EXISTS temperatures (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            forecast_id INTEGER NOT NULL REFERENCES weather_forecasts (id),
            temperature_type TEXT NOT NULL CHECK (temperature_type IN ('max', 'min')),
            temperature INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (forecast_id, temperature_type)
        );

        CREATE TABLE IF NOT EXISTS precipitation_probabilities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            forecast_id INTEGER NOT NULL UNIQUE REFERENCES weather_forecasts (id),
            probability INTEGER NOT NULL CHECK (probability BETWEEN 0 AND 100),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_areas_region ON areas (region_code);
        "#,
    )?;

    let version = match tx
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .optional()?
    {
        Some(version) => version,
        None => {
            tx.execute("INSERT INTO schema_version (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            SCHEMA_VERSION
        }
    };

    tx.commit()?;
    Ok(version)
}
