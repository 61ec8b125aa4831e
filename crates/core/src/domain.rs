use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::ForecastError;

/// One decoded forecast day for one area, as handed over by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRecord {
    pub area_code: String,
    pub area_name: String,
    pub region_code: String,
    pub region_name: Option<String>,
    pub forecast_date: NaiveDate,
    pub weather_code: String,
    pub weather_description: String,
    pub temperature_max: Option<i32>,
    pub temperature_min: Option<i32>,
    pub precipitation_probability: Option<u8>,
}

impl ForecastRecord {
    /// Checks the fields the store keys on before anything is written.
    pub fn validate(&self) -> Result<(), ForecastError> {
        require_key("area_code", &self.area_code)?;
        require_key("region_code", &self.region_code)?;
        require_key("weather_code", &self.weather_code)?;

        if let Some(probability) = self.precipitation_probability {
            if probability > 100 {
                return Err(ForecastError::invalid(
                    "precipitation_probability",
                    format!("{} is not a percentage", probability),
                ));
            }
        }
        Ok(())
    }
}

fn require_key(field: &'static str, value: &str) -> Result<(), ForecastError> {
    if value.trim().is_empty() {
        return Err(ForecastError::invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Denormalized read model for one area on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastView {
    pub area_name: String,
    pub forecast_date: NaiveDate,
    pub weather_description: String,
    pub icon_path: String,
    pub temperature_max: Option<i32>,
    pub temperature_min: Option<i32>,
    pub precipitation_probability: Option<u8>,
    pub updated_at: DateTime<Utc>,
}

/// Which reading a temperature row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureKind {
    Max,
    Min,
}

impl TemperatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
        }
    }
}

/// Icon locator for a weather code under the given base URL.
pub fn icon_path(base_url: &str, weather_code: &str) -> String {
    format!("{}/{}.svg", base_url.trim_end_matches('/'), weather_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> ForecastRecord {
        ForecastRecord {
            area_code: "130000".to_string(),
            area_name: "東京".to_string(),
            region_code: "13".to_string(),
            region_name: None,
            forecast_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            weather_code: "100".to_string(),
            weather_description: "晴れ".to_string(),
            temperature_max: Some(28),
            temperature_min: Some(19),
            precipitation_probability: Some(10),
        }
    }

    #[test]
    fn test_validate_accepts_complete_record() {
        assert!(tokyo().validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_empty_optional_fields() {
        let record = ForecastRecord {
            area_name: String::new(),
            weather_description: String::new(),
            temperature_max: None,
            temperature_min: None,
            precipitation_probability: None,
            ..tokyo()
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_area_code() {
        let record = ForecastRecord {
            area_code: "  ".to_string(),
            ..tokyo()
        };
        match record.validate() {
            Err(ForecastError::InvalidRecord { field, .. }) => assert_eq!(field, "area_code"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_weather_code() {
        let record = ForecastRecord {
            weather_code: String::new(),
            ..tokyo()
        };
        assert!(matches!(
            record.validate(),
            Err(ForecastError::InvalidRecord { field: "weather_code", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_probability_over_100() {
        let record = ForecastRecord {
            precipitation_probability: Some(101),
            ..tokyo()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_icon_path_joins_base_and_code() {
        assert_eq!(
            icon_path("https://www.jma.go.jp/bosai/forecast/img/", "201"),
            "https://www.jma.go.jp/bosai/forecast/img/201.svg"
        );
    }

    #[test]
    fn test_temperature_kind_labels() {
        assert_eq!(TemperatureKind::Max.as_str(), "max");
        assert_eq!(TemperatureKind::Min.as_str(), "min");
    }
}
