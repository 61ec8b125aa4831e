//! Decoder for Japan Meteorological Agency forecast documents.
//!
//! Takes the JSON served at `bosai/forecast/data/forecast/<area>.json` (already
//! downloaded by the caller) and turns the short-term series into one
//! `ForecastRecord` per day. No HTTP happens here.

use chrono::{DateTime, Days, NaiveDate};
use forecast_core::domain::ForecastRecord;
use forecast_core::error::ForecastError;
use forecast_core::ports::Result;
use forecast_core::utils::region_code_for;
use serde::Deserialize;

mod catalog;

pub use catalog::{find_prefecture, Prefecture, PREFECTURES};

pub const FORECAST_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/forecast";

/// Where the forecast document for an area is published.
pub fn forecast_url(area_code: &str) -> String {
    format!("{}/{}.json", FORECAST_BASE_URL, area_code)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastDocument {
    time_series: Vec<TimeSeries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSeries {
    #[serde(default)]
    time_defines: Vec<String>,
    #[serde(default)]
    areas: Vec<AreaSeries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AreaSeries {
    #[serde(default)]
    weather_codes: Vec<String>,
    #[serde(default)]
    weathers: Vec<String>,
    #[serde(default)]
    pops: Vec<String>,
    #[serde(default)]
    temps: Vec<String>,
}

/// Decodes a forecast document into per-day records for one area.
///
/// Series layout: `[0]` weather codes and descriptions, `[1]` precipitation
/// probabilities, `[2]` temperatures as min/max pairs. Only the first
/// sub-area of each series is read. Days are dated from the weather series'
/// `timeDefines`, falling back to `today + n` when a define is missing.
pub fn decode_forecast(
    payload: &str,
    area_code: &str,
    area_name: &str,
    today: NaiveDate,
) -> Result<Vec<ForecastRecord>> {
    let documents: Vec<ForecastDocument> =
        serde_json::from_str(payload).map_err(|e| ForecastError::Payload(e.to_string()))?;
    let document = documents
        .first()
        .ok_or_else(|| ForecastError::Payload("forecast document list is empty".to_string()))?;

    let weather_series = document
        .time_series
        .first()
        .ok_or_else(|| ForecastError::Payload("no time series in forecast".to_string()))?;
    let weather = weather_series
        .areas
        .first()
        .ok_or_else(|| ForecastError::Payload("weather series has no areas".to_string()))?;

    let empty = AreaSeries::default();
    let pops = first_area(&document.time_series, 1).unwrap_or(&empty);
    let temps = first_area(&document.time_series, 2).unwrap_or(&empty);

    let region_code = region_code_for(area_code);
    let mut records = Vec::with_capacity(weather.weathers.len());

    for (i, (weather_code, description)) in
        weather.weather_codes.iter().zip(&weather.weathers).enumerate()
    {
        let Some(forecast_date) = forecast_date(weather_series, i, today) else {
            tracing::warn!(area_code, day = i, "Forecast day out of calendar range, skipping");
            continue;
        };

        records.push(ForecastRecord {
            area_code: area_code.to_string(),
            area_name: area_name.to_string(),
            region_code: region_code.clone(),
            region_name: None,
            forecast_date,
            weather_code: weather_code.clone(),
            weather_description: description.clone(),
            temperature_max: reading(&temps.temps, i * 2 + 1),
            temperature_min: reading(&temps.temps, i * 2),
            precipitation_probability: reading(&pops.pops, i),
        });
    }

    tracing::debug!(area_code, days = records.len(), "Decoded forecast document");
    Ok(records)
}

fn first_area(series: &[TimeSeries], index: usize) -> Option<&AreaSeries> {
    series.get(index).and_then(|s| s.areas.first())
}

fn forecast_date(series: &TimeSeries, day: usize, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(define) = series.time_defines.get(day) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(define) {
            return Some(dt.date_naive());
        }
    }
    today.checked_add_days(Days::new(day as u64))
}

/// Numeric reading at `index`; blanks and unparseable values count as absent.
fn reading<T: std::str::FromStr>(values: &[String], index: usize) -> Option<T> {
    values
        .get(index)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn sample() -> String {
        serde_json::json!([
            {
                "publishingOffice": "気象庁",
                "reportDatetime": "2024-06-01T11:00:00+09:00",
                "timeSeries": [
                    {
                        "timeDefines": [
                            "2024-06-01T11:00:00+09:00",
                            "2024-06-02T00:00:00+09:00",
                            "2024-06-03T00:00:00+09:00"
                        ],
                        "areas": [
                            {
                                "area": { "name": "東京地方", "code": "130010" },
                                "weatherCodes": ["100", "201", "300"],
                                "weathers": ["晴れ", "くもり　時々　晴れ", "雨"]
                            },
                            {
                                "area": { "name": "伊豆諸島北部", "code": "130020" },
                                "weatherCodes": ["200", "200", "200"],
                                "weathers": ["くもり", "くもり", "くもり"]
                            }
                        ]
                    },
                    {
                        "timeDefines": ["2024-06-01T12:00:00+09:00"],
                        "areas": [
                            { "area": { "name": "東京地方", "code": "130010" }, "pops": ["10", "", "60"] }
                        ]
                    },
                    {
                        "timeDefines": ["2024-06-01T09:00:00+09:00"],
                        "areas": [
                            { "area": { "name": "東京", "code": "44132" }, "temps": ["19", "28", "", "26"] }
                        ]
                    }
                ]
            },
            { "publishingOffice": "気象庁", "timeSeries": [] }
        ])
        .to_string()
    }

    #[test]
    fn test_decode_forecast_days() {
        let records = decode_forecast(&sample(), "130000", "東京", today()).unwrap();

        assert_eq!(records.len(), 3);
        let first = &records[0];
        assert_eq!(first.area_code, "130000");
        assert_eq!(first.area_name, "東京");
        assert_eq!(first.region_code, "13");
        assert_eq!(first.forecast_date, today());
        assert_eq!(first.weather_code, "100");
        assert_eq!(first.weather_description, "晴れ");
        assert_eq!(first.temperature_min, Some(19));
        assert_eq!(first.temperature_max, Some(28));
        assert_eq!(first.precipitation_probability, Some(10));
    }

    #[test]
    fn test_decode_blank_and_missing_readings() {
        let records = decode_forecast(&sample(), "130000", "東京", today()).unwrap();

        let second = &records[1];
        assert_eq!(second.forecast_date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(second.temperature_min, None);
        assert_eq!(second.temperature_max, Some(26));
        assert_eq!(second.precipitation_probability, None);

        let third = &records[2];
        assert_eq!(third.temperature_min, None);
        assert_eq!(third.temperature_max, None);
        assert_eq!(third.precipitation_probability, Some(60));
    }

    #[test]
    fn test_decode_keeps_description_verbatim() {
        let records = decode_forecast(&sample(), "130000", "東京", today()).unwrap();
        assert_eq!(records[1].weather_description, "くもり　時々　晴れ");
    }

    #[test]
    fn test_decode_without_time_defines_counts_from_today() {
        let payload = serde_json::json!([{
            "timeSeries": [{
                "areas": [{ "weatherCodes": ["100", "101"], "weathers": ["晴れ", "晴れ時々くもり"] }]
            }]
        }])
        .to_string();

        let records = decode_forecast(&payload, "270000", "大阪", today()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].forecast_date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(records[1].region_code, "27");
        assert_eq!(records[0].temperature_max, None);
        assert_eq!(records[0].precipitation_probability, None);
    }

    #[test]
    fn test_decode_rejects_empty_document_list() {
        let err = decode_forecast("[]", "130000", "東京", today()).unwrap_err();
        assert!(matches!(err, ForecastError::Payload(_)));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = decode_forecast("{not json", "130000", "東京", today()).unwrap_err();
        assert!(matches!(err, ForecastError::Payload(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_rejects_missing_weather_areas() {
        let payload = r#"[{"timeSeries":[{"timeDefines":[],"areas":[]}]}]"#;
        assert!(decode_forecast(payload, "130000", "東京", today()).is_err());
    }

    #[test]
    fn test_reading_parses_trimmed_numbers() {
        let values = vec![" 5 ".to_string(), "abc".to_string(), "-3".to_string()];
        assert_eq!(reading::<i32>(&values, 0), Some(5));
        assert_eq!(reading::<i32>(&values, 1), None);
        assert_eq!(reading::<i32>(&values, 2), Some(-3));
        assert_eq!(reading::<u8>(&values, 2), None);
        assert_eq!(reading::<i32>(&values, 9), None);
    }

    #[test]
    fn test_forecast_url() {
        assert_eq!(
            forecast_url("130000"),
            "https://www.jma.go.jp/bosai/forecast/data/forecast/130000.json"
        );
    }
}
