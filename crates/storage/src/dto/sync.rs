use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One day of health-provider metrics. The provider reports timestamps with
/// full datetime precision while the ledger keys on the calendar date, so
/// the date is truncated to `YYYY-MM-DD` during deserialization.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DaySample {
    #[serde(deserialize_with = "deserialize_day")]
    #[schema(value_type = String, example = "2025-01-07T13:45:00")]
    pub date: NaiveDate,
    #[serde(default)]
    pub move_calories: f64,
    #[serde(default)]
    pub exercise_minutes: f64,
    #[serde(default)]
    pub stand_hours: f64,
    #[serde(default)]
    pub step_count: f64,
    #[serde(default)]
    pub distance_meters: f64,
    #[serde(default)]
    pub workouts_completed: f64,
}

/// Request payload for submitting a batch of daily metrics.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SyncRequest {
    #[validate(length(min = 1, max = 92, message = "days must contain 1 to 92 samples"))]
    pub days: Vec<DaySample>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyncResponse {
    /// Days that landed in the ledger (samples outside the competition's
    /// date span are dropped, not recorded).
    pub days_recorded: usize,
    pub days_skipped: usize,
    pub total_points: i32,
}

/// Strip any time-of-day component and parse the calendar date. Accepts both
/// `2025-01-07` and `2025-01-07T13:45:00Z` style values.
pub fn parse_day(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_date_only() {
        let day = parse_day("2025-01-07").expect("parses");
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 1, 7).expect("valid date"));
    }

    #[test]
    fn test_parse_day_strips_time_component() {
        // datetime precision must key to the same ledger day as the bare date
        let from_datetime = parse_day("2025-01-07T23:59:59Z").expect("parses");
        let from_date = parse_day("2025-01-07").expect("parses");
        assert_eq!(from_datetime, from_date);
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert!(parse_day("not-a-date").is_err());
        assert!(parse_day("2025/01/07").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn test_day_sample_deserializes_iso_timestamp() {
        let sample: DaySample = serde_json::from_str(
            r#"{"date":"2025-01-07T13:45:00Z","move_calories":512.3,"exercise_minutes":31,"stand_hours":12,"step_count":10432}"#,
        )
        .expect("deserializes");
        assert_eq!(
            sample.date,
            NaiveDate::from_ymd_opt(2025, 1, 7).expect("valid date")
        );
        assert_eq!(sample.distance_meters, 0.0);
    }
}
