use serde::{Deserialize, Deserializer, de::Error};
use uuid::Uuid;

/// Watch report. Durations are seconds; omitted values fall back to a 0 second watch of
/// a 1 second video.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TrackViewBody {
    pub module_id: Option<Uuid>,
    #[serde(default, deserialize_with = "seconds")]
    pub watch_duration: i64,
    #[serde(default = "default_total_duration", deserialize_with = "seconds")]
    pub total_duration: i64,
}

fn default_total_duration() -> i64 {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Whole(i64),
    Fraction(f64),
    Text(String),
}

/// Accepts whole seconds as a number, a fractional number (truncated) or a numeric string.
fn seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Seconds::deserialize(deserializer)? {
        Seconds::Whole(v) => Ok(v),
        Seconds::Fraction(v) if v.is_finite() => Ok(v.trunc() as i64),
        Seconds::Fraction(_) => Err(D::Error::custom("duration must be a finite number")),
        Seconds::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("duration is not a whole number: {s}"))),
    }
}
