// Raw video metadata as returned by the video API
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One video as supplied by the data-fetch collaborator.
///
/// Every nested path is optional. A value of the wrong JSON type is read as
/// absent so a single odd entry never rejects the whole list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub snippet: Option<Snippet>,
    #[serde(default, deserialize_with = "lenient")]
    pub statistics: Option<Statistics>,
    #[serde(default, deserialize_with = "lenient")]
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<String>,
}

/// Counts arrive as numeric strings from the API, but plain numbers are
/// accepted too, so they are kept as raw JSON until coerced.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub view_count: Option<Value>,
    #[serde(default)]
    pub like_count: Option<Value>,
    #[serde(default)]
    pub comment_count: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: Option<Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl RawVideoRecord {
    pub fn title(&self) -> Option<&str> {
        self.snippet.as_ref()?.title.as_deref()
    }

    pub fn published_at(&self) -> Option<&str> {
        self.snippet.as_ref()?.published_at.as_deref()
    }

    pub fn view_count(&self) -> u64 {
        coerce_count(self.statistics.as_ref().and_then(|s| s.view_count.as_ref()))
    }

    pub fn like_count(&self) -> u64 {
        coerce_count(self.statistics.as_ref().and_then(|s| s.like_count.as_ref()))
    }

    pub fn comment_count(&self) -> u64 {
        coerce_count(self.statistics.as_ref().and_then(|s| s.comment_count.as_ref()))
    }

    pub fn duration(&self) -> Option<&str> {
        self.content_details.as_ref()?.duration.as_ref()?.as_str()
    }

    /// Publish instant, or None when absent or unparseable.
    pub fn publish_instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(self.published_at()?)
    }
}

/// Read a JSON list of videos. Accepts either a bare array or an API page
/// object carrying an `items` array; anything else is an empty list.
pub fn parse_video_list(value: Value) -> Vec<RawVideoRecord> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect()
}

/// Coerce a count to a non-negative integer, defaulting to 0.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

/// Parse a publish timestamp. RFC 3339 is the normal form; bare dates and
/// offset-less date-times are read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
