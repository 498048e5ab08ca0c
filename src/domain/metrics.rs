// Per-video numeric metrics derived from raw video records
use super::duration::parse_duration_seconds;
use super::video::RawVideoRecord;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;

/// A numeric field selectable as a chart axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    ViewCount,
    LikeCount,
    CommentCount,
    DurationSeconds,
    HourOfDay,
    DaysSinceOrigination,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric key: {0}")]
pub struct UnknownMetricKey(pub String);

impl MetricKey {
    pub const ALL: [MetricKey; 6] = [
        MetricKey::ViewCount,
        MetricKey::LikeCount,
        MetricKey::CommentCount,
        MetricKey::DurationSeconds,
        MetricKey::HourOfDay,
        MetricKey::DaysSinceOrigination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::ViewCount => "viewCount",
            MetricKey::LikeCount => "likeCount",
            MetricKey::CommentCount => "commentCount",
            MetricKey::DurationSeconds => "durationSeconds",
            MetricKey::HourOfDay => "hourOfDay",
            MetricKey::DaysSinceOrigination => "daysSinceOrigination",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::ViewCount => "Views",
            MetricKey::LikeCount => "Likes",
            MetricKey::CommentCount => "Comments",
            MetricKey::DurationSeconds => "Duration (s)",
            MetricKey::HourOfDay => "Hour of day (UTC)",
            MetricKey::DaysSinceOrigination => "Days since first upload",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = UnknownMetricKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownMetricKey(s.to_string()))
    }
}

/// Flat metrics for one video, linked back to the record it came from
#[derive(Debug, Clone)]
pub struct MetricsRecord<'a> {
    pub source: &'a RawVideoRecord,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
    pub hour_of_day: u32,
    pub days_since_origination: u64,
}

impl MetricsRecord<'_> {
    pub fn value(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::ViewCount => self.view_count as f64,
            MetricKey::LikeCount => self.like_count as f64,
            MetricKey::CommentCount => self.comment_count as f64,
            MetricKey::DurationSeconds => self.duration_seconds as f64,
            MetricKey::HourOfDay => self.hour_of_day as f64,
            MetricKey::DaysSinceOrigination => self.days_since_origination as f64,
        }
    }
}

/// Turn raw records into the chronologically ordered metrics series.
///
/// Records without a parseable publish timestamp are dropped. Day offsets
/// are relative to the earliest record of this input set.
pub fn derive_metrics(raw: &[RawVideoRecord]) -> Vec<MetricsRecord<'_>> {
    let mut records: Vec<MetricsRecord<'_>> = raw
        .iter()
        .filter_map(|source| {
            let published_at = source.publish_instant()?;
            Some(MetricsRecord {
                source,
                published_at,
                view_count: source.view_count(),
                like_count: source.like_count(),
                comment_count: source.comment_count(),
                duration_seconds: source.duration().map(parse_duration_seconds).unwrap_or(0),
                hour_of_day: published_at.hour(),
                days_since_origination: 0,
            })
        })
        .collect();

    let dropped = raw.len() - records.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} of {} videos without a publish time", dropped, raw.len());
    }

    // sort_by_key is stable, so equal instants keep input order
    records.sort_by_key(|r| r.published_at);

    if let Some(earliest) = records.first().map(|r| r.published_at) {
        for record in &mut records {
            let elapsed = (record.published_at - earliest).num_seconds();
            record.days_since_origination = (elapsed / SECONDS_PER_DAY).max(0) as u64;
        }
    }

    records
}
