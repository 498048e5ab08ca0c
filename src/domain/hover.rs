// Hover state and tooltip payloads for plotted points
use super::metrics::{MetricKey, MetricsRecord};
use super::ticks::format_tick;
use serde::{Deserialize, Serialize};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Which plotted point, if any, the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "camelCase")]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(usize),
}

/// Pointer transition over a plotted point, e.g. `{"type": "enter", "index": 2}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "camelCase")]
pub enum PointerEvent {
    Enter(usize),
    Leave(usize),
}

impl HoverState {
    pub fn apply(self, event: PointerEvent) -> Self {
        match (self, event) {
            (_, PointerEvent::Enter(index)) => HoverState::Hovering(index),
            (HoverState::Hovering(current), PointerEvent::Leave(index)) if current == index => {
                HoverState::Idle
            }
            (state, PointerEvent::Leave(_)) => state,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering(index) => Some(*index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisReading {
    pub key: MetricKey,
    pub label: &'static str,
    pub value: f64,
    pub formatted: String,
}

impl AxisReading {
    fn new(record: &MetricsRecord<'_>, key: MetricKey) -> Self {
        let value = record.value(key);
        Self {
            key,
            label: key.label(),
            value,
            formatted: format_tick(key, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub cx: f64,
    pub cy: f64,
    pub title: String,
    pub published: String,
    pub like_count: u64,
    pub comment_count: u64,
    pub x: AxisReading,
    pub y: AxisReading,
    pub url: Option<String>,
}

impl Tooltip {
    pub fn resolve(
        point: (f64, f64),
        record: &MetricsRecord<'_>,
        x_key: MetricKey,
        y_key: MetricKey,
    ) -> Self {
        Self {
            cx: point.0,
            cy: point.1,
            title: record.source.title().unwrap_or("Untitled").to_string(),
            published: record.published_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            like_count: record.like_count,
            comment_count: record.comment_count,
            x: AxisReading::new(record, x_key),
            y: AxisReading::new(record, y_key),
            url: record
                .source
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(|id| format!("{}{}", WATCH_URL, urlencoding::encode(id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::derive_metrics;
    use crate::domain::video::parse_video_list;
    use serde_json::json;

    #[test]
    fn test_hover_transitions() {
        let state = HoverState::Idle;
        let state = state.apply(PointerEvent::Enter(3));
        assert_eq!(state, HoverState::Hovering(3));

        // leaving some other point keeps the current hover
        assert_eq!(state.apply(PointerEvent::Leave(1)), HoverState::Hovering(3));

        let state = state.apply(PointerEvent::Enter(4));
        assert_eq!(state, HoverState::Hovering(4));
        assert_eq!(state.apply(PointerEvent::Leave(4)), HoverState::Idle);
        assert_eq!(HoverState::Idle.apply(PointerEvent::Leave(0)), HoverState::Idle);
    }

    #[test]
    fn test_pointer_events_from_json() {
        let events: Vec<PointerEvent> = serde_json::from_value(json!([
            { "type": "enter", "index": 2 },
            { "type": "leave", "index": 2 }
        ]))
        .unwrap();
        assert_eq!(events, vec![PointerEvent::Enter(2), PointerEvent::Leave(2)]);

        let state = events.into_iter().fold(HoverState::Idle, HoverState::apply);
        assert_eq!(state, HoverState::Idle);
        assert!(serde_json::from_value::<PointerEvent>(json!({ "type": "click", "index": 0 })).is_err());
    }

    #[test]
    fn test_tooltip_payload() {
        let raw = parse_video_list(json!([{
            "id": "dQw4w9WgXcQ",
            "snippet": { "title": "Clip", "publishedAt": "2024-02-10T08:05:00Z" },
            "statistics": { "viewCount": "12000", "likeCount": "300", "commentCount": "12" },
            "contentDetails": { "duration": "PT3M33S" }
        }]));
        let records = derive_metrics(&raw);

        let tooltip = Tooltip::resolve(
            (100.0, 50.0),
            &records[0],
            MetricKey::DurationSeconds,
            MetricKey::ViewCount,
        );

        assert_eq!(tooltip.title, "Clip");
        assert_eq!(tooltip.published, "2024-02-10 08:05 UTC");
        assert_eq!(tooltip.like_count, 300);
        assert_eq!(tooltip.comment_count, 12);
        assert_eq!(tooltip.x.formatted, "213s");
        assert_eq!(tooltip.y.formatted, "12,000");
        assert_eq!(
            tooltip.url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
        assert_eq!((tooltip.cx, tooltip.cy), (100.0, 50.0));
    }

    #[test]
    fn test_tooltip_without_id_or_title() {
        let raw = parse_video_list(json!([{ "snippet": { "publishedAt": "2024-02-10T08:05:00Z" } }]));
        let records = derive_metrics(&raw);
        let tooltip = Tooltip::resolve((0.0, 0.0), &records[0], MetricKey::HourOfDay, MetricKey::LikeCount);

        assert_eq!(tooltip.title, "Untitled");
        assert_eq!(tooltip.url, None);
        assert_eq!(tooltip.x.formatted, "8h");
    }
}
