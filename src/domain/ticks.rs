// Axis tick values and labels
use super::metrics::MetricKey;
use super::scale::{AxisDomain, AxisScale};
use serde::Serialize;

pub const AXIS_TICK_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
    pub position: f64,
}

/// `count` evenly spaced values from min to max inclusive. A degenerate
/// domain yields a single tick.
pub fn tick_values(domain: AxisDomain, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if domain.is_degenerate() || count == 1 {
        return vec![domain.min];
    }

    let step = domain.span() / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                domain.max
            } else {
                domain.min + step * i as f64
            }
        })
        .collect()
}

/// Label for a tick, rounded to the nearest integer with a unit suffix.
pub fn format_tick(key: MetricKey, value: f64) -> String {
    let rounded = value.round() as i64;
    match key {
        MetricKey::DurationSeconds => format!("{}s", rounded),
        MetricKey::HourOfDay => format!("{}h", rounded),
        MetricKey::DaysSinceOrigination => format!("{}d", rounded),
        MetricKey::ViewCount | MetricKey::LikeCount | MetricKey::CommentCount => {
            group_thousands(rounded)
        }
    }
}

/// Ticks for a rendered axis, positioned with the axis scale.
pub fn axis_ticks(key: MetricKey, scale: &AxisScale) -> Vec<Tick> {
    tick_values(scale.domain, AXIS_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            value,
            label: format_tick(key, value),
            position: scale.map(value),
        })
        .collect()
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
