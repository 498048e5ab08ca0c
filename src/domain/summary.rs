// Pass-through of the externally computed model summary (mlData)
//
// The summary is produced elsewhere and only displayed here. Every field is
// validated on the way in; anything absent or of the wrong type becomes an
// "unavailable" placeholder at display time.
use serde::Serialize;
use serde_json::{Map, Value};

pub const UNAVAILABLE: &str = "unavailable";
const MAX_COEFFICIENTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub metrics: Option<Vec<(String, Value)>>,
    pub intercept: Option<f64>,
    pub coefficients: Option<Vec<(String, f64)>>,
    pub n_train: Option<f64>,
    pub n_test: Option<f64>,
    pub trend: Option<SummaryTrend>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTrend {
    pub slope: Option<f64>,
    pub direction: Option<String>,
    pub target_column: Option<String>,
    pub time_column: Option<String>,
    pub pct_change_per_time_unit: Option<f64>,
    pub r2: Option<f64>,
    pub n: Option<f64>,
}

impl ModelSummary {
    /// Validate the opaque summary object. Anything that is not a JSON
    /// object is treated as missing.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        let map = value?.as_object()?;

        let metrics = map
            .get("metrics")
            .and_then(Value::as_object)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect());

        let coefficients = map.get("coefficients").and_then(Value::as_object).map(|m| {
            m.iter()
                .filter_map(|(k, v)| finite(Some(v)).map(|v| (k.clone(), v)))
                .collect()
        });

        let trend = map.get("trend").and_then(Value::as_object).map(|t| SummaryTrend {
            slope: finite(t.get("slope")),
            direction: string(t, "direction"),
            target_column: string(t, "targetColumn"),
            time_column: string(t, "timeColumn"),
            pct_change_per_time_unit: finite(t.get("pctChangePerTimeUnit")),
            r2: finite(t.get("r2")),
            n: finite(t.get("n")),
        });

        Some(Self {
            metrics,
            intercept: finite(map.get("intercept")),
            coefficients,
            n_train: finite(map.get("n_train")),
            n_test: finite(map.get("n_test")),
            trend,
        })
    }
}

fn finite(value: Option<&Value>) -> Option<f64> {
    value?.as_f64().filter(|v| v.is_finite())
}

fn string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)?.as_str().map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayLine {
    pub label: String,
    pub value: String,
}

impl DisplayLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    fn optional(label: &str, value: Option<String>) -> Self {
        Self::new(label, value.unwrap_or_else(|| UNAVAILABLE.to_string()))
    }
}

/// What a renderer shows for the summary panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SummaryDisplay {
    Unavailable {
        message: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Available {
        metrics: Vec<DisplayLine>,
        /// Top coefficients by absolute value; empty means "No coefficients"
        coefficients: Vec<DisplayLine>,
        trend: Vec<DisplayLine>,
    },
}

impl SummaryDisplay {
    pub fn from_summary(summary: Option<&ModelSummary>) -> Self {
        let Some(summary) = summary else {
            return SummaryDisplay::Unavailable {
                message: "ML data unavailable",
            };
        };

        let mut metrics: Vec<DisplayLine> = match &summary.metrics {
            Some(entries) => entries
                .iter()
                .map(|(name, value)| DisplayLine::new(name.as_str(), display_value(value)))
                .collect(),
            None => vec![DisplayLine::new("metrics", UNAVAILABLE)],
        };
        metrics.push(DisplayLine::optional("intercept", summary.intercept.map(fixed4)));
        metrics.push(DisplayLine::optional(
            "samples",
            samples_line(summary.n_train, summary.n_test),
        ));

        let mut coefficients: Vec<(String, f64)> =
            summary.coefficients.clone().unwrap_or_default();
        coefficients.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        let coefficients = coefficients
            .into_iter()
            .take(MAX_COEFFICIENTS)
            .map(|(name, value)| DisplayLine::new(name, fixed4(value)))
            .collect();

        let trend = match &summary.trend {
            Some(t) => vec![
                DisplayLine::optional("slope", t.slope.map(fixed4)),
                DisplayLine::optional("direction", t.direction.clone()),
                DisplayLine::optional("targetColumn", t.target_column.clone()),
                DisplayLine::optional("timeColumn", t.time_column.clone()),
                DisplayLine::optional(
                    "pctChangePerTimeUnit",
                    t.pct_change_per_time_unit.map(fixed4),
                ),
                DisplayLine::optional("r2", t.r2.map(fixed4)),
                DisplayLine::optional("n", t.n.map(count)),
            ],
            None => vec![DisplayLine::new("trend", UNAVAILABLE)],
        };

        SummaryDisplay::Available {
            metrics,
            coefficients,
            trend,
        }
    }
}

fn fixed4(value: f64) -> String {
    format!("{:.4}", value)
}

fn count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        fixed4(value)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map(fixed4).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn samples_line(n_train: Option<f64>, n_test: Option<f64>) -> Option<String> {
    if n_train.is_none() && n_test.is_none() {
        return None;
    }
    let part = |v: Option<f64>| v.map(count).unwrap_or_else(|| "-".to_string());
    Some(format!("train {}, test {}", part(n_train), part(n_test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line<'a>(lines: &'a [DisplayLine], label: &str) -> &'a str {
        lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_missing_or_malformed_is_unavailable() {
        assert_eq!(ModelSummary::from_value(None), None);
        assert_eq!(ModelSummary::from_value(Some(&json!("nope"))), None);
        assert_eq!(ModelSummary::from_value(Some(&json!([1, 2]))), None);
        assert_eq!(
            SummaryDisplay::from_summary(None),
            SummaryDisplay::Unavailable {
                message: "ML data unavailable"
            }
        );
    }

    #[test]
    fn test_full_summary_display() {
        let value = json!({
            "metrics": { "r2": 0.81234567, "mae": 12.5, "note": "holdout" },
            "intercept": 3.0,
            "coefficients": { "duration": -0.5, "likes": 2.25, "hour": 0.1, "bad": "x" },
            "n_train": 80,
            "n_test": 20,
            "trend": {
                "slope": 1.5, "direction": "up", "targetColumn": "viewCount",
                "timeColumn": "publishedAt", "pctChangePerTimeUnit": 0.02, "r2": 0.4, "n": 100
            }
        });
        let summary = ModelSummary::from_value(Some(&value)).unwrap();
        let SummaryDisplay::Available {
            metrics,
            coefficients,
            trend,
        } = SummaryDisplay::from_summary(Some(&summary))
        else {
            panic!("expected available summary");
        };

        assert_eq!(line(&metrics, "r2"), "0.8123");
        assert_eq!(line(&metrics, "note"), "holdout");
        assert_eq!(line(&metrics, "intercept"), "3.0000");
        assert_eq!(line(&metrics, "samples"), "train 80, test 20");

        let names: Vec<_> = coefficients.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(names, vec!["likes", "duration", "hour"]);
        assert_eq!(coefficients[1].value, "-0.5000");

        assert_eq!(line(&trend, "direction"), "up");
        assert_eq!(line(&trend, "n"), "100");
        assert_eq!(line(&trend, "pctChangePerTimeUnit"), "0.0200");
    }

    #[test]
    fn test_partial_summary_uses_placeholders() {
        let value = json!({ "n_test": 5, "intercept": "n/a", "trend": { "slope": "steep" } });
        let summary = ModelSummary::from_value(Some(&value)).unwrap();
        let SummaryDisplay::Available {
            metrics,
            coefficients,
            trend,
        } = SummaryDisplay::from_summary(Some(&summary))
        else {
            panic!("expected available summary");
        };

        assert_eq!(line(&metrics, "metrics"), UNAVAILABLE);
        assert_eq!(line(&metrics, "intercept"), UNAVAILABLE);
        assert_eq!(line(&metrics, "samples"), "train -, test 5");
        assert!(coefficients.is_empty());
        assert_eq!(line(&trend, "slope"), UNAVAILABLE);
        assert_eq!(line(&trend, "r2"), UNAVAILABLE);
    }

    #[test]
    fn test_coefficients_truncated_to_top_ten() {
        let coefficients: Map<String, Value> =
            (0..15).map(|i| (format!("f{}", i), json!(i as f64))).collect();
        let value = json!({ "coefficients": coefficients });
        let summary = ModelSummary::from_value(Some(&value)).unwrap();
        let SummaryDisplay::Available { coefficients, .. } =
            SummaryDisplay::from_summary(Some(&summary))
        else {
            panic!("expected available summary");
        };

        assert_eq!(coefficients.len(), 10);
        assert_eq!(coefficients[0].label, "f14");
        assert_eq!(coefficients[9].label, "f5");
    }
}
