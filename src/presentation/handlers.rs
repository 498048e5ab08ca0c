// HTTP request handlers
use crate::application::chart_service::{ChannelChart, ChartRequest};
use crate::domain::chart::ChartLayout;
use crate::domain::hover::PointerEvent;
use crate::domain::metrics::{MetricKey, UnknownMetricKey};
use crate::domain::video::parse_video_list;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_X: MetricKey = MetricKey::DaysSinceOrigination;
const DEFAULT_Y: MetricKey = MetricKey::ViewCount;

/// Axis selection, optional plot size and pointer position, shared by query
/// strings and bodies
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub x: Option<String>,
    pub y: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Option<f64>,
    #[serde(rename = "pointerX")]
    pub pointer_x: Option<f64>,
    #[serde(rename = "pointerY")]
    pub pointer_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub items: Value,
    #[serde(default, rename = "mlData")]
    pub ml_data: Option<Value>,
    #[serde(default)]
    pub events: Vec<PointerEvent>,
    #[serde(flatten)]
    pub query: ChartQuery,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownAxis(#[from] UnknownMetricKey),
    #[error("invalid chart layout: {0}")]
    InvalidLayout(String),
    #[error("invalid pointer: {0}")]
    InvalidPointer(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected chart request: {}", self);
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl ChartQuery {
    fn resolve(&self, defaults: ChartLayout) -> Result<ChartRequest, ApiError> {
        let x = match &self.x {
            Some(key) => key.parse()?,
            None => DEFAULT_X,
        };
        let y = match &self.y {
            Some(key) => key.parse()?,
            None => DEFAULT_Y,
        };

        let layout = ChartLayout {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            padding: self.padding.unwrap_or(defaults.padding),
        };
        validate_layout(&layout)?;

        let mut request = ChartRequest::new(x, y, layout);
        request.pointer = self.pointer()?;
        Ok(request)
    }

    fn pointer(&self) -> Result<Option<(f64, f64)>, ApiError> {
        match (self.pointer_x, self.pointer_y) {
            (None, None) => Ok(None),
            (Some(px), Some(py)) if px.is_finite() && py.is_finite() => Ok(Some((px, py))),
            (Some(_), Some(_)) => Err(ApiError::InvalidPointer("coordinates must be finite")),
            _ => Err(ApiError::InvalidPointer("pointerX and pointerY go together")),
        }
    }
}

fn validate_layout(layout: &ChartLayout) -> Result<(), ApiError> {
    let ChartLayout {
        width,
        height,
        padding,
    } = *layout;

    if ![width, height, padding].iter().all(|v| v.is_finite()) {
        return Err(ApiError::InvalidLayout("dimensions must be finite".to_string()));
    }
    if padding < 0.0 || width <= 2.0 * padding || height <= 2.0 * padding {
        return Err(ApiError::InvalidLayout(format!(
            "{}x{} leaves no plot area with padding {}",
            width, height, padding
        )));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    message: &'static str,
    has_key: bool,
}

#[derive(Serialize)]
struct AxisOption {
    key: MetricKey,
    label: &'static str,
}

async fn chart_response(chart: &ChannelChart, headers: &HeaderMap) -> Response {
    match json_response(chart, StatusCode::OK, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Service status, including whether the video API key is configured
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusBody {
        message: "channel-metrics is running",
        has_key: state.chart_service.has_credentials(),
    })
}

/// Selectable axis keys
pub async fn list_axes() -> impl IntoResponse {
    let axes: Vec<AxisOption> = MetricKey::ALL
        .into_iter()
        .map(|key| AxisOption {
            key,
            label: key.label(),
        })
        .collect();
    Json(axes)
}

/// Chart a channel's uploads
pub async fn channel_chart(
    Path(channel): Path<String>,
    Query(query): Query<ChartQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let request = query.resolve(state.default_layout)?;
    let chart = state.chart_service.channel_chart(&channel, request).await;
    Ok(chart_response(&chart, &headers).await)
}

/// Chart a posted video list and optional model summary
pub async fn chart_from_items(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChartBody>,
) -> Result<Response, ApiError> {
    let mut request = body.query.resolve(state.default_layout)?;
    request.events = body.events;
    let videos = parse_video_list(body.items);
    let chart = state
        .chart_service
        .chart_from_items(&videos, body.ml_data.as_ref(), request);
    Ok(chart_response(&chart, &headers).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::ChartService;
    use crate::application::chart_service::tests::{StaticSource, sample_videos};

    fn state(videos: Option<Vec<crate::domain::video::RawVideoRecord>>) -> Arc<AppState> {
        Arc::new(AppState {
            chart_service: ChartService::new(Arc::new(StaticSource { videos })),
            default_layout: ChartLayout::default(),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_query_defaults() {
        let request = ChartQuery::default().resolve(ChartLayout::default()).unwrap();
        assert_eq!(request.x, MetricKey::DaysSinceOrigination);
        assert_eq!(request.y, MetricKey::ViewCount);
        assert_eq!(request.layout, ChartLayout::default());
    }

    #[test]
    fn test_query_rejects_unknown_axis() {
        let query = ChartQuery {
            y: Some("subscribers".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(ChartLayout::default()),
            Err(ApiError::UnknownAxis(_))
        ));
    }

    #[test]
    fn test_query_rejects_bad_layout() {
        let query = ChartQuery {
            width: Some(50.0),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(ChartLayout::default()),
            Err(ApiError::InvalidLayout(_))
        ));

        let query = ChartQuery {
            height: Some(f64::NAN),
            ..Default::default()
        };
        assert!(query.resolve(ChartLayout::default()).is_err());
    }

    #[tokio::test]
    async fn test_channel_chart_handler() {
        let query = ChartQuery {
            x: Some("hourOfDay".to_string()),
            y: Some("likeCount".to_string()),
            ..Default::default()
        };
        let response = channel_chart(
            Path("@someone".to_string()),
            Query(query),
            HeaderMap::new(),
            State(state(Some(sample_videos()))),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["channel"], "@someone");
        assert_eq!(body["plottedCount"], 2);
        assert_eq!(body["chart"]["xAxis"]["key"], "hourOfDay");
        assert_eq!(body["summary"]["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_chart_from_items_handler() {
        let body: ChartBody = serde_json::from_value(json!({
            "items": [
                { "id": "a", "snippet": { "publishedAt": "2024-01-01T00:00:00Z" }, "statistics": { "viewCount": "10" } },
                { "id": "b", "snippet": { "publishedAt": "2024-01-02T00:00:00Z" }, "statistics": { "viewCount": "30" } }
            ],
            "mlData": { "metrics": { "r2": 0.5 } },
            "x": "daysSinceOrigination",
            "y": "viewCount"
        }))
        .unwrap();

        let response = chart_from_items(HeaderMap::new(), State(state(None)), Json(body))
            .await
            .unwrap();
        let body = body_json(response).await;

        assert_eq!(body["videoCount"], 2);
        assert_eq!(body["chart"]["trend"]["slope"], 20.0);
        assert_eq!(body["chart"]["trend"]["n"], 2);
        assert_eq!(body["summary"]["status"], "available");
    }

    #[test]
    fn test_query_pointer_needs_both_coordinates() {
        let query = ChartQuery {
            pointer_x: Some(40.0),
            ..Default::default()
        };
        assert!(matches!(
            query.resolve(ChartLayout::default()),
            Err(ApiError::InvalidPointer(_))
        ));

        let query = ChartQuery {
            pointer_x: Some(40.0),
            pointer_y: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(query.resolve(ChartLayout::default()).is_err());

        let query = ChartQuery {
            pointer_x: Some(40.0),
            pointer_y: Some(50.0),
            ..Default::default()
        };
        let request = query.resolve(ChartLayout::default()).unwrap();
        assert_eq!(request.pointer, Some((40.0, 50.0)));
    }

    #[tokio::test]
    async fn test_channel_chart_pointer_hover() {
        // "B" is the last point, at the top right corner of the plot
        let query = ChartQuery {
            pointer_x: Some(606.0),
            pointer_y: Some(33.0),
            ..Default::default()
        };
        let response = channel_chart(
            Path("@someone".to_string()),
            Query(query),
            HeaderMap::new(),
            State(state(Some(sample_videos()))),
        )
        .await
        .unwrap();
        let body = body_json(response).await;

        assert_eq!(body["pointer"]["nearest"], 1);
        assert_eq!(body["hover"], json!({ "state": "hovering", "index": 1 }));
        assert_eq!(body["hovered"]["title"], "B");
        assert_eq!(body["chart"]["xAxis"]["scale"]["domain"]["max"], 2.0);
    }

    #[tokio::test]
    async fn test_chart_from_items_replays_events() {
        let body: ChartBody = serde_json::from_value(json!({
            "items": [
                { "id": "a", "snippet": { "title": "First", "publishedAt": "2024-01-01T00:00:00Z" } },
                { "id": "b", "snippet": { "title": "Second", "publishedAt": "2024-01-02T00:00:00Z" } }
            ],
            "events": [
                { "type": "enter", "index": 0 },
                { "type": "enter", "index": 1 },
                { "type": "leave", "index": 0 }
            ]
        }))
        .unwrap();

        let response = chart_from_items(HeaderMap::new(), State(state(None)), Json(body))
            .await
            .unwrap();
        let body = body_json(response).await;

        assert!(body["pointer"].is_null());
        assert_eq!(body["hover"]["index"], 1);
        assert_eq!(body["hovered"]["title"], "Second");
        assert_eq!(body["hovered"]["url"], "https://www.youtube.com/watch?v=b");
    }

    #[tokio::test]
    async fn test_unknown_axis_is_bad_request() {
        let query = ChartQuery {
            x: Some("bogus".to_string()),
            ..Default::default()
        };
        let Err(err) = channel_chart(
            Path("UC1".to_string()),
            Query(query),
            HeaderMap::new(),
            State(state(Some(Vec::new()))),
        )
        .await
        else {
            panic!("expected an unknown axis error");
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unknown metric key: bogus");
    }

    #[tokio::test]
    async fn test_status_reports_key() {
        let response = status(State(state(None))).await.into_response();
        let body = body_json(response).await;
        assert_eq!(body["hasKey"], false);
    }
}
