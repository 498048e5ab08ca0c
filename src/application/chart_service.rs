// Chart service - Use case for charting a channel's video metrics
use crate::application::video_source::VideoSource;
use crate::domain::chart::{ChartGeometry, ChartLayout, PointerReading};
use crate::domain::hover::{HoverState, PointerEvent, Tooltip};
use crate::domain::metrics::{MetricKey, derive_metrics};
use crate::domain::summary::{ModelSummary, SummaryDisplay};
use crate::domain::video::RawVideoRecord;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Axis selection, plot size and pointer interaction for one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub x: MetricKey,
    pub y: MetricKey,
    pub layout: ChartLayout,
    /// Pointer position in plot pixels
    pub pointer: Option<(f64, f64)>,
    pub events: Vec<PointerEvent>,
}

impl ChartRequest {
    pub fn new(x: MetricKey, y: MetricKey, layout: ChartLayout) -> Self {
        Self {
            x,
            y,
            layout,
            pointer: None,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelChart {
    pub channel: Option<String>,
    pub video_count: usize,
    pub plotted_count: usize,
    pub chart: ChartGeometry,
    pub pointer: Option<PointerReading>,
    pub hover: HoverState,
    pub hovered: Option<Tooltip>,
    pub summary: SummaryDisplay,
}

#[derive(Clone)]
pub struct ChartService {
    source: Arc<dyn VideoSource>,
}

impl ChartService {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self { source }
    }

    pub fn has_credentials(&self) -> bool {
        self.source.is_configured()
    }

    /// Fetch a channel's videos and chart them. Fetch failures degrade to an
    /// empty series.
    pub async fn channel_chart(&self, channel: &str, request: ChartRequest) -> ChannelChart {
        let videos = match self.source.fetch_channel_videos(channel).await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::error!("Error fetching videos for {}: {:#}", channel, e);
                Vec::new()
            }
        };

        tracing::debug!("Fetched {} videos for {}", videos.len(), channel);
        Self::build(Some(channel.to_string()), &videos, None, request)
    }

    /// Chart a caller-supplied video list and optional model summary
    pub fn chart_from_items(
        &self,
        videos: &[RawVideoRecord],
        ml_data: Option<&Value>,
        request: ChartRequest,
    ) -> ChannelChart {
        Self::build(None, videos, ml_data, request)
    }

    fn build(
        channel: Option<String>,
        videos: &[RawVideoRecord],
        ml_data: Option<&Value>,
        request: ChartRequest,
    ) -> ChannelChart {
        let records = derive_metrics(videos);
        let chart = ChartGeometry::build(&records, request.x, request.y, request.layout);

        let pointer = request.pointer.map(|(px, py)| chart.read_pointer(px, py));
        let hover = chart.hover_state(pointer.as_ref(), &request.events);
        let hovered = chart.hovered(&hover).cloned();

        let summary = ModelSummary::from_value(ml_data);
        if ml_data.is_some() && summary.is_none() {
            tracing::warn!("Ignoring malformed model summary");
        }

        ChannelChart {
            channel,
            video_count: videos.len(),
            plotted_count: records.len(),
            chart,
            pointer,
            hover,
            hovered,
            summary: SummaryDisplay::from_summary(summary.as_ref()),
        }
    }
}
