// Chart geometry for one (x, y) axis selection
use super::hover::{HoverState, PointerEvent, Tooltip};
use super::metrics::{MetricKey, MetricsRecord};
use super::scale::AxisScale;
use super::ticks::{Tick, axis_ticks};
use super::trend::{TrendLine, TrendSegment};
use serde::{Deserialize, Serialize};

/// Pixel distance within which the pointer counts as over a point
const HIT_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            padding: 32.0,
        }
    }
}

impl ChartLayout {
    pub fn x_range(&self) -> (f64, f64) {
        (self.padding, self.width - self.padding)
    }

    /// Screen y grows downward, so the domain minimum sits at the bottom.
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.padding, self.padding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisView {
    pub key: MetricKey,
    pub label: &'static str,
    pub scale: AxisScale,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub cx: f64,
    pub cy: f64,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendView {
    #[serde(flatten)]
    pub line: TrendLine,
    pub segment: TrendSegment,
}

/// Domain values under a pointer position and the point it is over
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerReading {
    pub px: f64,
    pub py: f64,
    pub x: f64,
    pub y: f64,
    pub nearest: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGeometry {
    pub layout: ChartLayout,
    pub x_axis: AxisView,
    pub y_axis: AxisView,
    pub points: Vec<PlotPoint>,
    pub trend: Option<TrendView>,
}

impl ChartGeometry {
    pub fn build(
        records: &[MetricsRecord<'_>],
        x_key: MetricKey,
        y_key: MetricKey,
        layout: ChartLayout,
    ) -> Self {
        let (x_low, x_high) = layout.x_range();
        let (y_low, y_high) = layout.y_range();
        let x_scale = AxisScale::for_series(records, x_key, x_low, x_high);
        let y_scale = AxisScale::for_series(records, y_key, y_low, y_high);

        let points: Vec<PlotPoint> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let (x, y) = (record.value(x_key), record.value(y_key));
                let (cx, cy) = (x_scale.map(x), y_scale.map(y));
                PlotPoint {
                    index,
                    x,
                    y,
                    cx,
                    cy,
                    tooltip: Tooltip::resolve((cx, cy), record, x_key, y_key),
                }
            })
            .collect();

        let trend = TrendLine::fit_series(records, x_key, y_key).map(|line| TrendView {
            line,
            segment: line.segment(&x_scale, &y_scale),
        });

        tracing::debug!(
            "Built {} vs {} chart with {} points (trend: {})",
            y_key,
            x_key,
            points.len(),
            trend.is_some()
        );

        Self {
            layout,
            x_axis: axis_view(records, x_key, &x_scale),
            y_axis: axis_view(records, y_key, &y_scale),
            points,
            trend,
        }
    }

    pub fn hovered(&self, state: &HoverState) -> Option<&Tooltip> {
        let index = state.index()?;
        self.points.get(index).map(|p| &p.tooltip)
    }

    pub fn read_pointer(&self, px: f64, py: f64) -> PointerReading {
        let nearest = self
            .points
            .iter()
            .map(|p| (p.index, (p.cx - px).hypot(p.cy - py)))
            .filter(|(_, distance)| *distance <= HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index);

        PointerReading {
            px,
            py,
            x: self.x_axis.scale.invert(px),
            y: self.y_axis.scale.invert(py),
            nearest,
        }
    }

    /// Hover state after the pointer settles at `pointer` (if given) and
    /// then `events` are replayed in order
    pub fn hover_state(
        &self,
        pointer: Option<&PointerReading>,
        events: &[PointerEvent],
    ) -> HoverState {
        let start = match pointer.and_then(|p| p.nearest) {
            Some(index) => HoverState::Idle.apply(PointerEvent::Enter(index)),
            None => HoverState::Idle,
        };
        events.iter().copied().fold(start, HoverState::apply)
    }
}

fn axis_view(records: &[MetricsRecord<'_>], key: MetricKey, scale: &AxisScale) -> AxisView {
    let ticks = if records.is_empty() {
        Vec::new()
    } else {
        axis_ticks(key, scale)
    };
    AxisView {
        key,
        label: key.label(),
        scale: *scale,
        ticks,
    }
}
