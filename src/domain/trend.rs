// Least-squares trend over the plotted axis pair
use super::metrics::{MetricKey, MetricsRecord};
use super::scale::AxisScale;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
}

/// Trend line endpoints in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl TrendLine {
    /// Ordinary least squares over the finite pairs. None when fewer than
    /// two pairs remain or every x is the same.
    pub fn fit(pairs: &[(f64, f64)]) -> Option<Self> {
        let finite: Vec<(f64, f64)> = pairs
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        let first_x = finite.first()?.0;
        if finite.len() < 2 || finite.iter().all(|(x, _)| *x == first_x) {
            return None;
        }

        let n = finite.len() as f64;
        let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
        for (x, y) in &finite {
            sx += x;
            sy += y;
            sxy += x * y;
            sxx += x * x;
        }

        let denom = n * sxx - sx * sx;
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }

        let slope = (n * sxy - sx * sy) / denom;
        let intercept = (sy - slope * sx) / n;
        if !slope.is_finite() || !intercept.is_finite() {
            return None;
        }

        Some(Self {
            slope,
            intercept,
            n: finite.len(),
        })
    }

    pub fn fit_series(records: &[MetricsRecord<'_>], x: MetricKey, y: MetricKey) -> Option<Self> {
        let pairs: Vec<(f64, f64)> = records.iter().map(|r| (r.value(x), r.value(y))).collect();
        Self::fit(&pairs)
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Evaluate at the x-domain extremes and project with the same scales
    /// used for the plotted points.
    pub fn segment(&self, x_scale: &AxisScale, y_scale: &AxisScale) -> TrendSegment {
        let (min_x, max_x) = (x_scale.domain.min, x_scale.domain.max);
        TrendSegment {
            x1: x_scale.map(min_x),
            y1: y_scale.map(self.at(min_x)),
            x2: x_scale.map(max_x),
            y2: y_scale.map(self.at(max_x)),
        }
    }
}
