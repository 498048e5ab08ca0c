// Axis domains and linear value <-> pixel mapping
use super::metrics::{MetricKey, MetricsRecord};
use serde::Serialize;

/// Min/max of one metric across the current series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scan the selected field. Non-finite values count as 0; an empty
    /// series gives the degenerate domain (0, 0).
    pub fn of(records: &[MetricsRecord<'_>], key: MetricKey) -> Self {
        let mut values = records.iter().map(|r| finite_or_zero(r.value(key)));
        let Some(first) = values.next() else {
            return Self::new(0.0, 0.0);
        };
        values.fold(Self::new(first, first), |domain, v| {
            Self::new(domain.min.min(v), domain.max.max(v))
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Linear mapping from a domain onto a pixel range `[low, high]`.
///
/// `high` may be smaller than `low` (screen y axes grow downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisScale {
    pub domain: AxisDomain,
    pub low: f64,
    pub high: f64,
}

impl AxisScale {
    pub fn new(domain: AxisDomain, low: f64, high: f64) -> Self {
        Self { domain, low, high }
    }

    pub fn for_series(records: &[MetricsRecord<'_>], key: MetricKey, low: f64, high: f64) -> Self {
        Self::new(AxisDomain::of(records, key), low, high)
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Degenerate domains map every value to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        if self.domain.is_degenerate() {
            return self.midpoint();
        }
        let t = (finite_or_zero(value) - self.domain.min) / self.domain.span();
        self.low + t * (self.high - self.low)
    }

    /// Pixel back to a domain value. Degenerate domains and zero-width
    /// ranges invert to `min`.
    pub fn invert(&self, pixel: f64) -> f64 {
        let width = self.high - self.low;
        if self.domain.is_degenerate() || width == 0.0 {
            return self.domain.min;
        }
        self.domain.min + (pixel - self.low) / width * self.domain.span()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
