// Domain layer - Metrics derivation and chart geometry
pub mod chart;
pub mod duration;
pub mod hover;
pub mod metrics;
pub mod scale;
pub mod summary;
pub mod ticks;
pub mod trend;
pub mod video;
