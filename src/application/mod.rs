// Application layer - Use cases
pub mod chart_service;
pub mod video_source;
