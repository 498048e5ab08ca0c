// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::domain::chart::ChartLayout;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub default_layout: ChartLayout,
}
