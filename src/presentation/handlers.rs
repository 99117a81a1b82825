// HTTP request handlers
use crate::domain::ridership::{Choice, FilterSelection};
use crate::infrastructure::http_response::{accepts_brotli, html_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_page;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

/// Current values of both selector controls; an absent value means "All".
/// `prev_day`/`prev_route` name the selection the client page was showing.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub day: Option<String>,
    pub route: Option<String>,
    pub prev_day: Option<String>,
    pub prev_route: Option<String>,
}

impl SelectionQuery {
    /// `None` when the client sent no previous selection at all
    pub fn previous(&self) -> Option<FilterSelection> {
        if self.prev_day.is_none() && self.prev_route.is_none() {
            return None;
        }
        Some(FilterSelection::new(
            Choice::from(self.prev_day.clone()),
            Choice::from(self.prev_route.clone()),
        ))
    }
}

impl From<SelectionQuery> for FilterSelection {
    fn from(query: SelectionQuery) -> Self {
        FilterSelection::new(Choice::from(query.day), Choice::from(query.route))
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Selector option lists
pub async fn filter_options(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let options = state.dashboard_service.filter_options();
    match json_response(&options, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Render a selection and describe the resulting views as JSON
pub async fn dashboard_frame(
    Query(query): Query<SelectionQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let previous = query.previous();
    let rendered = state.dashboard_service.render(query.into(), previous.as_ref());
    match json_response(&rendered, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Render a selection as the HTML dashboard
pub async fn dashboard_page(
    Query(query): Query<SelectionQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let service = &state.dashboard_service;
    let previous = query.previous();
    let rendered = service.render(query.into(), previous.as_ref());
    let page = render_page(&service.filter_options(), &rendered);
    match html_response(page, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
