// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_repository;
pub mod http_response;
pub mod markup;
pub mod summary_panel;
pub mod svg_chart;
pub mod svg_map;
