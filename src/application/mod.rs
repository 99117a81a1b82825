// Application layer - use cases and the seams they are built against
pub mod dashboard_service;
pub mod render_coordinator;
pub mod ridership_repository;
pub mod views;
