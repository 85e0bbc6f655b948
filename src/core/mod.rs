//! Runtime pieces for fleet-sens: ingestion scheduling, dashboard polling and startup wiring

mod app;
mod dashboard;
mod ingest_manager;

pub use app::FleetApp;
pub use dashboard::{Dashboard, DashboardRow};
pub use ingest_manager::{IngestManager, TickReport};
