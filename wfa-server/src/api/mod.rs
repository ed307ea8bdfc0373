//! HTTP API handlers for wfa-server

pub mod analysis;
pub mod health;
pub mod upload;

pub use analysis::get_analysis;
pub use health::health_routes;
pub use upload::upload_document;
