//! HTTP API handlers for djset-ai

pub mod catalog;
pub mod generate;
pub mod health;
pub mod oauth;
pub mod ui;

pub use catalog::catalog_routes;
pub use generate::generate_routes;
pub use health::health_routes;
pub use oauth::oauth_routes;
pub use ui::ui_routes;
