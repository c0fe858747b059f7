pub mod app;
pub mod catalog;
pub mod config;
pub mod embedded_web;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod routes;
pub mod vision;

pub use app::build_app;
