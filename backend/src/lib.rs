//! Booking core of the property management system: availability search,
//! layered nightly pricing, inventory-safe reservation admission and
//! policy-driven cancellation, served over a JSON API.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod services;
pub mod utils;

pub use app::{configure_app, AppState};
pub use error::AppError;
