//! HTTP backend for managing scheduled events.
//!
//! Requests flow handler → validation → [`services::EventService`] →
//! [`repository::EventRepository`]. Two stores are available: PostgreSQL and
//! an in-memory table for development and tests.

pub mod config;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

pub use state::AppState;
