pub mod alerts;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod predict;
pub mod realtime;
pub mod state;
pub mod store;
