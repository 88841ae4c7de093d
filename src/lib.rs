// src/lib.rs
pub mod api_client;
pub mod app;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod format;
pub mod types;
pub mod ui;
