// lib.rs
pub mod config;
pub mod devices;
pub mod error;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod transport;
