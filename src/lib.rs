//! AION Live - Real-time data plumbing for the AION operations dashboard
//!
//! This crate implements the reconnecting live channel and the bounded
//! streaming views that the dashboard uses to follow telemetry and ML
//! performance pushed by the backend services.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
