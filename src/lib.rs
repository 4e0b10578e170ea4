//! FitTrack Library
//!
//! Fitness and nutrition tracking: body metrics, meal totals, workout
//! progress and body measurements, served over HTTP or MCP.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod mcp;
pub mod metrics;
pub mod models;
pub mod tools;

#[cfg(test)]
mod test_support;
