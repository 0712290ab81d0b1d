//! NBA season stats dashboard: per-game and advanced tables for one season are
//! fetched, cleaned, merged by player and scored with a fixed-weight MVP proxy.

pub mod cache;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logging;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod scoring;
pub mod season;
pub mod source;
pub mod state;
pub mod stats_fetch;
pub mod table;
