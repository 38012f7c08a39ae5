//! SportsDesk: multi-provider sports data for a betting assistant
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod leagues;
pub mod stats;
pub mod transport;
pub mod providers;
pub mod source;
pub mod cache;
pub mod client;
pub mod aggregator;
pub mod storage;
