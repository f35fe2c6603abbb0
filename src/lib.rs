pub mod aggregate;
pub mod batch;
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod game;
pub mod gap_fill;
pub mod metrics;
pub mod roster;
pub mod rows;
pub mod stats;
pub mod store;
pub mod tracker;
