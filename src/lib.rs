pub mod config;
pub mod csv_source;
pub mod export;
pub mod league;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod store;
