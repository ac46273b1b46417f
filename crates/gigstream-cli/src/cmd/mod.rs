pub mod completions;
pub mod config;
pub mod jobs;
pub mod profile;
pub mod stats;
pub mod tx;
