pub mod engine;
pub mod indicators;
pub mod metrics;
pub mod report;
pub mod strategy;
