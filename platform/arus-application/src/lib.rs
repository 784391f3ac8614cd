pub mod backtesting;
pub mod config;
pub mod meta;
