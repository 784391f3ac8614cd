pub mod bar;
pub mod equity_point;
pub mod indicator;
pub mod signal;
pub mod trade;
