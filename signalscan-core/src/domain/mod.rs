//! Domain types for SignalScan

pub mod bar;
pub mod result;
pub mod stock;

pub use bar::DailyBar;
pub use result::{Direction, Horizon, StrategyResult};
pub use stock::Stock;
