#![forbid(unsafe_code)]

pub mod explain;
pub mod model;
pub mod quiz;
pub mod spoken;
pub mod time;

pub use time::Clock;
