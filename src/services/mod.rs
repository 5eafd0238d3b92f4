pub mod aggregator;
pub mod client;
pub mod depth;
pub mod error;
pub mod format;
pub mod progress;
pub mod refresh;
pub mod sort;
