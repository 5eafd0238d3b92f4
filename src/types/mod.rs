pub mod models;
pub mod serde_util;
pub mod wire;
