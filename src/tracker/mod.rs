//! Issue tracker REST integration.

pub mod client;
pub mod types;
