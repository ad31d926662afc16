//! Push event handler sub-modules.

pub mod mention;
pub mod message;
