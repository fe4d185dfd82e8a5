//! Command implementations

pub(crate) mod common;
pub mod migrate;
pub mod status;
pub mod transfer;
