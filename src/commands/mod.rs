//! Command handlers for the reviewd CLI

pub mod serve;
pub mod sessions;
