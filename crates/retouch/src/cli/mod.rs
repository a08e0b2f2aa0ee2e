//! Command handlers for the retouch CLI.

pub mod config;
pub mod edit;
pub mod info;
pub mod spec;
