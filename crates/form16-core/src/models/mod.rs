//! Data models shared across the extraction and computation layers.

pub mod config;
pub mod record;
