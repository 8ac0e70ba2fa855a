//! Utility modules

pub mod data_url;
pub mod json_block;
