//! Types and settings shared by the loading and planning modules

pub mod bbox;
pub mod config;
pub mod error;
pub mod station_data;
