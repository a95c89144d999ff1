//! Configuration module for fintrack
//!
//! This module provides configuration management including:
//! - Config directory resolution
//! - Settings persistence with environment overrides
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod settings;

pub use paths::FintrackPaths;
pub use settings::Settings;
