//! fintrack - personal finance tracking from the terminal
//!
//! This library provides the core functionality for the fintrack
//! application: accounts, income and expense entries, transfers, budgets,
//! savings goals and reports, stored in a hosted PostgREST project.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings, paths and tracing setup
//! - `error`: Custom error types
//! - `models`: Typed records for every stored entity
//! - `backend`: The data service seam (HTTP client, in-memory store, session)
//! - `storage`: Backend access through a resource-keyed query cache
//! - `validation`: Declarative form validation
//! - `services`: Business logic layer
//! - `reports`: Pure aggregation over fetched records
//! - `display`: Terminal formatting
//! - `export`: Report output as CSV, JSON or YAML
//! - `cli`: clap command definitions and handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack::backend::demo::{demo_backend, demo_session};
//! use fintrack::services::DashboardService;
//! use fintrack::storage::Storage;
//!
//! let storage = Storage::new(demo_backend(today).await?, demo_session());
//! let dashboard = DashboardService::new(&storage).load(today).await;
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{FintrackError, FintrackResult};
