//! adowork - create Azure DevOps work items from the command line
//!
//! adowork turns a handful of CLI flags into a JSON patch document and submits
//! it to the Azure DevOps work item tracking API. Failures are classified into
//! a small set of categories so the user gets actionable guidance instead of a
//! raw error.
//!
//! # Architecture
//!
//! - **commands**: the create command (validate, build, dry run or submit)
//! - **core**: patch building, the API gateway, error classification and presentation
//! - **models**: data structures (config, patch document, work items)
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{AppError, GatewayError, Result};
