//! Command line front end for tsguard.
//!
//! `tsguard check` validates a JSON value against a type from a type document;
//! `tsguard emit` prints the compiled validator as a JavaScript module.

pub mod args;
pub mod config;
pub mod driver;
pub mod tracing_config;
