#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod healthcheck;
pub mod parser;
pub mod port;
pub mod registration;
#[doc(hidden)]
pub mod test_support;

pub use healthcheck::healthcheck_with_port;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
