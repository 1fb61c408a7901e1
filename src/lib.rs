// ABOUTME: Public library API for WizNote Markdown export
// ABOUTME: Re-exports core modules for external use

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod model;
pub mod storage;

pub use error::{Error, Result};
pub use model::{DocumentMetadata, ResultEnvelope, Session};
