//! Client library for the Driftmail transactional email API.
//!
//! All operations build a JSON payload locally and dispatch it as a
//! single HTTP request. Payloads only carry fields that were actually
//! set; the service is the sole validator of their contents.

pub mod api;
pub mod batch;
pub mod client;
pub mod config;
pub mod email;
pub mod error;
pub mod query;

pub use client::Client;
pub use config::Config;
pub use email::{Attachment, EmailOptions, SendEmail};
pub use error::Error;
