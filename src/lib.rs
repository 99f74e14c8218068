//! Backend for the Mindflow personality assessment
//!
//! Relays personality-analysis prompts and portrait descriptions to OpenAI
//! and returns the results in a small JSON envelope, with CORS headers for
//! the browser frontend.

pub mod ai;
pub mod api;
pub mod app;
pub mod error;
pub mod gate;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
