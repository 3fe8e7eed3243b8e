#![forbid(unsafe_code)]

//! Core domain model and logic for the TDEE calculator.
//!
//! This crate provides:
//! - Domain types (form state, validated input, history entries)
//! - Form validation with per-field messages
//! - The Mifflin-St Jeor computation engine
//! - Bounded history retention over a key-value store
//! - Application state for front ends

pub mod types;
pub mod error;
pub mod validate;
pub mod engine;
pub mod store;
pub mod history;
pub mod app;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use validate::{validate, Field, FieldErrors};
pub use engine::{basal_metabolic_rate, calculate};
pub use store::{FileStore, HistoryStore, MemoryStore};
pub use history::{append_history, load_history, HISTORY_CAPACITY, HISTORY_KEY};
pub use app::App;
pub use config::Config;
