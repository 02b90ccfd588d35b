//! Shared types for the Lotus booking core
//!
//! Domain models, error codes and push-channel message types shared
//! between the client core and any console binary built on top of it.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message re-exports (for convenient access)
pub use message::{Envelope, PushEventKind};

// Error re-exports
pub use error::{AppError, AppResult, ErrorCode};
