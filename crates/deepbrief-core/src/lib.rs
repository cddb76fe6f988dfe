//! Deepbrief Core - Types, errors, and configuration

pub mod config;
pub mod error;
pub mod stage;
pub mod types;

pub use config::DeepbriefConfig;
pub use error::{Error, Result};
pub use stage::StageId;
pub use types::*;
