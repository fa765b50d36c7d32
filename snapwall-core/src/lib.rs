pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{DenialReason, Error, Result};
pub use storage::ObjectStore;
