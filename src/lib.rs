pub mod config;
pub mod deploy;
pub mod error;
pub mod manifest;
pub mod reconciler;
pub mod runner;
pub mod template;
pub mod ui;
pub mod version;

pub use error::{DeployError, Result};
