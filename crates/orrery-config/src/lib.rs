//! Configuration system for the orrery.
//!
//! Provides runtime-configurable scene settings that persist to disk as RON
//! files. Supports CLI overrides via clap and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, CometConfig, Config, DebugConfig, LightingConfig, ResetTarget, StarfieldConfig,
    SunConfig, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
