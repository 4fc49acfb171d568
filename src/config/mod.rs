#[cfg(feature = "cli")]
pub mod args;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::{CliConfig, DEFAULT_ZIP_NAME};
pub use storage::LocalStorage;
pub use toml_config::TomlConfig;
