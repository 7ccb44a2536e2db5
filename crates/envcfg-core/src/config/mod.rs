//! Settings for the import tool
//!
//! Read from `envcfg.toml` in the project root:
//! - store: where imported values are persisted
//! - cache: what gets invalidated after an import
//! - encryption: key for `!encrypted` values
//! - scopes: known website and store codes
//! - auto_update: the recurring import run on deploy

pub mod parser;
pub mod schema;

pub use parser::{load_settings, parse_settings, parse_settings_str};
pub use schema::{
    AutoUpdateSettings, CacheSettings, EncryptionSettings, Settings, StoreSettings,
};

/// Settings file looked up in the project root.
pub const DEFAULT_SETTINGS_FILE: &str = "envcfg.toml";
