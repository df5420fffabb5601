//! Configuration loading, validation, and env substitution.
//!
//! Config files: `foodlens.toml`, `foodlens.yaml`, or `foodlens.json`.
//! Searched in `./` then `~/.config/foodlens/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in all string
//! values, plus the deployment variables listed in [`env_overlay`].

pub mod env_overlay;
pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    env_overlay::apply_env_overrides,
    loader::{discover_and_load, load_config},
    schema::{BotConfig, FoodlensConfig, LineSection, ServerConfig, StorageConfig, VisionConfig},
    validate::{Diagnostic, Severity, validate},
};
