use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_overlay::apply_env_overrides, env_subst::substitute_env, schema::FoodlensConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "foodlens.toml",
    "foodlens.yaml",
    "foodlens.yml",
    "foodlens.json",
];

/// Load config from the given path (any supported format), then apply the
/// environment overlay.
pub fn load_config(path: &Path) -> anyhow::Result<FoodlensConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let mut config = parse_config(&raw, path)?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./foodlens.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/foodlens/foodlens.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to defaults plus the environment overlay when no file is found
/// or the file cannot be parsed.
pub fn discover_and_load() -> FoodlensConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    let mut config = FoodlensConfig::default();
    apply_env_overrides(&mut config);
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/foodlens/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "foodlens").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<FoodlensConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
