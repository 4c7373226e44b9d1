use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::admin::client::{ADMIN_TIMEOUT, AdminOptions, DEFAULT_ADMIN_ADDR};
use crate::admin::types::Capabilities;
use crate::cli::{AppContext, InitArgs};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Admin server connection settings
    pub admin: AdminConfig,

    /// External editor settings
    pub editor: EditorConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Admin server address (host:port)
    pub addr: String,

    /// Remote call timeout in seconds
    pub timeout_secs: u64,

    /// Read the config from the coordination store directly instead of
    /// through another node
    pub read_from_store: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADMIN_ADDR.to_owned(),
            timeout_secs: ADMIN_TIMEOUT.as_secs(),
            read_from_store: true,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor program; falls back to $EDITOR, then nano
    pub program: Option<String>,
}

impl Config {
    /// Connection settings for the admin client, with an optional
    /// command-line address override.
    pub fn admin_options(&self, addr_override: Option<&str>) -> AdminOptions {
        AdminOptions {
            addr: addr_override.unwrap_or(&self.admin.addr).to_owned(),
            timeout: Duration::from_secs(self.admin.timeout_secs),
            capabilities: Capabilities {
                read_from_store: self.admin.read_from_store,
            },
        }
    }
}

pub fn load_config() -> Result<Config> {
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["nodecfg.toml", ".nodecfg.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with NODECFG_ prefix
    builder = builder.add_source(config::Environment::with_prefix("NODECFG").separator("_"));

    let cfg = builder.build().context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(args: InitArgs, ctx: &AppContext) -> Result<()> {
    let config_path = args.path.join("nodecfg.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_admin_server() {
        let config = Config::default();
        assert_eq!(config.admin.addr, DEFAULT_ADMIN_ADDR);
        assert_eq!(config.admin.timeout_secs, 60);
        assert!(config.admin.read_from_store);
        assert_eq!(config.editor.program, None);
    }

    #[test]
    fn address_override_wins() {
        let config = Config::default();
        let options = config.admin_options(Some("10.0.0.7:6440"));
        assert_eq!(options.addr, "10.0.0.7:6440");
        assert_eq!(options.timeout, Duration::from_secs(60));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.admin.addr, DEFAULT_ADMIN_ADDR);
    }
}
