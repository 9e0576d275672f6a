use eyre::{Context, eyre};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const BASE_CONFIG_PATH: &str = "config/app_config.toml";
const ENV_PREFIX: &str = "BOTWATCH_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Admin server root for the data-fetch channel.
    pub server_url: String,
    /// Websocket endpoint of the push channel.
    pub push_url: String,
    pub notice_lifetime_secs: u64,
    pub stats_refresh_secs: u64,
    pub reconnect_delay_secs: u64,
    pub page_size: usize,
    pub font_size: f32,
    pub show_timestamps: bool,
    pub cache_name: String,
    pub cached_assets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            push_url: "ws://localhost:5000/push".to_string(),
            notice_lifetime_secs: 10,
            stats_refresh_secs: 30,
            reconnect_delay_secs: 5,
            page_size: 10,
            font_size: 14.0,
            show_timestamps: true,
            cache_name: "admin-panel-v1".to_string(),
            cached_assets: vec![
                "/static/i18n/ru.json".to_string(),
                "/static/manifest.json".to_string(),
            ],
        }
    }
}

fn get_config_path() -> Result<PathBuf, eyre::Report> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| eyre!("Could not find a config directory"))?
        .join(env!("CARGO_PKG_NAME"));

    Ok(config_dir.join("app_config.toml"))
}

/// Layers defaults, the bundled base file, the user's file and `BOTWATCH_*`
/// environment variables, later layers winning.
fn figment(base: &Path, user: &Path) -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(base))
        .merge(Toml::file(user))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub async fn load() -> Result<Config, eyre::Report> {
    let user_config_path = get_config_path()?;
    tracing::info!("Loading user config from {:?}", user_config_path);
    tracing::info!("Loading base config from {:?}", BASE_CONFIG_PATH);

    let config: Config = figment(Path::new(BASE_CONFIG_PATH), &user_config_path)
        .extract()
        .context("Could not load config")?;

    if !user_config_path.exists() {
        if let Err(e) = save(&config).await {
            tracing::warn!("Failed to save initial config: {}", e);
        }
    }

    Ok(config)
}

pub async fn save(config: &Config) -> Result<(), eyre::Report> {
    let path = get_config_path()?;
    tracing::info!("Saving config to {:?}", path);

    let bytes = toml::to_string_pretty(config).context("Failed to serialize config")?;

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }
    }

    let mut file = tokio::fs::File::create(path)
        .await
        .context("Failed to create config file")?;

    file.write_all(bytes.as_bytes())
        .await
        .context("Failed to write config to file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_yield_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config: Config = figment(Path::new("absent/base.toml"), Path::new("absent/user.toml"))
                .extract()?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn user_file_and_env_override_base() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("base.toml", "server_url = \"http://base:1\"\npage_size = 25")?;
            jail.create_file("user.toml", "server_url = \"http://user:2\"")?;
            jail.set_env("BOTWATCH_NOTICE_LIFETIME_SECS", "3");

            let config: Config =
                figment(Path::new("base.toml"), Path::new("user.toml")).extract()?;
            assert_eq!(config.server_url, "http://user:2");
            assert_eq!(config.page_size, 25);
            assert_eq!(config.notice_lifetime_secs, 3);
            assert_eq!(config.push_url, Config::default().push_url);
            Ok(())
        });
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
