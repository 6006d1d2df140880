use reqwest::Url;
use std::{env, net::SocketAddr, path::PathBuf};
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://chaturbate.com/api/public/affiliates/onlinerooms/";
const DEFAULT_CHAT_BASE_URL: &str = "https://www.cambaddies.net/in/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Campaign identifiers the client uses to build chat and player links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLinks {
    pub base_url: String,
    pub tour_embed: String,
    pub tour_chat: String,
    pub campaign: String,
}

impl ChatLinks {
    pub fn chat_url(&self, username: &str) -> String {
        self.build(&[
            ("tour", self.tour_chat.as_str()),
            ("campaign", self.campaign.as_str()),
            ("track", "default"),
            ("room", username),
        ])
    }

    pub fn embed_url(&self, username: &str) -> String {
        self.build(&[
            ("tour", self.tour_embed.as_str()),
            ("campaign", self.campaign.as_str()),
            ("track", "embed"),
            ("room", username),
            ("disable_sound", "1"),
            ("mobileRedirect", "auto"),
            ("embed_video_only", "1"),
        ])
    }

    fn build(&self, params: &[(&str, &str)]) -> String {
        // base_url is checked when the config is loaded
        Url::parse_with_params(&self.base_url, params)
            .map_or_else(|_| self.base_url.clone(), String::from)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub api_url: String,
    pub affiliate_id: String,
    pub default_limit: u32,
    pub site_name: String,
    pub site_url: String,
    pub chat: ChatLinks,
    pub cache_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: DEFAULT_API_URL.to_string(),
            affiliate_id: "lRUVu".to_string(),
            default_limit: 36,
            site_name: "CamBaddies".to_string(),
            site_url: "https://cambaddies.net".to_string(),
            chat: ChatLinks {
                base_url: DEFAULT_CHAT_BASE_URL.to_string(),
                tour_embed: "9oGW".to_string(),
                tour_chat: "LQps".to_string(),
                campaign: "lRUVu".to_string(),
            },
            cache_dir: env::temp_dir().join("cam-directory-cache"),
            assets_dir: PathBuf::from("assets"),
            metrics: false,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment, keeping defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = parse("BIND_ADDR", value)?;
        }
        if let Some(value) = lookup("API_URL") {
            Url::parse(&value).map_err(|_| invalid("API_URL", &value))?;
            config.api_url = value;
        }
        if let Some(value) = lookup("DEFAULT_LIMIT") {
            let limit: u32 = parse("DEFAULT_LIMIT", value.clone())?;
            if limit == 0 {
                return Err(invalid("DEFAULT_LIMIT", &value));
            }
            config.default_limit = limit;
        }
        if let Some(value) = lookup("CHAT_BASE_URL") {
            Url::parse(&value).map_err(|_| invalid("CHAT_BASE_URL", &value))?;
            config.chat.base_url = value;
        }
        if let Some(value) = lookup("SITE_URL") {
            config.site_url = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("METRICS") {
            config.metrics = matches!(value.as_str(), "1" | "true");
        }

        let strings = [
            ("AFFILIATE_ID", &mut config.affiliate_id),
            ("SITE_NAME", &mut config.site_name),
            ("TOUR_EMBED", &mut config.chat.tour_embed),
            ("TOUR_CHAT", &mut config.chat.tour_chat),
            ("CAMPAIGN", &mut config.chat.campaign),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }

        if let Some(value) = lookup("CACHE_DIR") {
            config.cache_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("ASSETS_DIR") {
            config.assets_dir = PathBuf::from(value);
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value })
}
