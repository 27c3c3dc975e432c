use std::{collections::HashMap, env, fs, net::SocketAddr, path::Path, time::Duration};

use crate::{channels::ChannelMap, domain::ChannelId, errors::Error, formatting::Locale, Result};

/// Typed configuration for the relay.
///
/// Loaded from the environment once at startup and treated as immutable for
/// the process lifetime.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub city_channels: ChannelMap,

    // Webhook API
    pub webhook_api_key: String,
    pub bind_addr: SocketAddr,
    pub environment: String,

    // Formatting
    pub locale: Locale,
    pub max_description_length: usize,

    // Retry
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let webhook_api_key = env_str("WEBHOOK_API_KEY").unwrap_or_default();
        if webhook_api_key.trim().is_empty() {
            return Err(Error::Config(
                "WEBHOOK_API_KEY environment variable is required".to_string(),
            ));
        }

        let city_channels = parse_city_channels(env_str("CITY_CHANNELS"))?;
        let locale = parse_locale(env_str("MESSAGE_LOCALE"))?;

        let bind_addr = env_str("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("BIND_ADDR is not a socket address: {e}")))?;

        let environment = env_str("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let max_description_length = env_usize("MAX_DESCRIPTION_LENGTH").unwrap_or(200);
        let max_retries = env_u32("MAX_RETRIES").unwrap_or(3).max(1);
        let retry_delay = Duration::from_millis(env_u64("RETRY_DELAY_MS").unwrap_or(1000));

        Ok(Self {
            bot_token,
            city_channels,
            webhook_api_key,
            bind_addr,
            environment,
            locale,
            max_description_length,
            max_retries,
            retry_delay,
        })
    }
}

/// `CITY_CHANNELS` is a JSON object keyed by city id, e.g.
/// `{"1": "@baghdad_listings", "2": "-1001234567890"}`.
fn parse_city_channels(raw: Option<String>) -> Result<ChannelMap> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(ChannelMap::default());
    };

    let parsed: HashMap<String, String> = serde_json::from_str(&raw)
        .map_err(|e| Error::Config(format!("CITY_CHANNELS is not a valid JSON object: {e}")))?;

    let mut inner = HashMap::with_capacity(parsed.len());
    for (city, channel) in parsed {
        let city_id = city.trim().parse::<u32>().map_err(|_| {
            Error::Config(format!("CITY_CHANNELS key is not a city id: {city:?}"))
        })?;
        if channel.trim().is_empty() {
            return Err(Error::Config(format!(
                "CITY_CHANNELS value for city {city_id} is empty"
            )));
        }
        inner.insert(city_id, ChannelId(channel));
    }
    Ok(ChannelMap::new(inner))
}

fn parse_locale(raw: Option<String>) -> Result<Locale> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("arabic") | Some("ar") => Ok(Locale::Arabic),
        Some("english") | Some("en") => Ok(Locale::English),
        Some(other) => Err(Error::Config(format!("unknown MESSAGE_LOCALE: {other}"))),
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
