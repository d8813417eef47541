use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Reading simulation interval in seconds.
    pub poll_interval_secs: u64,
    /// Base URL of the external analytics service receiving event envelopes.
    pub analytics_url: String,
    /// Seed demo zones/devices and default thresholds at startup.
    pub seed_demo_devices: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            poll_interval_secs: optional("POLL_INTERVAL_SECS", "10")
                .parse()
                .context("POLL_INTERVAL_SECS must be a positive integer")?,
            analytics_url: optional("ANALYTICS_URL", "http://python-service:8000"),
            seed_demo_devices: parse_bool(&optional("SEED_DEMO_DEVICES", "true"))
                .context("SEED_DEMO_DEVICES must be true or false")?,
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(anyhow::anyhow!("not a boolean: {other:?}")),
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool(" no ").unwrap());
        assert!(!parse_bool("0").unwrap());
    }

    #[test]
    fn parse_bool_rejects_garbage() {
        let err = parse_bool("maybe").unwrap_err();
        assert!(err.to_string().contains("not a boolean"));
    }
}
