use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_SITE_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} is invalid: {1}")]
    Invalid(&'static str, String),
}

/// Process configuration, read once at startup and shared through `AppContext`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub admin_email: Option<String>,
    pub site_addr: SocketAddr,
    pub channel_name: Option<String>,
    pub secure_cookies: bool,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let site_addr: SocketAddr = get("SITE_ADDR")
            .unwrap_or_else(|| DEFAULT_SITE_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid("SITE_ADDR", e.to_string()))?;

        let secure_cookies = match get("SECURE_COOKIES").as_deref() {
            None => false,
            Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
            Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::Invalid(
                    "SECURE_COOKIES",
                    format!("expected true or false, got {other}"),
                ))
            }
        };

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            google_client_id: require("GOOGLE_CLIENT_ID")?,
            google_client_secret: require("GOOGLE_CLIENT_SECRET")?,
            google_redirect_uri: get("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|| format!("http://{site_addr}/auth/callback")),
            admin_email: get("ADMIN_EMAIL"),
            site_addr,
            channel_name: get("CHANNEL_NAME"),
            secure_cookies,
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/proposals"),
        ("GOOGLE_CLIENT_ID", "id"),
        ("GOOGLE_CLIENT_SECRET", "secret"),
    ];

    #[test]
    fn fills_in_defaults() {
        let config = AppConfig::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.site_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.google_redirect_uri,
            "http://127.0.0.1:3000/auth/callback"
        );
        assert_eq!(config.admin_email, None);
        assert!(!config.secure_cookies);
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn missing_required_variable_is_reported_by_name() {
        let err = AppConfig::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GOOGLE_CLIENT_SECRET")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ADMIN_EMAIL", "   "));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.admin_email, None);
    }

    #[test]
    fn rejects_bad_site_addr() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SITE_ADDR", "not-an-addr"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("SITE_ADDR", _)));
    }
}
