use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use my_space_adapters::HostConfig;
use my_space_domain::Credentials;
use tracing::{debug, warn};

const DEFAULT_GALLERY_TAG: &str = "cloudinhery_gallery";
const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com";
const DEFAULT_RESOURCE_BASE_URL: &str = "https://res.cloudinary.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: HostConfig,
    pub credentials: Credentials,
    pub session_path: String,
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = HostConfig {
            cloud_name: required(&lookup, "MY_SPACE_CLOUD_NAME"),
            upload_preset: required(&lookup, "MY_SPACE_UPLOAD_PRESET"),
            api_key: required(&lookup, "MY_SPACE_API_KEY"),
            api_secret: required(&lookup, "MY_SPACE_API_SECRET"),
            gallery_tag: or_default(&lookup, "MY_SPACE_GALLERY_TAG", DEFAULT_GALLERY_TAG),
            api_base_url: or_default(&lookup, "MY_SPACE_API_BASE_URL", DEFAULT_API_BASE_URL),
            resource_base_url: or_default(
                &lookup,
                "MY_SPACE_RESOURCE_BASE_URL",
                DEFAULT_RESOURCE_BASE_URL,
            ),
            timeout: Duration::from_secs(parsed(
                &lookup,
                "MY_SPACE_HTTP_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
        };

        let credentials = Credentials::new(
            required(&lookup, "MY_SPACE_AUTH_EMAIL"),
            required(&lookup, "MY_SPACE_AUTH_PASSWORD"),
        );

        let session_path = lookup("MY_SPACE_SESSION_PATH").unwrap_or_else(default_session_path);

        Self {
            host,
            credentials,
            session_path,
        }
    }
}

fn default_session_path() -> String {
    let path: PathBuf = env::temp_dir().join("my-space").join("session.sqlite3");
    path.to_string_lossy().to_string()
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        warn!("{key} not set; features that need it will fail");
        String::new()
    })
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|error| {
        warn!("invalid {key} value {raw:?}: {error}; using {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MY_SPACE_CLOUD_NAME", "demo"),
            ("MY_SPACE_AUTH_EMAIL", "me@example.com"),
        ]));

        assert_eq!(config.host.cloud_name, "demo");
        assert_eq!(config.host.gallery_tag, "cloudinhery_gallery");
        assert_eq!(config.host.api_base_url, "https://api.cloudinary.com");
        assert_eq!(config.host.timeout, Duration::from_secs(30));
        assert_eq!(config.credentials.email, "me@example.com");
        assert!(config.credentials.password.is_empty());
        assert!(config.session_path.ends_with("session.sqlite3"));
    }

    #[test]
    fn bad_timeout_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MY_SPACE_HTTP_TIMEOUT_SECS", "soon"),
            ("MY_SPACE_SESSION_PATH", "/tmp/x.sqlite3"),
        ]));

        assert_eq!(config.host.timeout, Duration::from_secs(30));
        assert_eq!(config.session_path, "/tmp/x.sqlite3");
    }
}
