//! Service configuration
//!
//! Everything comes from environment variables with defaults matching a
//! plain `sonos-doorbell` invocation on a home network.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Path the devices are told to fetch the chime from
pub const CHIME_ROUTE: &str = "/clips/doorbell.mp3";

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port for `/ring` and the chime file
    /// Default: 5050 (`PORT`)
    pub port: u16,

    /// Address announced to the devices; detected when `None`
    /// Default: None (`DOORBELL_ADDRESS`)
    pub address: Option<Ipv4Addr>,

    /// Chime file served on `/clips/doorbell.mp3`
    /// Default: ./doorbell.mp3 (`DOORBELL_CHIME_PATH`)
    pub chime_path: PathBuf,

    /// How long to wait for the first speaker to answer
    /// Default: 3 seconds (`DOORBELL_DISCOVERY_TIMEOUT_SECS`)
    pub discovery_timeout: Duration,

    /// Volume the chime plays at, 0-100
    /// Default: 60 (`DOORBELL_CHIME_VOLUME`)
    pub chime_volume: u8,

    /// Time the chime is given before state is restored
    /// Default: 7 seconds (`DOORBELL_CHIME_SECS`)
    pub chime_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5050,
            address: None,
            chime_path: PathBuf::from("./doorbell.mp3"),
            discovery_timeout: Duration::from_secs(3),
            chime_volume: 60,
            chime_duration: Duration::from_secs(7),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let chime_volume = parse_var(&lookup, "DOORBELL_CHIME_VOLUME")?.unwrap_or(defaults.chime_volume);
        if chime_volume > sonos_api::operations::rendering_control::MAX_VOLUME {
            return Err(ConfigError::InvalidValue {
                var: "DOORBELL_CHIME_VOLUME",
                value: chime_volume.to_string(),
                reason: "volume must be between 0 and 100".to_string(),
            });
        }

        Ok(Self {
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            address: parse_var(&lookup, "DOORBELL_ADDRESS")?,
            chime_path: lookup("DOORBELL_CHIME_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.chime_path),
            discovery_timeout: parse_var(&lookup, "DOORBELL_DISCOVERY_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.discovery_timeout),
            chime_volume,
            chime_duration: parse_var(&lookup, "DOORBELL_CHIME_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.chime_duration),
        })
    }

    /// The parts of the configuration the ring sequence needs
    pub fn ring_settings(&self) -> RingSettings {
        RingSettings {
            chime_volume: self.chime_volume,
            chime_duration: self.chime_duration,
            chime_route: CHIME_ROUTE.to_string(),
        }
    }
}

/// Parameters of one ring, shared by every device task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSettings {
    pub chime_volume: u8,
    pub chime_duration: Duration,
    /// Path on our HTTP server, appended to `http://{address}:{port}`
    pub chime_route: String,
}

impl Default for RingSettings {
    fn default() -> Self {
        Config::default().ring_settings()
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }

    let parsed = value.trim().parse::<T>();
    parsed.map(Some).map_err(|e| ConfigError::InvalidValue {
        var,
        value,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5050);
        assert_eq!(config.address, None);
        assert_eq!(config.chime_path, PathBuf::from("./doorbell.mp3"));
        assert_eq!(config.discovery_timeout, Duration::from_secs(3));

        let settings = config.ring_settings();
        assert_eq!(settings.chime_volume, 60);
        assert_eq!(settings.chime_duration, Duration::from_secs(7));
        assert_eq!(settings.chime_route, "/clips/doorbell.mp3");
    }

    #[test]
    fn test_overrides() {
        let config = tokio_test::assert_ok!(Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DOORBELL_ADDRESS", "192.168.1.20"),
            ("DOORBELL_CHIME_PATH", "/srv/chime.mp3"),
            ("DOORBELL_DISCOVERY_TIMEOUT_SECS", "10"),
            ("DOORBELL_CHIME_VOLUME", "35"),
            ("DOORBELL_CHIME_SECS", "4"),
        ])));

        assert_eq!(config.port, 8080);
        assert_eq!(config.address, Some(Ipv4Addr::new(192, 168, 1, 20)));
        assert_eq!(config.chime_path, PathBuf::from("/srv/chime.mp3"));
        assert_eq!(config.discovery_timeout, Duration::from_secs(10));
        assert_eq!(config.chime_volume, 35);
        assert_eq!(config.chime_duration, Duration::from_secs(4));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", " "), ("DOORBELL_CHIME_PATH", "")])).unwrap();
        assert_eq!(config.port, 5050);
        assert_eq!(config.chime_path, PathBuf::from("./doorbell.mp3"));
    }

    #[test]
    fn test_invalid_port_names_the_variable() {
        let err = tokio_test::assert_err!(Config::from_lookup(lookup(&[("PORT", "http")])));
        assert!(matches!(err, ConfigError::InvalidValue { var: "PORT", .. }));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_volume_above_100_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DOORBELL_CHIME_VOLUME", "150")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: "DOORBELL_CHIME_VOLUME", .. }
        ));
    }

    #[test]
    fn test_ipv6_address_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DOORBELL_ADDRESS", "::1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "DOORBELL_ADDRESS", .. }));
    }
}
