// config/mod.rs
use serde::Deserialize;
use config::Config;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_REFRESH_INITIAL_DELAY_SECS: u64 = 15;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_DEVICE_PORT: u16 = 80;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub device: DeviceConfig,
    pub polling: PollingSettings,
    pub http: HttpSettings,
    pub server: ServerSettings,
    pub metrics: MetricsSettings,
}

/// Which physical lamp to address. `name` disambiguates lamps sharing one listener.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeviceConfig {
    #[validate(length(min = 1, message = "device ip must be set"))]
    pub ip: String,
    #[validate(length(min = 1, message = "device name must be set"))]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PollingSettings {
    pub initial_delay_secs: u64,
    pub interval_secs: u64,
}

impl PollingSettings {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            initial_delay_secs: DEFAULT_REFRESH_INITIAL_DELAY_SECS,
            interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HttpSettings {
    pub timeout_ms: u64,
    pub port: u16,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            port: DEFAULT_DEVICE_PORT,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("device.ip", "")?
            .set_default("device.name", "")?
            .set_default("polling.initial_delay_secs", DEFAULT_REFRESH_INITIAL_DELAY_SECS as i64)?
            .set_default("polling.interval_secs", DEFAULT_REFRESH_INTERVAL_SECS as i64)?
            .set_default("http.timeout_ms", DEFAULT_HTTP_TIMEOUT_MS as i64)?
            .set_default("http.port", DEFAULT_DEVICE_PORT as i64)?
            .set_default("server.address", "0.0.0.0:8080")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.port", 9000_i64)?
            .add_source(config::File::with_name("config/config").required(false))
            .add_source(config::Environment::with_prefix("DIYLED").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_fields_fail_validation() {
        let config = DeviceConfig {
            ip: String::new(),
            name: "desk".into(),
        };
        assert!(config.validate().is_err());

        let config = DeviceConfig {
            ip: "192.168.1.40".into(),
            name: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn complete_device_config_validates() {
        let config = DeviceConfig {
            ip: "192.168.1.40".into(),
            name: "desk".into(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_match_device_timing() {
        let polling = PollingSettings::default();
        assert_eq!(polling.initial_delay(), Duration::from_secs(15));
        assert_eq!(polling.interval(), Duration::from_secs(10));
        let http = HttpSettings::default();
        assert_eq!(http.timeout(), Duration::from_millis(2000));
        assert_eq!(http.port, 80);
    }
}
