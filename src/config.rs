use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::scpi::address::{fgen_selectors, oscilloscope_selectors, SelectorTable};
use crate::scpi::client::ConnectionConfig;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub connection: ConnectionSettings,
    pub instruments: InstrumentTables,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectionSettings {
    pub connect_timeout_s: u64,
    pub read_timeout_s: u64,
    pub write_timeout_s: u64,
}

/// Selector tables mapping small integers to instrument addresses. The
/// defaults reproduce the bench's fixed inventory; a config file or
/// environment override extends or replaces them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InstrumentTables {
    pub function_generators: HashMap<u32, String>,
    pub oscilloscopes: HashMap<u32, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    /// JSONL wire trace destination; `None` disables tracing.
    pub trace_path: Option<String>,
    pub trace_buffer: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout_s: 5,
            read_timeout_s: 10,
            write_timeout_s: 5,
        }
    }
}

impl ConnectionSettings {
    pub fn to_connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_s),
            read_timeout: Duration::from_secs(self.read_timeout_s),
            write_timeout: Duration::from_secs(self.write_timeout_s),
        }
    }
}

impl Default for InstrumentTables {
    fn default() -> Self {
        Self {
            function_generators: fgen_selectors(),
            oscilloscopes: oscilloscope_selectors(),
        }
    }
}

impl InstrumentTables {
    pub fn fgen_table(&self) -> SelectorTable {
        self.function_generators.clone()
    }

    pub fn oscilloscope_table(&self) -> SelectorTable {
        self.oscilloscopes.clone()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_path: None,
            trace_buffer: 32,
        }
    }
}

/// Load configuration from file with layered fallbacks
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

    if let Some(path) = config_path {
        if path.exists() {
            builder = builder.add_source(File::from(path));
        } else {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    } else if Path::new("benchlink.toml").exists() {
        builder = builder.add_source(File::with_name("benchlink.toml"));
    }

    // Add environment variable overrides with prefix "BENCHLINK_"
    builder = builder.add_source(
        Environment::with_prefix("BENCHLINK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize::<AppConfig>()
}

/// Load configuration with better error handling and defaults
pub fn load_config_or_default(config_path: Option<&Path>) -> AppConfig {
    match load_config(config_path) {
        Ok(config) => {
            log::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            log::warn!("Failed to load config ({}), using defaults", e);
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_bench_inventory() {
        let config = AppConfig::default();
        assert_eq!(
            config.instruments.function_generators.get(&1).unwrap(),
            "USB0::2391::8967::INSTR"
        );
        assert_eq!(
            config.instruments.oscilloscopes.get(&1).unwrap(),
            "IP:192.168.3.220"
        );
        assert_eq!(
            config.connection.to_connection_config().read_timeout,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/benchlink.toml"))).is_err());
    }
}
