use depot_fulfillment::Numbering;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Without it documents live in process memory.
    #[serde(default)]
    pub redis: Option<RedisConfig>,
    /// Without it reconciliation is only logged.
    #[serde(default)]
    pub kafka: Option<KafkaConfig>,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub numbering: NumberingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_topic() -> String {
    "fulfillment-events".to_string()
}

/// Order-management API serving orders and warehouses.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NumberingConfig {
    pub pick_list: String,
    pub pack_slip: String,
    pub shipping_label: String,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        let numbering = Numbering::default();
        Self {
            pick_list: numbering.pick_list,
            pack_slip: numbering.pack_slip,
            shipping_label: numbering.shipping_label,
        }
    }
}

impl From<NumberingConfig> for Numbering {
    fn from(config: NumberingConfig) -> Self {
        Numbering {
            pick_list: config.pick_list,
            pack_slip: config.pack_slip,
            shipping_label: config.shipping_label,
        }
    }
}

impl Config {
    /// `config/default`, then `config/{RUN_MODE}` and `config/local` when
    /// present, then `DEPOT__SECTION__KEY` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("DEPOT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
