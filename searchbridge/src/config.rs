use std::str::FromStr;
use std::time::Duration;

use az_search::SearchClient;
use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

use crate::domain::{ProcessorConfig, WorkerConfig};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub search: SearchSettings,
    pub worker: WorkerSettings,
}

#[derive(Deserialize, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: String,
}

impl SearchSettings {
    pub fn client(&self) -> SearchClient {
        SearchClient::new(&self.endpoint, &self.api_key)
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct WorkerSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub poll_interval_secs: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub batch_size: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub drain_timeout_secs: u64,
}

impl From<&WorkerSettings> for WorkerConfig {
    fn from(settings: &WorkerSettings) -> Self {
        Self {
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
            drain_timeout: Duration::from_secs(settings.drain_timeout_secs),
        }
    }
}

impl From<&WorkerSettings> for ProcessorConfig {
    fn from(settings: &WorkerSettings) -> Self {
        Self {
            batch_size: settings.batch_size,
        }
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .expect("Failed to parse APP_ENVIRONMENT");
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("SEARCHBRIDGE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
