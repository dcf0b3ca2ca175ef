//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use serving_lib::ModelPaths;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `MODEL_SERVER_PORT`
pub const ENV_PREFIX: &str = "MODEL_SERVER";

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the prediction, health and metrics API
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artifact for the linear regression model
    #[serde(default = "default_linear_regression_model")]
    pub linear_regression_model: PathBuf,

    /// Artifact for the random forest model
    #[serde(default = "default_random_forest_model")]
    pub random_forest_model: PathBuf,

    /// Name attached to every structured log record
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_linear_regression_model() -> PathBuf {
    PathBuf::from("linear_regression_model.json")
}

fn default_random_forest_model() -> PathBuf {
    PathBuf::from("random_forest_model.json")
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(env)
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid server configuration")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn model_paths(&self) -> ModelPaths {
        ModelPaths {
            linear_regression: self.linear_regression_model.clone(),
            random_forest: self.random_forest_model.clone(),
        }
    }
}
