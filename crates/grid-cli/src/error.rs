//! CLI error types

use grid_deployer::DeployerError;
use grid_node::NodeError;
use grid_rmb::RmbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Bus error: {0}")]
    Rmb(#[from] RmbError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Deployment error: {0}")]
    Deployer(#[from] DeployerError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidInput(_) => 2,
            CliError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
