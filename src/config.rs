use anyhow::Result;
use serde::Deserialize;
use std::{fmt, path::Path};

/// A string that never shows up in `Debug` output.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "\"\"")
        } else {
            write!(f, "\"***\"")
        }
    }
}

/// Everything needed to register a task definition and roll a service onto it.
/// Numeric fields use 0 for "unset".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub access_key: String,
    pub secret_key: SecretString,
    pub region: String,
    /// Task definition family.
    pub family: String,
    pub task_role_arn: String,
    pub service: String,
    /// Defaults to `<family>-container` when empty.
    pub container_name: String,
    pub docker_image: String,
    pub tag: String,
    pub cluster: String,
    /// `"<minimumHealthyPercent> <maximumPercent>"`, empty to leave the service's policy alone.
    pub deployment_configuration: String,
    /// Expressions like `container=80,host=8080`.
    pub port_mappings: Vec<String>,
    /// Expressions like `KEY=VALUE`.
    pub environment: Vec<String>,
    pub desired_count: i64,
    pub cpu: i64,
    pub memory: i64,
    pub memory_reservation: i64,
    pub verified: bool,
    /// Do not log the remote responses.
    pub discreet: bool,
    pub skip_service_update: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("field {0} is required")]
    MissingField(String),
}

impl DeploymentConfig {
    #[tracing::instrument(name = "DeploymentConfig::from_file", skip_all, fields(
        file_path = ?file_path.as_ref()
    ))]
    pub async fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_contents = tokio::fs::read_to_string(file_path.as_ref()).await?;

        let config: DeploymentConfig = serde_yaml::from_str(&file_contents)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut required = vec![("family", &self.family), ("docker_image", &self.docker_image)];

        if !self.skip_service_update {
            required.push(("cluster", &self.cluster));
            required.push(("service", &self.service));
        }

        for (name, value) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingField(name.to_owned()));
            }
        }

        Ok(())
    }

    /// Static credentials, only when both halves are present.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return None;
        }

        Some((self.access_key.as_str(), self.secret_key.expose()))
    }

    pub fn image_reference(&self) -> String {
        format!("{}:{}", self.docker_image, self.tag)
    }

    pub fn container_name(&self) -> String {
        if self.container_name.is_empty() {
            format!("{}-container", self.family)
        } else {
            self.container_name.clone()
        }
    }
}
