use serde::Serialize;

use crate::{
    config::DeploymentConfig,
    parse::{self, ParseError},
    task::non_zero,
};

/// Rolling replacement bounds applied during a service update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPolicy {
    pub minimum_healthy_percent: i64,
    pub maximum_percent: i64,
}

impl DeploymentPolicy {
    /// `None` when the expression is empty.
    pub fn from_config(config: &DeploymentConfig) -> Result<Option<Self>, ParseError> {
        if config.deployment_configuration.is_empty() {
            return Ok(None);
        }

        let (minimum_healthy_percent, maximum_percent) =
            parse::parse_deployment_policy(&config.deployment_configuration)?;

        Ok(Some(Self {
            minimum_healthy_percent,
            maximum_percent,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateRequest {
    pub cluster: String,
    pub service: String,
    pub task_definition: String,
    pub desired_count: Option<i64>,
    pub deployment_configuration: Option<DeploymentPolicy>,
}

impl ServiceUpdateRequest {
    pub fn new(
        config: &DeploymentConfig,
        task_definition_arn: impl Into<String>,
        policy: Option<DeploymentPolicy>,
    ) -> Self {
        Self {
            cluster: config.cluster.clone(),
            service: config.service.clone(),
            task_definition: task_definition_arn.into(),
            desired_count: non_zero(config.desired_count),
            deployment_configuration: policy,
        }
    }
}
