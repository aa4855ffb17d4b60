use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::client::{ClusterClient, ServiceUpdate, TaskRegistration};
use crate::config::DeploymentConfig;
use crate::service::{DeploymentPolicy, ServiceUpdateRequest};
use crate::task;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeployError {
    #[error("task definition registration returned no task definition arn")]
    MissingTaskDefinitionArn,
}

/// The outcome of one deployment. `service_update` is `None` when the
/// service update was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub registration: TaskRegistration,
    pub service_update: Option<ServiceUpdate>,
}

pub struct Deployer {
    client: Box<dyn ClusterClient>,
}

impl Deployer {
    #[tracing::instrument(name = "Deployer::new", skip_all)]
    pub fn new(client: Box<dyn ClusterClient>) -> Self {
        Self { client }
    }

    /// Registers a new task definition revision and, unless told not to,
    /// points the service at it.
    ///
    /// Nothing is rolled back: if the service update fails, the new revision
    /// stays registered.
    #[tracing::instrument(name = "Deployer::exec", skip_all, fields(
        family = %config.family,
        cluster = %config.cluster,
        service = %config.service,
        verified = config.verified
    ))]
    pub async fn exec(&self, config: &DeploymentConfig) -> Result<DeploymentSummary> {
        let registration_request = task::build_task_definition(config)?;

        // Parsed up front so a bad policy fails before anything is registered.
        let policy = if config.skip_service_update {
            None
        } else {
            DeploymentPolicy::from_config(config)?
        };

        info!(image = %config.image_reference(), "registering task definition");

        let registration = self
            .client
            .register_task_definition(&registration_request)
            .await?;

        if config.skip_service_update {
            info!("skip_service_update is set, not updating service to the new task definition");

            return Ok(DeploymentSummary {
                registration,
                service_update: None,
            });
        }

        let task_definition_arn = registration
            .task_definition_arn
            .clone()
            .ok_or(DeployError::MissingTaskDefinitionArn)?;

        let update_request = ServiceUpdateRequest::new(config, task_definition_arn, policy);

        info!(task_definition = %update_request.task_definition, "updating service");

        let service_update = self.client.update_service(&update_request).await?;

        if !config.discreet {
            log_response("service updated", &service_update);
            log_response("task definition registered", &registration);
        }

        Ok(DeploymentSummary {
            registration,
            service_update: Some(service_update),
        })
    }
}

fn log_response(message: &str, response: &impl Serialize) {
    match serde_json::to_string_pretty(response) {
        Ok(response) => info!("{message}\n{response}"),
        Err(error) => warn!(?error, "{message}, response could not be serialized"),
    }
}
