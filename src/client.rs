use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::{service::ServiceUpdateRequest, task::TaskRegistrationRequest};

/// What the orchestration service reports back after a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRegistration {
    pub task_definition_arn: Option<String>,
    pub family: Option<String>,
    pub revision: i64,
    pub status: Option<String>,
}

/// What the orchestration service reports back after a service update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    pub service_arn: Option<String>,
    pub service_name: Option<String>,
    pub task_definition: Option<String>,
    pub desired_count: i64,
    pub running_count: i64,
    pub pending_count: i64,
    pub status: Option<String>,
}

/// The two calls a deployment makes against the cluster. Errors are returned
/// exactly as the transport produced them.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn register_task_definition(
        &self,
        request: &TaskRegistrationRequest,
    ) -> Result<TaskRegistration>;

    async fn update_service(&self, request: &ServiceUpdateRequest) -> Result<ServiceUpdate>;
}
