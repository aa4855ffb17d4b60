use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecs::{
    config::{Credentials, Region},
    types::{self as ecs, TransportProtocol},
    Client,
};
use tracing::info;

use crate::{
    client::{ClusterClient, ServiceUpdate, TaskRegistration},
    config::DeploymentConfig,
    service::{DeploymentPolicy, ServiceUpdateRequest},
    task::{ContainerDefinition, PortMapping, Protocol, TaskRegistrationRequest},
};

const CREDENTIALS_PROVIDER_NAME: &str = "deployment-config";

/// Talks to Amazon ECS through the AWS SDK.
pub struct EcsClient {
    client: Client,
}

impl EcsClient {
    /// Uses the configured key pair when both halves are set, otherwise the
    /// SDK's default credential chain. An empty region also falls back to
    /// the default chain.
    #[tracing::instrument(name = "EcsClient::from_config", skip_all, fields(
        region = %config.region
    ))]
    pub async fn from_config(config: &DeploymentConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if !config.region.is_empty() {
            loader = loader.region(Region::new(config.region.clone()));
        }

        match config.static_credentials() {
            Some((access_key, secret_key)) => {
                loader = loader.credentials_provider(Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                ));
            }
            None => info!("no AWS credentials provided, using the default credential chain"),
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ClusterClient for EcsClient {
    #[tracing::instrument(name = "EcsClient::register_task_definition", skip_all, fields(
        family = %request.family
    ))]
    async fn register_task_definition(
        &self,
        request: &TaskRegistrationRequest,
    ) -> Result<TaskRegistration> {
        let container_definitions = request
            .container_definitions
            .iter()
            .map(container_definition)
            .collect::<Result<Vec<_>>>()?;

        let volumes = request
            .volumes
            .iter()
            .map(|volume| ecs::Volume::builder().name(&volume.name).build())
            .collect();

        let task_role_arn =
            (!request.task_role_arn.is_empty()).then(|| request.task_role_arn.clone());

        let output = self
            .client
            .register_task_definition()
            .family(&request.family)
            .set_task_role_arn(task_role_arn)
            .set_container_definitions(Some(container_definitions))
            .set_volumes(Some(volumes))
            .send()
            .await?;

        let task_definition = output.task_definition();

        Ok(TaskRegistration {
            task_definition_arn: task_definition
                .and_then(|definition| definition.task_definition_arn())
                .map(str::to_owned),
            family: task_definition
                .and_then(|definition| definition.family())
                .map(str::to_owned),
            revision: task_definition
                .map(|definition| i64::from(definition.revision()))
                .unwrap_or_default(),
            status: task_definition
                .and_then(|definition| definition.status())
                .map(|status| status.as_str().to_owned()),
        })
    }

    #[tracing::instrument(name = "EcsClient::update_service", skip_all, fields(
        cluster = %request.cluster,
        service = %request.service
    ))]
    async fn update_service(&self, request: &ServiceUpdateRequest) -> Result<ServiceUpdate> {
        let desired_count = request
            .desired_count
            .map(|count| narrow(count, "desired_count"))
            .transpose()?;

        let deployment_configuration = request
            .deployment_configuration
            .map(deployment_configuration)
            .transpose()?;

        let output = self
            .client
            .update_service()
            .cluster(&request.cluster)
            .service(&request.service)
            .task_definition(&request.task_definition)
            .set_desired_count(desired_count)
            .set_deployment_configuration(deployment_configuration)
            .send()
            .await?;

        let service = output.service();

        Ok(ServiceUpdate {
            service_arn: service
                .and_then(|service| service.service_arn())
                .map(str::to_owned),
            service_name: service
                .and_then(|service| service.service_name())
                .map(str::to_owned),
            task_definition: service
                .and_then(|service| service.task_definition())
                .map(str::to_owned),
            desired_count: service
                .map(|service| i64::from(service.desired_count()))
                .unwrap_or_default(),
            running_count: service
                .map(|service| i64::from(service.running_count()))
                .unwrap_or_default(),
            pending_count: service
                .map(|service| i64::from(service.pending_count()))
                .unwrap_or_default(),
            status: service
                .and_then(|service| service.status())
                .map(str::to_owned),
        })
    }
}

/// The SDK takes 32 bit integers.
pub(crate) fn narrow(value: i64, field: &str) -> Result<i32> {
    i32::try_from(value).with_context(|| format!("{field} is out of range: {value}"))
}

pub(crate) fn container_definition(
    input: &ContainerDefinition,
) -> Result<ecs::ContainerDefinition> {
    let port_mappings = input
        .port_mappings
        .iter()
        .map(port_mapping)
        .collect::<Result<Vec<_>>>()?;

    let environment = input
        .environment
        .iter()
        .map(|pair| {
            ecs::KeyValuePair::builder()
                .name(&pair.name)
                .value(&pair.value)
                .build()
        })
        .collect();

    Ok(ecs::ContainerDefinition::builder()
        .name(&input.name)
        .image(&input.image)
        .essential(input.essential)
        .set_cpu(input.cpu.map(|cpu| narrow(cpu, "cpu")).transpose()?)
        .set_memory(input.memory.map(|memory| narrow(memory, "memory")).transpose()?)
        .set_memory_reservation(
            input
                .memory_reservation
                .map(|memory| narrow(memory, "memory_reservation"))
                .transpose()?,
        )
        .set_port_mappings(Some(port_mappings))
        .set_environment(Some(environment))
        .set_command(Some(input.command.clone()))
        .set_entry_point(Some(input.entry_point.clone()))
        .set_dns_search_domains(Some(input.dns_search_domains.clone()))
        .set_dns_servers(Some(input.dns_servers.clone()))
        .set_docker_security_options(Some(input.docker_security_options.clone()))
        .set_links(Some(input.links.clone()))
        .set_docker_labels(Some(input.docker_labels.clone()))
        .set_extra_hosts(Some(Vec::new()))
        .set_mount_points(Some(Vec::new()))
        .set_ulimits(Some(Vec::new()))
        .set_volumes_from(Some(Vec::new()))
        .build())
}

pub(crate) fn port_mapping(input: &PortMapping) -> Result<ecs::PortMapping> {
    let protocol = match input.protocol {
        Protocol::Tcp => TransportProtocol::Tcp,
    };

    Ok(ecs::PortMapping::builder()
        .set_container_port(
            input
                .container_port
                .map(|port| narrow(port, "container port"))
                .transpose()?,
        )
        .set_host_port(
            input
                .host_port
                .map(|port| narrow(port, "host port"))
                .transpose()?,
        )
        .protocol(protocol)
        .build())
}

pub(crate) fn deployment_configuration(
    policy: DeploymentPolicy,
) -> Result<ecs::DeploymentConfiguration> {
    Ok(ecs::DeploymentConfiguration::builder()
        .minimum_healthy_percent(narrow(
            policy.minimum_healthy_percent,
            "minimum_healthy_percent",
        )?)
        .maximum_percent(narrow(policy.maximum_percent, "maximum_percent")?)
        .build())
}
