use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::{
    config::DeploymentConfig,
    parse::{self, ParseError, PortMappingKey},
};

pub const DEFAULT_MEMORY_RESERVATION: i64 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: Option<i64>,
    pub host_port: Option<i64>,
    pub protocol: Protocol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentPair {
    pub name: String,
    pub value: String,
}

/// The single container registered with every task definition.
///
/// Optional collections the deployment never fills are sent as explicit empty
/// collections, not left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub essential: bool,
    pub cpu: Option<i64>,
    pub memory: Option<i64>,
    pub memory_reservation: Option<i64>,
    pub port_mappings: Vec<PortMapping>,
    pub environment: Vec<EnvironmentPair>,
    pub command: Vec<String>,
    pub entry_point: Vec<String>,
    pub dns_search_domains: Vec<String>,
    pub dns_servers: Vec<String>,
    pub docker_security_options: Vec<String>,
    pub links: Vec<String>,
    pub docker_labels: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRegistrationRequest {
    pub family: String,
    pub task_role_arn: String,
    pub container_definitions: Vec<ContainerDefinition>,
    pub volumes: Vec<Volume>,
}

impl TaskRegistrationRequest {
    pub fn container(&self) -> Option<&ContainerDefinition> {
        self.container_definitions.first()
    }
}

/// Builds the registration request. Fails on the first bad port mapping or
/// environment expression, before anything is sent.
#[tracing::instrument(name = "task::build_task_definition", skip_all, fields(
    family = %config.family
))]
pub fn build_task_definition(
    config: &DeploymentConfig,
) -> Result<TaskRegistrationRequest, ParseError> {
    let mut definition = ContainerDefinition {
        name: config.container_name(),
        image: config.image_reference(),
        essential: true,
        cpu: non_zero(config.cpu),
        memory: None,
        memory_reservation: None,
        port_mappings: Vec::with_capacity(config.port_mappings.len()),
        environment: Vec::with_capacity(config.environment.len()),
        command: Vec::new(),
        entry_point: Vec::new(),
        dns_search_domains: Vec::new(),
        dns_servers: Vec::new(),
        docker_security_options: Vec::new(),
        links: Vec::new(),
        docker_labels: HashMap::new(),
    };

    if config.memory == 0 && config.memory_reservation == 0 {
        definition.memory_reservation = Some(DEFAULT_MEMORY_RESERVATION);
    } else {
        definition.memory = non_zero(config.memory);
        definition.memory_reservation = non_zero(config.memory_reservation);
    }

    for expression in config.port_mappings.iter() {
        definition.port_mappings.push(port_mapping(expression)?);
    }

    for expression in config.environment.iter() {
        let (name, value) = parse::parse_environment_pair(expression)?;
        definition.environment.push(EnvironmentPair { name, value });
    }

    Ok(TaskRegistrationRequest {
        family: config.family.clone(),
        task_role_arn: config.task_role_arn.clone(),
        container_definitions: vec![definition],
        volumes: Vec::new(),
    })
}

/// Unknown keys are logged and dropped without looking at their value.
fn port_mapping(expression: &str) -> Result<PortMapping, ParseError> {
    let mut mapping = PortMapping {
        container_port: None,
        host_port: None,
        protocol: Protocol::Tcp,
    };

    for component in parse::port_map_components(expression) {
        let (component, key, value) = component?;

        match PortMappingKey::from(key) {
            PortMappingKey::Container => {
                mapping.container_port = Some(parse::parse_port_number(component, value)?)
            }
            PortMappingKey::Host => {
                mapping.host_port = Some(parse::parse_port_number(component, value)?)
            }
            PortMappingKey::Unknown(key) => warn!(%key, "invalid port mapping key"),
        }
    }

    Ok(mapping)
}

pub(crate) fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}
