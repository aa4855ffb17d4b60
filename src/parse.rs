use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed expression: '{0}'")]
    MalformedExpression(String),
    #[error("port number should be an integer: '{0}'")]
    InvalidPortNumber(String),
    #[error("deployment configuration value should be an integer: '{0}'")]
    InvalidPolicyNumber(String),
}

/// Keys accepted in a port mapping expression such as `container=80,host=8080`.
#[derive(Debug, PartialEq, Eq)]
pub enum PortMappingKey {
    Container,
    Host,
    Unknown(String),
}

impl From<&str> for PortMappingKey {
    fn from(input: &str) -> Self {
        match input {
            "container" => Self::Container,
            "host" => Self::Host,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// Splits `k1=v1,k2=v2` into `(component, key, value)` triples, failing on
/// the first component without an `=`.
pub fn port_map_components<'a>(
    expression: &'a str,
) -> impl Iterator<Item = Result<(&'a str, &'a str, &'a str), ParseError>> + 'a {
    expression.trim().split(',').map(|component| {
        component
            .split_once('=')
            .map(|(key, value)| (component, key, value))
            .ok_or_else(|| ParseError::MalformedExpression(component.to_owned()))
    })
}

pub fn parse_port_number(component: &str, value: &str) -> Result<i64, ParseError> {
    value
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidPortNumber(component.to_owned()))
}

/// Parses `k1=v1,k2=v2` into a map. Duplicate keys keep the last value.
///
/// This is the strict form: every value must be an integer, whatever its key.
/// Task definitions are built from `port_map_components` instead, so unknown
/// keys can be dropped without parsing their value.
pub fn parse_port_map(expression: &str) -> Result<HashMap<String, i64>, ParseError> {
    let mut map = HashMap::new();

    for component in port_map_components(expression) {
        let (component, key, value) = component?;
        map.insert(key.to_owned(), parse_port_number(component, value)?);
    }

    Ok(map)
}

/// Parses a `KEY=VALUE` environment expression into a trimmed pair.
/// Only the first `=` splits, so values may contain `=`.
pub fn parse_environment_pair(expression: &str) -> Result<(String, String), ParseError> {
    let (name, value) = expression
        .split_once('=')
        .ok_or_else(|| ParseError::MalformedExpression(expression.to_owned()))?;

    Ok((name.trim().to_owned(), value.trim().to_owned()))
}

/// Parses `"<minimumHealthyPercent> <maximumPercent>"`.
pub fn parse_deployment_policy(expression: &str) -> Result<(i64, i64), ParseError> {
    let (minimum_healthy, maximum) = expression
        .trim()
        .split_once(' ')
        .ok_or_else(|| ParseError::MalformedExpression(expression.to_owned()))?;

    let minimum_healthy_percent = minimum_healthy
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidPolicyNumber(minimum_healthy.to_owned()))?;

    let maximum_percent = maximum
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidPolicyNumber(maximum.to_owned()))?;

    Ok((minimum_healthy_percent, maximum_percent))
}
