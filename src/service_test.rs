#[cfg(test)]
mod service_update_request_tests {
    use crate::config::DeploymentConfig;
    use crate::parse::ParseError;
    use crate::service::{DeploymentPolicy, ServiceUpdateRequest};

    const TASK_DEFINITION_ARN: &str = "arn:aws:ecs:eu-west-1:123456789012:task-definition/web:7";

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            family: "web".to_owned(),
            docker_image: "acme/web".to_owned(),
            cluster: "production".to_owned(),
            service: "web-service".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn targets_the_registered_task_definition() {
        let request = ServiceUpdateRequest::new(&config(), TASK_DEFINITION_ARN, None);

        assert_eq!(
            ServiceUpdateRequest {
                cluster: "production".to_owned(),
                service: "web-service".to_owned(),
                task_definition: TASK_DEFINITION_ARN.to_owned(),
                desired_count: None,
                deployment_configuration: None,
            },
            request
        );
    }

    #[test]
    fn sets_desired_count_when_configured() {
        let config = DeploymentConfig {
            desired_count: 3,
            ..config()
        };

        let request = ServiceUpdateRequest::new(&config, TASK_DEFINITION_ARN, None);

        assert_eq!(Some(3), request.desired_count);
    }

    #[test]
    fn empty_policy_leaves_deployment_configuration_unset() {
        assert_eq!(Ok(None), DeploymentPolicy::from_config(&config()));
    }

    #[test]
    fn parses_policy_when_configured() {
        let config = DeploymentConfig {
            deployment_configuration: "50 200".to_owned(),
            ..config()
        };

        assert_eq!(
            Ok(Some(DeploymentPolicy {
                minimum_healthy_percent: 50,
                maximum_percent: 200,
            })),
            DeploymentPolicy::from_config(&config)
        );
    }

    #[test]
    fn malformed_policy_is_an_error() {
        let config = DeploymentConfig {
            deployment_configuration: "50".to_owned(),
            ..config()
        };

        assert_eq!(
            Err(ParseError::MalformedExpression("50".to_owned())),
            DeploymentPolicy::from_config(&config)
        );
    }
}
