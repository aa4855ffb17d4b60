use anyhow::Result;
use std::io::Write;

#[cfg(test)]
mod config_from_file_tests {
    use tempfile::NamedTempFile;

    use crate::config::{ConfigError, DeploymentConfig};

    use super::*;

    #[tokio::test]
    async fn reads_deployment_config() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            &mut file,
            r#"
region: eu-west-1
family: web
cluster: production
service: web-service
docker_image: acme/web
tag: v3
port_mappings:
  - container=80,host=8080
environment:
  - RUST_LOG=info
desired_count: 2
memory: 256
"#
        )?;

        let config = DeploymentConfig::from_file(file.path()).await?;

        assert_eq!("web", config.family);
        assert_eq!("acme/web:v3", config.image_reference());
        assert_eq!(vec!["container=80,host=8080".to_owned()], config.port_mappings);
        assert_eq!(vec!["RUST_LOG=info".to_owned()], config.environment);
        assert_eq!(2, config.desired_count);
        assert_eq!(256, config.memory);
        assert_eq!(0, config.memory_reservation);
        assert!(!config.skip_service_update);

        Ok(())
    }

    #[tokio::test]
    async fn family_is_required() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            &mut file,
            r#"
cluster: production
service: web-service
docker_image: acme/web
"#
        )?;

        let error = DeploymentConfig::from_file(file.path()).await.unwrap_err();

        assert_eq!(
            ConfigError::MissingField("family".to_owned()),
            error.downcast()?
        );

        Ok(())
    }

    #[tokio::test]
    async fn service_is_not_required_when_service_update_is_skipped() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            &mut file,
            r#"
family: web
docker_image: acme/web
skip_service_update: true
"#
        )?;

        assert!(DeploymentConfig::from_file(file.path()).await.is_ok());

        Ok(())
    }
}

#[cfg(test)]
mod deployment_config_tests {
    use crate::config::{ConfigError, DeploymentConfig, SecretString};

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            family: "app".to_owned(),
            docker_image: "acme/app".to_owned(),
            cluster: "default".to_owned(),
            service: "app-service".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn cluster_is_required_for_service_update() {
        let config = DeploymentConfig {
            cluster: String::new(),
            ..config()
        };

        assert_eq!(
            Err(ConfigError::MissingField("cluster".to_owned())),
            config.validate()
        );
    }

    #[test]
    fn container_name_defaults_to_family() {
        assert_eq!("app-container", config().container_name());

        let config = DeploymentConfig {
            container_name: "sidecar".to_owned(),
            ..config()
        };

        assert_eq!("sidecar", config.container_name());
    }

    #[test]
    fn static_credentials_need_both_key_and_secret() {
        let only_key = DeploymentConfig {
            access_key: "AKIA".to_owned(),
            ..config()
        };
        assert_eq!(None, only_key.static_credentials());

        let both = DeploymentConfig {
            access_key: "AKIA".to_owned(),
            secret_key: SecretString::new("shh"),
            ..config()
        };
        assert_eq!(Some(("AKIA", "shh")), both.static_credentials());
    }

    #[test]
    fn secret_key_is_redacted_in_debug_output() {
        let config = DeploymentConfig {
            secret_key: SecretString::new("super-secret"),
            ..config()
        };

        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
