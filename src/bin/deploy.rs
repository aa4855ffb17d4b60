use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ecs_deploy::{config::DeploymentConfig, deployer::Deployer, ecs::EcsClient};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Deploy using flags or PLUGIN_* environment variables.
    Exec(ExecArgs),
    /// Deploy using a YAML file containing the deployment configuration.
    Apply {
        /// Path to the deployment configuration file.
        #[arg(short)]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ExecArgs {
    #[arg(long, env = "PLUGIN_ACCESS_KEY", default_value = "")]
    access_key: String,
    #[arg(long, env = "PLUGIN_SECRET_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,
    /// Falls back to the default region chain when empty.
    #[arg(long, env = "PLUGIN_REGION", default_value = "")]
    region: String,
    /// Task definition family.
    #[arg(long, env = "PLUGIN_FAMILY")]
    family: String,
    #[arg(long, env = "PLUGIN_TASK_ROLE_ARN", default_value = "")]
    task_role_arn: String,
    #[arg(long, env = "PLUGIN_SERVICE", default_value = "")]
    service: String,
    /// Defaults to <FAMILY>-container.
    #[arg(long, env = "PLUGIN_CONTAINER_NAME", default_value = "")]
    container_name: String,
    #[arg(long, env = "PLUGIN_DOCKER_IMAGE")]
    docker_image: String,
    #[arg(long, env = "PLUGIN_TAG", default_value = "latest")]
    tag: String,
    #[arg(long, env = "PLUGIN_CLUSTER", default_value = "")]
    cluster: String,
    /// "<minimumHealthyPercent> <maximumPercent>"
    #[arg(long, env = "PLUGIN_DEPLOYMENT_CONFIGURATION", default_value = "")]
    deployment_configuration: String,
    /// "container=<port>,host=<port>", repeatable.
    #[arg(long = "port-mapping", env = "PLUGIN_PORT_MAPPINGS", value_delimiter = ';')]
    port_mappings: Vec<String>,
    /// "KEY=VALUE", repeatable.
    #[arg(long = "environment", env = "PLUGIN_ENVIRONMENT_VARIABLES", value_delimiter = ';')]
    environment: Vec<String>,
    #[arg(long, env = "PLUGIN_DESIRED_COUNT", default_value_t = 0)]
    desired_count: i64,
    #[arg(long, env = "PLUGIN_CPU", default_value_t = 0)]
    cpu: i64,
    #[arg(long, env = "PLUGIN_MEMORY", default_value_t = 0)]
    memory: i64,
    #[arg(long, env = "PLUGIN_MEMORY_RESERVATION", default_value_t = 0)]
    memory_reservation: i64,
    #[arg(long, env = "DRONE_YAML_VERIFIED")]
    verified: bool,
    /// Do not print the remote responses.
    #[arg(long, env = "PLUGIN_DISCREET")]
    discreet: bool,
    /// Register the task definition without updating the service.
    #[arg(long, env = "PLUGIN_NO_SERVICE_UPDATE")]
    skip_service_update: bool,
}

impl From<ExecArgs> for DeploymentConfig {
    fn from(input: ExecArgs) -> Self {
        Self {
            access_key: input.access_key,
            secret_key: input.secret_key.into(),
            region: input.region,
            family: input.family,
            task_role_arn: input.task_role_arn,
            service: input.service,
            container_name: input.container_name,
            docker_image: input.docker_image,
            tag: input.tag,
            cluster: input.cluster,
            deployment_configuration: input.deployment_configuration,
            port_mappings: input.port_mappings,
            environment: input.environment,
            desired_count: input.desired_count,
            cpu: input.cpu,
            memory: input.memory,
            memory_reservation: input.memory_reservation,
            verified: input.verified,
            discreet: input.discreet,
            skip_service_update: input.skip_service_update,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Exec(args) => {
            let config = DeploymentConfig::from(args);
            config.validate()?;
            config
        }
        Commands::Apply { file } => DeploymentConfig::from_file(&file).await?,
    };

    info!("starting ECS deployment");

    let deployer = Deployer::new(Box::new(EcsClient::from_config(&config).await));
    let result = deployer.exec(&config).await;

    info!("ECS deployment finished");

    result.map(|_| ())
}
