pub mod client;
pub mod config;
pub mod deployer;
pub mod ecs;
pub mod parse;
pub mod service;
pub mod task;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod service_test;
