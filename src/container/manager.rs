use bollard::container::ListContainersOptions;
use bollard::Docker;
use std::collections::HashMap;
use crate::errors::HarnessError;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerStatus {
    Running,
    Stopped,
    NotFound,
}

/// Handle on the already-running container that hosts the target API.
///
/// The harness never creates or starts this container; it only checks that
/// it is up and executes commands inside it.
pub struct TargetContainer {
    docker: Docker,
    container_name: String,
}

impl TargetContainer {
    pub fn connect(container_name: &str) -> Result<Self, HarnessError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| HarnessError::Container(format!("Failed to connect to Docker: {}", e)))?;

        Ok(Self {
            docker,
            container_name: container_name.to_string(),
        })
    }

    pub async fn status(&self) -> ContainerStatus {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![self.container_name.clone()]);

        let options = ListContainersOptions {
            all: true,
            filters,
            ..Default::default()
        };

        match self.docker.list_containers(Some(options)).await {
            Ok(containers) => {
                let target = format!("/{}", self.container_name);
                for container in &containers {
                    if let Some(names) = &container.names {
                        if names.iter().any(|n| n == &target) {
                            return match container.state.as_deref() {
                                Some("running") => ContainerStatus::Running,
                                _ => ContainerStatus::Stopped,
                            };
                        }
                    }
                }
                ContainerStatus::NotFound
            }
            Err(_) => ContainerStatus::NotFound,
        }
    }

    /// Fail unless the target container is running.
    pub async fn ensure_running(&self) -> Result<(), HarnessError> {
        match self.status().await {
            ContainerStatus::Running => {
                info!(container = %self.container_name, "Target container is running");
                Ok(())
            }
            ContainerStatus::Stopped => Err(HarnessError::Container(format!(
                "Container '{}' exists but is not running. Start it with: docker start {}",
                self.container_name, self.container_name
            ))),
            ContainerStatus::NotFound => Err(HarnessError::Container(format!(
                "Container '{}' not found. Rerun with --no-container to probe directly",
                self.container_name
            ))),
        }
    }

    pub fn docker(&self) -> &Docker {
        &self.docker
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }
}
