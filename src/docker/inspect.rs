use async_trait::async_trait;
use bollard::container::InspectContainerOptions;
use bollard::models::{ContainerInspectResponse, ImageInspect};
use bollard::Docker;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("failed to connect to the Docker daemon: {0}")]
    Connect(#[source] bollard::errors::Error),

    #[error("failed to inspect container '{name}': {source}")]
    Container {
        name: String,
        #[source]
        source: bollard::errors::Error,
    },

    #[error("failed to inspect image '{reference}': {source}")]
    Image {
        reference: String,
        #[source]
        source: bollard::errors::Error,
    },
}

/// Read-only source of container and image inspection records.
///
/// The reconstruction logic only ever sees these two snapshots, so tests can
/// feed it synthetic records without a daemon.
#[async_trait]
pub trait InspectSource {
    async fn container(&self, name: &str) -> Result<ContainerInspectResponse, InspectError>;

    async fn image(&self, reference: &str) -> Result<ImageInspect, InspectError>;
}

pub struct DockerInspector {
    docker: Docker,
}

impl DockerInspector {
    pub fn connect() -> Result<Self, InspectError> {
        let docker = Docker::connect_with_local_defaults().map_err(InspectError::Connect)?;

        Ok(DockerInspector { docker })
    }
}

#[async_trait]
impl InspectSource for DockerInspector {
    async fn container(&self, name: &str) -> Result<ContainerInspectResponse, InspectError> {
        self.docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|source| InspectError::Container {
                name: name.to_string(),
                source,
            })
    }

    async fn image(&self, reference: &str) -> Result<ImageInspect, InspectError> {
        self.docker
            .inspect_image(reference)
            .await
            .map_err(|source| InspectError::Image {
                reference: reference.to_string(),
                source,
            })
    }
}
