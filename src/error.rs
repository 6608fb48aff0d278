use std::path::PathBuf;

use thiserror::Error;

use crate::scene_graph::NodeId;

/// Errors raised while turning a description into scene nodes.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Missing required field `{0}`")]
    MissingField(String),

    #[error("Field `{key}` has the wrong type, expected {expected}")]
    InvalidField { key: String, expected: &'static str },

    #[error("Invalid physics body type code: {0}")]
    InvalidPhysicsBodyType(i64),

    #[error("Unknown geometry type: {0}")]
    UnknownGeometry(String),

    #[error("Geometry `{0}` needs a compute device with face tracking support")]
    DeviceRequired(String),

    #[error("Model not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error("Failed to load glTF model {}: {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("glTF model {} has no scenes", .0.display())]
    EmptyModel(PathBuf),

    #[error("Failed to parse scene file {}: {source}", .path.display())]
    NativeScene {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
}

impl BuildError {
    /// True for errors caused by the description itself rather than by the files it refers to.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            BuildError::MissingField(_)
                | BuildError::InvalidField { .. }
                | BuildError::InvalidPhysicsBodyType(_)
                | BuildError::UnknownGeometry(_)
                | BuildError::DeviceRequired(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BuildError::ResourceNotFound(_))
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
