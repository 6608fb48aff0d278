//! Builds scene-graph nodes from loosely typed scene descriptions.
//!
//! A description is a string-keyed JSON mapping. [`NodeBuilder::create_node`] turns one
//! into a [`Node`] inside a [`Scene`], loading referenced glTF or native scene files
//! through a [`ModelResolver`].

pub mod color;
pub mod config;
pub mod description;
pub mod error;
pub mod geometry;
pub mod light;
pub mod model;
pub mod model_resolver;
pub mod node_builder;
pub mod physics;
pub mod reference;
pub mod scene_graph;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_support;

pub use config::BridgeConfig;
pub use description::{Description, FieldPolicy};
pub use error::{BuildError, BuildResult};
pub use geometry::{build_geometry, ComputeDevice, Geometry};
pub use light::{LightType, PlatformVersion};
pub use model_resolver::{is_gltf_file, ModelLocations, ModelResolver};
pub use node_builder::{NodeBuilder, NodeKind};
pub use scene_graph::{Node, NodeId, Scene};
