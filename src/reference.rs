use std::path::Path;

use glam::{Mat4, Vec3};
use serde::Deserialize;

use crate::error::{BuildError, BuildResult};
use crate::model::Model;
use crate::model_resolver::{is_gltf_file, ModelResolver};
use crate::scene_graph::{Node, NodeId, Scene};

/// Uniform scale applied to every root node of an imported glTF scene.
pub const GLTF_IMPORT_SCALE: f32 = 0.01;

/// Resolves `url` and loads the model it names into `scene`.
///
/// Returns a fresh parent node holding the model's root nodes.
pub fn load_reference_node(
    scene: &mut Scene,
    resolver: &ModelResolver,
    url: &str,
) -> BuildResult<NodeId> {
    let resolved = resolver.resolve(url);

    if is_gltf_file(url) {
        load_gltf_node(scene, &resolved.path)
    } else {
        load_native_node(scene, &resolved.path)
    }
}

pub fn load_gltf_node(scene: &mut Scene, path: &Path) -> BuildResult<NodeId> {
    if !path.is_file() {
        log::error!("glTF model not found: {}", path.display());
        return Err(BuildError::ResourceNotFound(path.to_path_buf()));
    }

    let (document, buffers, _images) = gltf::import(path).map_err(|source| {
        log::error!("Failed to import {}: {source}", path.display());
        BuildError::ModelLoad {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| BuildError::EmptyModel(path.to_path_buf()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Everything fallible happens above; the scene is only touched from here on
    let mesh_models: Vec<_> = document
        .meshes()
        .map(|mesh| {
            let mesh_name = mesh
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("Mesh {} ({})", mesh.index(), file_name));
            scene.add_model(Model::from_gltf(mesh_name, mesh, &buffers))
        })
        .collect();

    let parent = scene.add_node(Node::default());
    let roots = scene.spawn_gltf_scene(&gltf_scene, &mesh_models, parent);
    for &root in &roots {
        scene.set_node_scale(root, Vec3::splat(GLTF_IMPORT_SCALE));
    }

    log::info!(
        "Loaded {} with {} root node(s) from {}",
        file_name,
        roots.len(),
        path.display()
    );

    Ok(parent)
}

/// Node tree stored in the engine's own scene files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NativeSceneFile {
    #[serde(default)]
    nodes: Vec<NativeNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NativeNode {
    name: Option<String>,
    transform: Option<[f32; 16]>,
    #[serde(default)]
    is_hidden: bool,
    #[serde(default)]
    rendering_order: i64,
    #[serde(default)]
    children: Vec<NativeNode>,
}

/// Loads a native scene file synchronously.
pub fn load_native_node(scene: &mut Scene, path: &Path) -> BuildResult<NodeId> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            BuildError::ResourceNotFound(path.to_path_buf())
        } else {
            BuildError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let file: NativeSceneFile =
        serde_json::from_str(&contents).map_err(|source| BuildError::NativeScene {
            path: path.to_path_buf(),
            source,
        })?;

    let parent = scene.add_node(Node::default());
    for node in &file.nodes {
        spawn_native_node(scene, node, parent);
    }

    log::info!(
        "Loaded scene {} with {} root node(s)",
        path.display(),
        file.nodes.len()
    );

    Ok(parent)
}

fn spawn_native_node(scene: &mut Scene, source: &NativeNode, parent: NodeId) -> NodeId {
    let mut node = Node::default();
    node.name = source.name.clone();
    node.is_hidden = source.is_hidden;
    node.rendering_order = source.rendering_order;
    if let Some(transform) = source.transform {
        node.transform.set_matrix(Mat4::from_cols_array(&transform));
    }

    let id = scene.add_node(node);
    scene.set_node_parent(id, Some(parent));

    for child in &source.children {
        spawn_native_node(scene, child, id);
    }

    id
}
