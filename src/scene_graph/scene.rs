use glam::{Mat4, Vec3};
use id_arena::Arena;

use crate::error::{BuildError, BuildResult};
use crate::geometry::Geometry;
use crate::model::{Model, ModelId};
use crate::scene_graph::node::{Node, NodeId};

pub struct Scene {
    nodes: Arena<Node>,
    models: Arena<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            models: Arena::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.alloc(node)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: NodeId) -> BuildResult<&Node> {
        self.get_node(id).ok_or(BuildError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> BuildResult<&mut Node> {
        self.get_node_mut(id).ok_or(BuildError::UnknownNode(id))
    }

    pub fn get_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_model(&mut self, model: Model) -> ModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    /// Instantiates every root node of a glTF scene under `parent`.
    ///
    /// `mesh_models` maps glTF mesh indices to models already added to this scene.
    /// Returns the ids of the instantiated root nodes in document order.
    pub fn spawn_gltf_scene(
        &mut self,
        scene: &gltf::Scene,
        mesh_models: &[ModelId],
        parent: NodeId,
    ) -> Vec<NodeId> {
        scene
            .nodes()
            .map(|node| self.spawn_gltf_node(&node, mesh_models, parent))
            .collect()
    }

    fn spawn_gltf_node(
        &mut self,
        node: &gltf::Node,
        mesh_models: &[ModelId],
        parent: NodeId,
    ) -> NodeId {
        let mut object = Node::default();
        object.name = node.name().map(String::from);
        object
            .transform
            .set_matrix(Mat4::from_cols_array_2d(&node.transform().matrix()));
        object.geometry = node
            .mesh()
            .and_then(|mesh| mesh_models.get(mesh.index()).copied())
            .map(Geometry::Mesh);

        let object_id = self.add_node(object);
        self.set_node_parent(object_id, Some(parent));

        for child in node.children() {
            self.spawn_gltf_node(&child, mesh_models, object_id);
        }

        object_id
    }

    /// Updates all node transforms in hierarchical order
    pub fn update_transforms(&self) {
        let root_nodes = self
            .nodes
            .iter()
            .filter_map(|(id, node)| node.parent_id.is_none().then_some(id));

        for root_id in root_nodes {
            self.update_node_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_node_transform_recursive(&self, node_id: NodeId, parent_world_matrix: Mat4) {
        if let Some(node) = self.nodes.get(node_id) {
            if node.transform.is_world_dirty() {
                let local_matrix = node.transform.local_matrix();
                node.transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *node.transform.world_matrix();
            for &child_id in &node.child_ids {
                self.update_node_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// World matrix of a node, recomputed from its ancestors.
    pub fn world_matrix(&self, node_id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(node_id)?;
        let local = node.transform.local_matrix();
        match node.parent_id {
            Some(parent_id) => Some(self.world_matrix(parent_id)? * local),
            None => Some(local),
        }
    }

    /// Invalidates world transforms for a node and all its descendants
    pub fn invalidate_node_hierarchy(&self, node_id: NodeId) {
        if let Some(node) = self.nodes.get(node_id) {
            node.transform.invalidate_world();

            for &child_id in &node.child_ids {
                self.invalidate_node_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of a node and updates child relationships
    pub fn set_node_parent(&mut self, child_id: NodeId, new_parent_id: Option<NodeId>) {
        if let Some(old_parent_id) = self.nodes.get(child_id).and_then(|child| child.parent_id) {
            if let Some(old_parent) = self.nodes.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.nodes.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }

        self.invalidate_node_hierarchy(child_id);
    }

    pub fn set_node_matrix(&mut self, node_id: NodeId, matrix: Mat4) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.transform.set_matrix(matrix);
        }
        self.invalidate_node_hierarchy(node_id);
    }

    pub fn set_node_scale(&mut self, node_id: NodeId, scale: Vec3) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.transform.set_scale(scale);
        }
        self.invalidate_node_hierarchy(node_id);
    }

    /// Depth-first walk yielding each node with its depth below `root`.
    pub fn walk(&self, root: NodeId) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, root)];
        while let Some((depth, id)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push((depth, id));
            stack.extend(node.child_ids.iter().rev().map(|&child| (depth + 1, child)));
        }
        out
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
