use glam::Vec3;
use id_arena::Id;

use crate::geometry::Geometry;
use crate::light::Light;
use crate::physics::PhysicsBody;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<Node>;

pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub geometry: Option<Geometry>,
    pub physics_body: Option<PhysicsBody>,
    pub light: Option<Light>,
    pub rendering_order: i64,
    pub is_hidden: bool,
    pub parent_id: Option<NodeId>,
    pub child_ids: Vec<NodeId>,
}

impl Node {
    pub fn with_geometry(geometry: Option<Geometry>) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene) -> impl Iterator<Item = &'b Node> + 'b
    where
        'a: 'b,
    {
        self.child_ids.iter().filter_map(move |id| scene.get_node(*id))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: None,
            transform: Transform::from_translation(Vec3::ZERO),
            geometry: None,
            physics_body: None,
            light: None,
            rendering_order: 0,
            is_hidden: false,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
