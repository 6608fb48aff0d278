use glam::Mat4;

use crate::config::BridgeConfig;
use crate::description::Description;
use crate::error::BuildResult;
use crate::geometry::{ComputeDevice, Geometry};
use crate::light::{build_light, Light, PlatformVersion};
use crate::model_resolver::ModelResolver;
use crate::physics::{build_physics_body, PhysicsBody};
use crate::reference::load_reference_node;
use crate::scene_graph::{Node, NodeId, Scene};

/// What kind of node a description asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Content loaded from a model file named by `url`.
    Reference { url: String },
    /// A node wrapping the caller's geometry, if any.
    Plain,
}

impl NodeKind {
    pub const REFERENCE_TAG: &'static str = "ARKitReferenceNode";

    pub fn from_description(description: &Description) -> BuildResult<Self> {
        match description.require_str("dartType")? {
            Self::REFERENCE_TAG => Ok(NodeKind::Reference {
                url: description.require_str("url")?.to_string(),
            }),
            _ => Ok(NodeKind::Plain),
        }
    }
}

/// Properties a description sets on a node. `None` leaves the node's value alone.
#[derive(Debug, Default)]
pub struct NodeUpdate {
    pub transform: Option<Mat4>,
    pub name: Option<String>,
    pub physics_body: Option<PhysicsBody>,
    pub light: Option<Light>,
    pub rendering_order: Option<i64>,
    pub is_hidden: Option<bool>,
}

impl NodeUpdate {
    pub fn parse(
        description: &Description,
        device: Option<&dyn ComputeDevice>,
        platform: PlatformVersion,
    ) -> BuildResult<Self> {
        let physics_body = match description.get_map("physicsBody")? {
            Some(physics) => Some(build_physics_body(&physics, device)?),
            None => None,
        };
        let light = match description.get_map("light")? {
            Some(light) => Some(build_light(&light, platform)?),
            None => None,
        };

        Ok(Self {
            // Column-major, translation in elements 12..14
            transform: description
                .get_f32_array_exact::<16>("transform")?
                .map(|matrix| Mat4::from_cols_array(&matrix)),
            name: description.get_str("name")?.map(String::from),
            physics_body,
            light,
            rendering_order: description.get_i64("renderingOrder")?,
            is_hidden: description.get_bool("isHidden")?,
        })
    }

    pub fn apply(self, scene: &mut Scene, id: NodeId) -> BuildResult<()> {
        let node = scene.node_mut(id)?;

        if let Some(name) = self.name {
            node.name = Some(name);
        }
        if let Some(physics_body) = self.physics_body {
            node.physics_body = Some(physics_body);
        }
        if let Some(light) = self.light {
            node.light = Some(light);
        }
        if let Some(rendering_order) = self.rendering_order {
            node.rendering_order = rendering_order;
        }
        if let Some(is_hidden) = self.is_hidden {
            node.is_hidden = is_hidden;
        }
        if let Some(transform) = self.transform {
            scene.set_node_matrix(id, transform);
        }

        Ok(())
    }
}

/// Creates and updates scene nodes from descriptions.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    resolver: ModelResolver,
    platform: PlatformVersion,
}

impl NodeBuilder {
    pub fn new(resolver: ModelResolver, platform: PlatformVersion) -> Self {
        Self { resolver, platform }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(ModelResolver::new(config.models.clone()), config.platform)
    }

    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    /// Builds one node from `description` and returns its id.
    ///
    /// Reference nodes load their model and ignore `geometry`. The description is fully
    /// validated before anything is added to the scene.
    pub fn create_node(
        &self,
        scene: &mut Scene,
        geometry: Option<Geometry>,
        description: &Description,
        device: Option<&dyn ComputeDevice>,
    ) -> BuildResult<NodeId> {
        let kind = NodeKind::from_description(description)?;
        let update = NodeUpdate::parse(description, device, self.platform)?;

        let id = match kind {
            NodeKind::Reference { url } => {
                if geometry.is_some() {
                    log::debug!("Ignoring supplied geometry for reference node {url}");
                }
                load_reference_node(scene, &self.resolver, &url)?
            }
            NodeKind::Plain => scene.add_node(Node::with_geometry(geometry)),
        };

        update.apply(scene, id)?;
        Ok(id)
    }

    /// Applies the properties present in `description` to an existing node.
    pub fn update_node(
        &self,
        scene: &mut Scene,
        id: NodeId,
        description: &Description,
        device: Option<&dyn ComputeDevice>,
    ) -> BuildResult<()> {
        scene.node(id)?;
        NodeUpdate::parse(description, device, self.platform)?.apply(scene, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::FieldPolicy;
    use crate::error::BuildError;
    use crate::geometry::Shape;
    use crate::light::LightType;
    use crate::model_resolver::ModelLocations;
    use crate::physics::{category, PhysicsBodyType};
    use crate::reference::GLTF_IMPORT_SCALE;
    use crate::test_support::{glb_from_json, TempDir, TWO_ROOT_GLTF};
    use glam::Vec3;
    use serde_json::{json, Value};

    fn describe(value: Value) -> Description {
        Description::from_value(value).unwrap()
    }

    fn sphere() -> Geometry {
        Shape::Sphere { radius: 0.1 }.into()
    }

    #[test]
    fn plain_node_wraps_geometry_and_applies_fields() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                Some(sphere()),
                &describe(json!({
                    "dartType": "ARKitNode",
                    "name": "ball",
                    "renderingOrder": 5,
                    "isHidden": true,
                    "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 1,2,3,1],
                    "light": { "type": 2 },
                    "physicsBody": { "type": 1 },
                    "somethingElse": [1, 2, 3]
                })),
                None,
            )
            .unwrap();

        let node = scene.get_node(id).unwrap();
        assert_eq!(node.geometry, Some(sphere()));
        assert_eq!(node.name.as_deref(), Some("ball"));
        assert_eq!(node.rendering_order, 5);
        assert!(node.is_hidden);
        assert_eq!(node.transform.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(node.light.as_ref().unwrap().light_type, LightType::Directional);
        assert_eq!(
            node.physics_body.as_ref().unwrap().body_type,
            PhysicsBodyType::Dynamic
        );
    }

    #[test]
    fn absent_keys_leave_existing_values() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({
                    "dartType": "ARKitNode",
                    "name": "keep",
                    "renderingOrder": 2,
                    "isHidden": true,
                    "light": { "type": 0 },
                    "physicsBody": { "type": 2, "categoryBitMask": 4 },
                    "transform": [2,0,0,0, 0,2,0,0, 0,0,2,0, 0,0,0,1]
                })),
                None,
            )
            .unwrap();

        builder
            .update_node(&mut scene, id, &describe(json!({})), None)
            .unwrap();

        let node = scene.get_node(id).unwrap();
        assert_eq!(node.name.as_deref(), Some("keep"));
        assert_eq!(node.rendering_order, 2);
        assert!(node.is_hidden);
        assert_eq!(node.light.as_ref().unwrap().light_type, LightType::Ambient);
        let body = node.physics_body.as_ref().unwrap();
        assert_eq!(body.body_type, PhysicsBodyType::Kinematic);
        assert_eq!(body.category_bit_mask, 4);
        assert_eq!(node.transform.scale(), Vec3::splat(2.0));
    }

    #[test]
    fn present_mappings_rebuild_instead_of_merging() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({
                    "dartType": "ARKitNode",
                    "light": { "type": 3, "intensity": 200 },
                    "physicsBody": { "type": 1, "categoryBitMask": 8 }
                })),
                None,
            )
            .unwrap();

        builder
            .update_node(
                &mut scene,
                id,
                &describe(json!({
                    "light": { "type": 2 },
                    "physicsBody": { "type": 0 }
                })),
                None,
            )
            .unwrap();

        let node = scene.get_node(id).unwrap();
        let light = node.light.as_ref().unwrap();
        assert_eq!(light.light_type, LightType::Directional);
        assert_eq!(light.intensity, 1000.0);

        let body = node.physics_body.as_ref().unwrap();
        assert_eq!(body.body_type, PhysicsBodyType::Static);
        assert_eq!(body.category_bit_mask, category::STATIC);
    }

    #[test]
    fn degenerate_matrices_are_stored_exactly() {
        let collapsed: [f32; 16] = [
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, //
            1.0, 2.0, 3.0, 1.0,
        ];
        let sheared: [f32; 16] = [
            1.0, 0.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            4.0, 5.0, 6.0, 1.0,
        ];

        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({ "dartType": "ARKitNode", "transform": collapsed })),
                None,
            )
            .unwrap();
        let local = scene.get_node(id).unwrap().transform.local_matrix();
        assert_eq!(local.to_cols_array(), collapsed);

        builder
            .update_node(&mut scene, id, &describe(json!({ "transform": sheared })), None)
            .unwrap();
        let local = scene.get_node(id).unwrap().transform.local_matrix();
        assert_eq!(local.to_cols_array(), sheared);

        scene.update_transforms();
        assert_eq!(
            scene.get_node(id).unwrap().transform.world_matrix().to_cols_array(),
            sheared
        );
    }

    #[test]
    fn present_keys_overwrite() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({ "dartType": "ARKitNode", "isHidden": true })),
                None,
            )
            .unwrap();

        builder
            .update_node(
                &mut scene,
                id,
                &describe(json!({ "isHidden": false, "name": "renamed" })),
                None,
            )
            .unwrap();

        let node = scene.get_node(id).unwrap();
        assert!(!node.is_hidden);
        assert_eq!(node.name.as_deref(), Some("renamed"));
    }

    #[test]
    fn malformed_fields_are_ignored_when_lenient() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({
                    "dartType": "ARKitNode",
                    "name": 7,
                    "transform": [1, 2, 3],
                    "isHidden": "no"
                })),
                None,
            )
            .unwrap();

        let node = scene.get_node(id).unwrap();
        assert_eq!(node.name, None);
        assert!(!node.is_hidden);
        assert_eq!(node.transform.translation(), Vec3::ZERO);
    }

    #[test]
    fn malformed_fields_fail_when_strict_and_nothing_is_added() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let description = describe(json!({ "dartType": "ARKitNode", "name": 7 }))
            .with_policy(FieldPolicy::Strict);

        let error = builder
            .create_node(&mut scene, None, &description, None)
            .unwrap_err();
        assert!(error.is_invalid_configuration());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn failed_update_leaves_node_untouched() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();
        let id = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({ "dartType": "ARKitNode", "name": "before" })),
                None,
            )
            .unwrap();

        let error = builder
            .update_node(
                &mut scene,
                id,
                &describe(json!({ "name": "after", "physicsBody": { "type": 9 } })),
                None,
            )
            .unwrap_err();
        assert!(matches!(error, BuildError::InvalidPhysicsBodyType(9)));
        assert_eq!(scene.get_node(id).unwrap().name.as_deref(), Some("before"));
    }

    #[test]
    fn missing_required_keys_are_errors() {
        let mut scene = Scene::new();
        let builder = NodeBuilder::default();

        let error = builder
            .create_node(&mut scene, None, &describe(json!({ "name": "x" })), None)
            .unwrap_err();
        assert!(matches!(error, BuildError::MissingField(ref key) if key == "dartType"));

        let error = builder
            .create_node(
                &mut scene,
                None,
                &describe(json!({ "dartType": "ARKitReferenceNode" })),
                None,
            )
            .unwrap_err();
        assert!(matches!(error, BuildError::MissingField(ref key) if key == "url"));
    }

    #[test]
    fn reference_node_ignores_geometry_and_loads_bundle_glb() {
        let bundle = TempDir::new("builder-chair");
        let documents = TempDir::new("builder-chair-docs");
        bundle.write("chair.glb", &glb_from_json(TWO_ROOT_GLTF));

        let builder = NodeBuilder::new(
            ModelResolver::new(ModelLocations {
                documents_dir: Some(documents.path().to_path_buf()),
                bundle_dir: Some(bundle.path().to_path_buf()),
            }),
            PlatformVersion::default(),
        );

        let mut scene = Scene::new();
        let id = builder
            .create_node(
                &mut scene,
                Some(sphere()),
                &describe(json!({
                    "dartType": "ARKitReferenceNode",
                    "url": "chair.glb",
                    "name": "chair"
                })),
                None,
            )
            .unwrap();

        let node = scene.get_node(id).unwrap();
        assert_eq!(node.geometry, None);
        assert_eq!(node.name.as_deref(), Some("chair"));
        assert_eq!(node.child_ids.len(), 2);
        for child in node.children(&scene) {
            assert_eq!(child.transform.scale(), Vec3::splat(GLTF_IMPORT_SCALE));
        }
    }

    #[test]
    fn updating_unknown_node_fails() {
        let mut scene = Scene::new();
        let mut other = Scene::new();
        let foreign = other.add_node(Node::default());

        let id = scene.add_node(Node::default());
        let builder = NodeBuilder::default();
        assert!(builder
            .update_node(&mut scene, foreign, &describe(json!({})), None)
            .is_err());
        assert!(builder
            .update_node(&mut scene, id, &describe(json!({})), None)
            .is_ok());
    }

    #[test]
    fn node_kind_dispatch() {
        assert_eq!(
            NodeKind::from_description(&describe(
                json!({ "dartType": "ARKitReferenceNode", "url": "a.scn" })
            ))
            .unwrap(),
            NodeKind::Reference {
                url: "a.scn".to_string()
            }
        );
        assert_eq!(
            NodeKind::from_description(&describe(json!({ "dartType": "ARKitBox" }))).unwrap(),
            NodeKind::Plain
        );
    }
}
