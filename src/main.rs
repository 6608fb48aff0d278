use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use scene_bridge::{
    build_geometry, BridgeConfig, ComputeDevice, Description, Geometry, NodeBuilder, NodeId,
    Scene,
};

/// Build a scene node from a JSON description and print the resulting hierarchy.
#[derive(Parser, Debug)]
#[command(name = "scene_bridge")]
struct Args {
    /// JSON file holding one node description
    description: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Documents directory, overrides the configuration
    #[arg(long)]
    documents: Option<PathBuf>,

    /// Bundle directory, overrides the configuration
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Pretend the device supports face tracking
    #[arg(long)]
    face_tracking: bool,
}

struct CliDevice {
    face_tracking: bool,
}

impl ComputeDevice for CliDevice {
    fn name(&self) -> &str {
        "cli"
    }

    fn supports_face_tracking(&self) -> bool {
        self.face_tracking
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BridgeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BridgeConfig::default(),
    };
    if let Some(documents) = args.documents {
        config.models.documents_dir = Some(documents);
    }
    if let Some(bundle) = args.bundle {
        config.models.bundle_dir = Some(bundle);
    }

    let json = std::fs::read_to_string(&args.description)
        .with_context(|| format!("Failed to read {}", args.description.display()))?;
    let description = Description::from_json_str(&json)
        .context("Description is not a JSON mapping")?
        .with_policy(config.field_policy);

    let device = CliDevice {
        face_tracking: args.face_tracking,
    };
    let geometry = description
        .get_map("geometry")?
        .map(|geometry| build_geometry(&geometry, Some(&device)))
        .transpose()?;

    let mut scene = Scene::new();
    let builder = NodeBuilder::from_config(&config);
    let root = builder.create_node(&mut scene, geometry, &description, Some(&device))?;
    scene.update_transforms();

    log::info!("Built {} node(s)", scene.node_count());
    print_hierarchy(&scene, root);

    Ok(())
}

fn print_hierarchy(scene: &Scene, root: NodeId) {
    for (depth, id) in scene.walk(root) {
        let Some(node) = scene.get_node(id) else {
            continue;
        };
        let translation = node.transform.world_matrix().w_axis.truncate();

        let mut line = format!(
            "{}{} at {:?}",
            "  ".repeat(depth),
            node.name.as_deref().unwrap_or("<unnamed>"),
            translation.to_array()
        );
        match &node.geometry {
            Some(Geometry::Mesh(model_id)) => {
                if let Some(model) = scene.get_model(*model_id) {
                    line.push_str(&format!(
                        " mesh={} ({} vertices, {} triangles)",
                        model.name,
                        model.vertex_count(),
                        model.triangle_count()
                    ));
                }
            }
            Some(geometry) => line.push_str(&format!(" geometry={geometry:?}")),
            None => {}
        }
        if let Some(light) = &node.light {
            line.push_str(&format!(" light={:?}", light.light_type));
        }
        if let Some(body) = &node.physics_body {
            line.push_str(&format!(" body={:?}", body.body_type));
        }
        if node.is_hidden {
            line.push_str(" hidden");
        }
        println!("{line}");
    }
}
