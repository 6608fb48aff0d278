use glam::Vec3;
use serde_json::Value;

use crate::color::Color;
use crate::description::Description;
use crate::error::{BuildError, BuildResult};
use crate::model::ModelId;

/// Capability handle for geometry that needs the rendering device.
pub trait ComputeDevice {
    fn name(&self) -> &str;

    fn supports_face_tracking(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Box {
        width: f32,
        height: f32,
        length: f32,
        chamfer_radius: f32,
    },
    Sphere {
        radius: f32,
    },
    Cylinder {
        radius: f32,
        height: f32,
    },
    Cone {
        top_radius: f32,
        bottom_radius: f32,
        height: f32,
    },
    Pyramid {
        width: f32,
        height: f32,
        length: f32,
    },
    Tube {
        inner_radius: f32,
        outer_radius: f32,
        height: f32,
    },
    Torus {
        ring_radius: f32,
        pipe_radius: f32,
    },
    Capsule {
        cap_radius: f32,
        height: f32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Text {
        text: String,
        extrusion_depth: f32,
    },
    Line {
        from: Vec3,
        to: Vec3,
    },
    Face {
        fill_mesh: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingModel {
    #[default]
    Phong,
    Blinn,
    Lambert,
    Constant,
    PhysicallyBased,
    ShadowOnly,
}

impl LightingModel {
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => LightingModel::Phong,
            1 => LightingModel::Blinn,
            2 => LightingModel::Lambert,
            3 => LightingModel::Constant,
            4 => LightingModel::PhysicallyBased,
            5 => LightingModel::ShadowOnly,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub diffuse: Color,
    pub transparency: f32,
    pub double_sided: bool,
    pub lighting_model: LightingModel,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::WHITE,
            transparency: 1.0,
            double_sided: false,
            lighting_model: LightingModel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Primitive { shape: Shape, materials: Vec<Material> },
    Mesh(ModelId),
}

impl Geometry {
    pub fn shape(&self) -> Option<&Shape> {
        match self {
            Geometry::Primitive { shape, .. } => Some(shape),
            Geometry::Mesh(_) => None,
        }
    }
}

impl From<Shape> for Geometry {
    fn from(shape: Shape) -> Self {
        Geometry::Primitive {
            shape,
            materials: Vec::new(),
        }
    }
}

/// Builds a primitive geometry from its description, dispatching on `dartType`.
pub fn build_geometry(
    description: &Description,
    device: Option<&dyn ComputeDevice>,
) -> BuildResult<Geometry> {
    let dart_type = description.require_str("dartType")?;
    let number = |key: &str, default: f32| -> BuildResult<f32> {
        Ok(description.get_f32(key)?.unwrap_or(default))
    };

    let shape = match dart_type {
        "ARKitBox" => Shape::Box {
            width: number("width", 1.0)?,
            height: number("height", 1.0)?,
            length: number("length", 1.0)?,
            chamfer_radius: number("chamferRadius", 0.0)?,
        },
        "ARKitSphere" => Shape::Sphere {
            radius: number("radius", 0.5)?,
        },
        "ARKitCylinder" => Shape::Cylinder {
            radius: number("radius", 0.5)?,
            height: number("height", 1.0)?,
        },
        "ARKitCone" => Shape::Cone {
            top_radius: number("topRadius", 0.0)?,
            bottom_radius: number("bottomRadius", 0.5)?,
            height: number("height", 1.0)?,
        },
        "ARKitPyramid" => Shape::Pyramid {
            width: number("width", 1.0)?,
            height: number("height", 1.0)?,
            length: number("length", 1.0)?,
        },
        "ARKitTube" => Shape::Tube {
            inner_radius: number("innerRadius", 0.25)?,
            outer_radius: number("outerRadius", 0.5)?,
            height: number("height", 1.0)?,
        },
        "ARKitTorus" => Shape::Torus {
            ring_radius: number("ringRadius", 0.5)?,
            pipe_radius: number("pipeRadius", 0.25)?,
        },
        "ARKitCapsule" => Shape::Capsule {
            cap_radius: number("capRadius", 0.5)?,
            height: number("height", 2.0)?,
        },
        "ARKitPlane" => Shape::Plane {
            width: number("width", 1.0)?,
            height: number("height", 1.0)?,
        },
        "ARKitText" => Shape::Text {
            text: description.get_str("text")?.unwrap_or_default().to_string(),
            extrusion_depth: number("extrusionDepth", 1.0)?,
        },
        "ARKitLine" => Shape::Line {
            from: vector(description, "fromVector")?,
            to: vector(description, "toVector")?,
        },
        "ARKitFace" => {
            match device {
                Some(device) if device.supports_face_tracking() => {
                    log::debug!("Building face geometry on {}", device.name());
                }
                _ => return Err(BuildError::DeviceRequired(dart_type.to_string())),
            }
            Shape::Face {
                fill_mesh: description.get_bool("fillMesh")?.unwrap_or(false),
            }
        }
        other => return Err(BuildError::UnknownGeometry(other.to_string())),
    };

    let materials = match description.get_array("materials")? {
        Some(items) => items
            .iter()
            .map(|item| build_material(item, description))
            .collect::<BuildResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(Geometry::Primitive { shape, materials })
}

fn vector(description: &Description, key: &str) -> BuildResult<Vec3> {
    Ok(description
        .get_f32_array_exact::<3>(key)?
        .map(Vec3::from_array)
        .unwrap_or(Vec3::ZERO))
}

fn build_material(item: &Value, parent: &Description) -> BuildResult<Material> {
    let description = Description::from_value(item.clone())?.with_policy(parent.policy());
    let mut material = Material::default();

    if let Some(diffuse) = description.get_map("diffuse")? {
        if let Some(color) = diffuse.get_i64("color")? {
            material.diffuse = Color::from_packed_rgb(color as u32);
        }
    }
    if let Some(transparency) = description.get_f32("transparency")? {
        material.transparency = transparency;
    }
    if let Some(double_sided) = description.get_bool("doubleSided")? {
        material.double_sided = double_sided;
    }
    if let Some(code) = description.get_i64("lightingModelName")? {
        match LightingModel::from_code(code) {
            Some(model) => material.lighting_model = model,
            None => log::warn!("Unknown lighting model code {code}, keeping default"),
        }
    }

    Ok(material)
}
