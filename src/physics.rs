use crate::description::Description;
use crate::error::{BuildError, BuildResult};
use crate::geometry::{build_geometry, ComputeDevice, Geometry};

pub mod category {
    pub const DEFAULT: u64 = 1;
    pub const STATIC: u64 = 1 << 1;
    pub const ALL: u64 = u64::MAX;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsBodyType {
    Static = 0,
    Dynamic = 1,
    Kinematic = 2,
}

impl PhysicsBodyType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PhysicsBodyType::Static),
            1 => Some(PhysicsBodyType::Dynamic),
            2 => Some(PhysicsBodyType::Kinematic),
            _ => None,
        }
    }

    pub fn default_category(self) -> u64 {
        match self {
            PhysicsBodyType::Static => category::STATIC,
            PhysicsBodyType::Dynamic | PhysicsBodyType::Kinematic => category::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsShape {
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub body_type: PhysicsBodyType,
    pub shape: Option<PhysicsShape>,
    pub category_bit_mask: u64,
}

impl PhysicsBody {
    pub fn new(body_type: PhysicsBodyType, shape: Option<PhysicsShape>) -> Self {
        Self {
            body_type,
            shape,
            category_bit_mask: body_type.default_category(),
        }
    }
}

/// Builds a physics body from its `physicsBody` sub-mapping.
///
/// `type` is required; a missing or unknown code is an invalid configuration.
pub fn build_physics_body(
    description: &Description,
    device: Option<&dyn ComputeDevice>,
) -> BuildResult<PhysicsBody> {
    let shape = match description.get_map("shape")? {
        Some(shape) => match shape.get_map("geometry")? {
            Some(geometry) => Some(PhysicsShape {
                geometry: build_geometry(&geometry, device)?,
            }),
            None => None,
        },
        None => None,
    };

    let code = description.require_i64("type")?;
    let body_type =
        PhysicsBodyType::from_code(code).ok_or(BuildError::InvalidPhysicsBodyType(code))?;

    let mut body = PhysicsBody::new(body_type, shape);
    if let Some(mask) = description.get_i64("categoryBitMask")? {
        // Negative masks keep their two's complement bits, so -1 selects every category
        body.category_bit_mask = mask as u64;
    }

    Ok(body)
}
