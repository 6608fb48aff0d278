use serde::Deserialize;

use crate::color::Color;
use crate::description::Description;
use crate::error::BuildResult;

/// Operating system version the scene will be rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct PlatformVersion {
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
}

/// Area lights are unavailable before this version.
pub const AREA_LIGHT_MIN_VERSION: PlatformVersion = PlatformVersion::new(13, 0);

impl PlatformVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn supports_area_lights(self) -> bool {
        self >= AREA_LIGHT_MIN_VERSION
    }
}

impl Default for PlatformVersion {
    fn default() -> Self {
        AREA_LIGHT_MIN_VERSION
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    Ambient,
    #[default]
    Omni,
    Directional,
    Spot,
    Ies,
    Probe,
    Area,
}

impl LightType {
    /// Maps a light code to a light type.
    ///
    /// Unknown codes become `Omni`, and so does `Area` on platforms that predate it.
    pub fn from_code(code: i64, platform: PlatformVersion) -> Self {
        match code {
            0 => LightType::Ambient,
            1 => LightType::Omni,
            2 => LightType::Directional,
            3 => LightType::Spot,
            4 => LightType::Ies,
            5 => LightType::Probe,
            6 if platform.supports_area_lights() => LightType::Area,
            6 => {
                log::warn!(
                    "Area lights need platform {}.{}, running {}.{}; using omni light",
                    AREA_LIGHT_MIN_VERSION.major,
                    AREA_LIGHT_MIN_VERSION.minor,
                    platform.major,
                    platform.minor
                );
                LightType::Omni
            }
            other => {
                log::debug!("Unknown light type code {other}; using omni light");
                LightType::Omni
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub light_type: LightType,
    /// Kelvin
    pub temperature: f32,
    /// Lumens
    pub intensity: f32,
    /// Degrees
    pub spot_inner_angle: f32,
    /// Degrees
    pub spot_outer_angle: f32,
    pub color: Color,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Omni,
            temperature: 6500.0,
            intensity: 1000.0,
            spot_inner_angle: 0.0,
            spot_outer_angle: 45.0,
            color: Color::WHITE,
        }
    }
}

pub fn build_light(description: &Description, platform: PlatformVersion) -> BuildResult<Light> {
    let mut light = Light::default();

    if let Some(code) = description.get_i64("type")? {
        light.light_type = LightType::from_code(code, platform);
    }
    if let Some(temperature) = description.get_f32("temperature")? {
        light.temperature = temperature;
    }
    if let Some(intensity) = description.get_f32("intensity")? {
        light.intensity = intensity;
    }
    if let Some(angle) = description.get_f32("spotInnerAngle")? {
        light.spot_inner_angle = angle;
    }
    if let Some(angle) = description.get_f32("spotOuterAngle")? {
        light.spot_outer_angle = angle;
    }
    if let Some(color) = description.get_i64("color")? {
        light.color = Color::from_packed_rgb(color as u32);
    }

    Ok(light)
}
