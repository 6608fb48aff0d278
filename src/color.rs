use glam::Vec4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec4);

impl Color {
    pub const WHITE: Color = Color(Vec4::ONE);

    /// Unpacks a `0xRRGGBB` integer; any bits above the low 24 are ignored and alpha is opaque.
    pub fn from_packed_rgb(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
        Color(Vec4::new(channel(16), channel(8), channel(0), 1.0))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
