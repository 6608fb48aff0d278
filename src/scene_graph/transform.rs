use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Local matrix kept exactly as set; components are derived on demand.
#[derive(Debug, Clone)]
pub struct Transform {
    local_matrix: Mat4,

    world_matrix: RefCell<Mat4>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_matrix(Mat4::from_translation(translation))
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            local_matrix: matrix,
            world_matrix: RefCell::new(Mat4::IDENTITY),
            world_dirty: Cell::new(true),
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.local_matrix
    }

    pub fn world_matrix(&self) -> Ref<Mat4> {
        self.world_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    /// Stores `matrix` verbatim, including shear, projective terms and zero scale.
    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.local_matrix = matrix;
        self.invalidate_world();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.local_matrix.w_axis = translation.extend(self.local_matrix.w_axis.w);
        self.invalidate_world();
    }

    /// Rescales each basis axis to the given length, keeping its direction.
    /// A collapsed axis takes the matching unit axis as its direction.
    pub fn set_scale(&mut self, scale: Vec3) {
        let matrix = &mut self.local_matrix;
        let axis = |column: Vec3, fallback: Vec3, length: f32| {
            column.try_normalize().unwrap_or(fallback) * length
        };
        matrix.x_axis = axis(matrix.x_axis.truncate(), Vec3::X, scale.x).extend(matrix.x_axis.w);
        matrix.y_axis = axis(matrix.y_axis.truncate(), Vec3::Y, scale.y).extend(matrix.y_axis.w);
        matrix.z_axis = axis(matrix.z_axis.truncate(), Vec3::Z, scale.z).extend(matrix.z_axis.w);
        self.invalidate_world();
    }

    pub fn translation(&self) -> Vec3 {
        self.local_matrix.w_axis.truncate()
    }

    /// Rotation of the decomposed matrix; undefined when an axis has zero scale.
    pub fn rotation(&self) -> Quat {
        self.local_matrix.to_scale_rotation_translation().1
    }

    /// Basis axis lengths, negated on x for a mirrored matrix.
    pub fn scale(&self) -> Vec3 {
        let matrix = &self.local_matrix;
        let sign = if matrix.determinant() < 0.0 { -1.0 } else { 1.0 };
        Vec3::new(
            matrix.x_axis.truncate().length() * sign,
            matrix.y_axis.truncate().length(),
            matrix.z_axis.truncate().length(),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}
