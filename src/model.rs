use glam::{Vec2, Vec3};
use gltf::buffer;
use gltf::mesh::Mode;
use id_arena::Id;
use itertools::izip;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

#[derive(Debug, Clone)]
pub struct ModelPrimitive {
    pub index: usize,
    pub mode: Mode,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material_name: Option<String>,
}

impl ModelPrimitive {
    /// Points and lines draw no triangles.
    pub fn triangle_count(&self) -> usize {
        let count = self.indices.len();
        match self.mode {
            Mode::Triangles => count / 3,
            Mode::TriangleStrip | Mode::TriangleFan => count.saturating_sub(2),
            Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => 0,
        }
    }
}

/// Mesh data converted from a glTF document.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

pub type ModelId = Id<Model>;

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    /// Converts every primitive of a glTF mesh. Primitives without positions carry
    /// nothing to draw and are skipped.
    pub fn from_gltf(name: impl Into<String>, mesh: gltf::Mesh, buffers: Buffers) -> Model {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
        };

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

            let Some(positions) = reader.read_positions() else {
                log::warn!(
                    "Skipping primitive {} of {}: no positions",
                    primitive.index(),
                    model.name
                );
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from).collect();

            // Normals and texture coordinates are optional in glTF
            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|normals| normals.map(Vec3::from).collect())
                .unwrap_or_else(|| vec![Vec3::ZERO; positions.len()]);
            let tex_coords: Vec<Vec2> = reader
                .read_tex_coords(0)
                .map(|coords| coords.into_f32().map(Vec2::from).collect())
                .unwrap_or_else(|| vec![Vec2::ZERO; positions.len()]);

            let vertices = izip!(positions.iter(), normals.iter(), tex_coords.iter())
                .map(|(&position, &normal, &tex_coords)| Vertex {
                    position,
                    normal,
                    tex_coords,
                })
                .collect::<Vec<Vertex>>();

            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };

            model.primitives.push(ModelPrimitive {
                index: primitive.index(),
                mode: primitive.mode(),
                vertices,
                indices,
                material_name: primitive.material().name().map(String::from),
            });
        }

        model
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|primitive| primitive.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(ModelPrimitive::triangle_count).sum()
    }
}
