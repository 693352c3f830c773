use macroquad::{
    color::Color,
    math::{Vec2, Vec3},
    models::{Mesh, Vertex},
};

use crate::geometry::{Disc, Stroke};
use crate::utility::color_u8;

/// Rim vertices per disc.
pub const DISC_SEGMENTS: usize = 16;

/// Discs per mesh. Keeps each mesh inside macroquad's default batch
/// (10000 vertices, 5000 indices).
pub const MAX_DISCS_PER_MESH: usize = 100;

/// Things that can be turned into world-space meshes for drawing.
pub trait Meshable {
    fn to_meshes(&self, alpha: f32) -> Vec<Mesh>;
}

impl Meshable for Stroke {
    fn to_meshes(&self, alpha: f32) -> Vec<Mesh> {
        discs_to_meshes(self.discs(), self.color().to_color(alpha))
    }
}

fn push_disc(vertices: &mut Vec<Vertex>, indices: &mut Vec<u16>, disc: &Disc, color: [u8; 4]) {
    let normal = [0.0, 0.0, 1.0, 0.0];
    let center = vertices.len() as u16;
    vertices.push(Vertex {
        position: Vec3::new(disc.center_x, disc.center_y, 0.0),
        uv: Vec2::ZERO,
        color,
        normal: normal.into(),
    });
    for j in 0..DISC_SEGMENTS {
        let angle = j as f32 / DISC_SEGMENTS as f32 * std::f32::consts::TAU;
        vertices.push(Vertex {
            position: Vec3::new(
                disc.center_x + angle.cos() * disc.radius,
                disc.center_y + angle.sin() * disc.radius,
                0.0,
            ),
            uv: Vec2::ZERO,
            color,
            normal: normal.into(),
        });
    }
    for j in 0..DISC_SEGMENTS as u16 {
        let next = (j + 1) % DISC_SEGMENTS as u16;
        indices.push(center);
        indices.push(center + 1 + j);
        indices.push(center + 1 + next);
    }
}

/// One triangle fan per disc, split into meshes of at most
/// `MAX_DISCS_PER_MESH` discs.
pub fn discs_to_meshes(discs: &[Disc], color: Color) -> Vec<Mesh> {
    let c = color_u8(color);
    discs
        .chunks(MAX_DISCS_PER_MESH)
        .map(|chunk| {
            let mut vertices = Vec::with_capacity(chunk.len() * (DISC_SEGMENTS + 1));
            let mut indices = Vec::with_capacity(chunk.len() * DISC_SEGMENTS * 3);
            for disc in chunk {
                push_disc(&mut vertices, &mut indices, disc, c);
            }
            Mesh {
                vertices,
                indices,
                texture: None,
            }
        })
        .collect()
}
