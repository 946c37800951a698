//! Orbit-path circles.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, MeshError, Primitive, check_count, check_radius};
use crate::vertex::Vertex;

/// Generate a closed line loop of `point_count` vertices on a circle of
/// `radius` in the local XY plane, starting on +X and spaced `2π/point_count`
/// radians apart.
pub fn make_circle(radius: f32, point_count: u32) -> Result<Mesh, MeshError> {
    check_radius("circle", "radius", radius)?;
    check_count("circle", "point count", point_count, 3)?;

    let step = TAU / point_count as f32;
    let vertices = (0..point_count)
        .map(|i| {
            let angle = step * i as f32;
            Vertex::new(
                Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0),
                Vec3::Z,
                Vec2::new(i as f32 / point_count as f32, 0.0),
            )
        })
        .collect();

    Ok(Mesh::new(vertices, Primitive::LineLoop))
}
