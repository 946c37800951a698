//! UV sphere generation.
//!
//! The poles lie on the local Z axis. Placing a body in its orbital plane
//! rotates +Z down onto -Y, so the texture's top row sits at the -Z pole.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, Primitive, check_count, check_radius};
use crate::vertex::Vertex;

/// Generate a UV sphere as a triangle list.
///
/// `slices` divide the longitude, `stacks` the latitude. Triangles wind
/// counter-clockwise seen from outside and normals point outward. The polar
/// caps emit one triangle per slice instead of a degenerate quad.
///
/// Returns [`MeshError::InvalidParameter`](crate::MeshError) for a non-positive
/// radius, fewer than 3 slices or fewer than 2 stacks.
pub fn make_sphere(radius: f32, slices: u32, stacks: u32) -> Result<Mesh, crate::MeshError> {
    check_radius("sphere", "radius", radius)?;
    check_count("sphere", "slices", slices, 3)?;
    check_count("sphere", "stacks", stacks, 2)?;

    let point = |slice: u32, stack: u32| -> Vertex {
        let theta = TAU * slice as f32 / slices as f32;
        let phi = PI * stack as f32 / stacks as f32;
        let normal = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
        let uv = Vec2::new(
            1.0 - slice as f32 / slices as f32,
            1.0 - stack as f32 / stacks as f32,
        );
        Vertex::new(normal * radius, normal, uv)
    };

    let cap_triangles = 2 * slices;
    let band_triangles = 2 * slices * (stacks - 2);
    let mut vertices = Vec::with_capacity(3 * (cap_triangles + band_triangles) as usize);

    for stack in 0..stacks {
        for slice in 0..slices {
            let a = point(slice, stack);
            let b = point(slice, stack + 1);
            let c = point(slice + 1, stack + 1);
            let d = point(slice + 1, stack);

            // a and d coincide at the +Z pole; b and c at the -Z pole.
            if stack + 1 < stacks {
                vertices.extend_from_slice(&[a, b, c]);
            }
            if stack > 0 {
                vertices.extend_from_slice(&[a, c, d]);
            }
        }
    }

    Ok(Mesh::new(vertices, Primitive::Triangles))
}
