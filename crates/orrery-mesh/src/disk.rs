//! Flat annulus for planetary rings.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, MeshError, Primitive, check_count, check_radius};
use crate::vertex::Vertex;

/// Generate a flat annulus in the local XY plane as a triangle list.
///
/// Normals are `+Z` and triangles wind counter-clockwise seen from `+Z`, so
/// only that side survives back-face culling. Rings are drawn a second time
/// flipped to show the other side. Texture coordinates are a planar
/// projection over the `outer` square. An `inner` radius of zero produces a
/// full disk.
pub fn make_disk(inner: f32, outer: f32, slices: u32, loops: u32) -> Result<Mesh, MeshError> {
    if !inner.is_finite() || inner < 0.0 {
        return Err(MeshError::InvalidParameter {
            shape: "disk",
            reason: format!("inner radius must be non-negative, got {inner}"),
        });
    }
    check_radius("disk", "outer radius", outer)?;
    if outer <= inner {
        return Err(MeshError::InvalidParameter {
            shape: "disk",
            reason: format!("outer radius {outer} must exceed inner radius {inner}"),
        });
    }
    check_count("disk", "slices", slices, 3)?;
    check_count("disk", "loops", loops, 1)?;

    let point = |slice: u32, ring: u32| -> Vertex {
        let theta = TAU * slice as f32 / slices as f32;
        let r = inner + (outer - inner) * ring as f32 / loops as f32;
        let (x, y) = (r * theta.cos(), r * theta.sin());
        let uv = Vec2::new(0.5 + x / (2.0 * outer), 0.5 - y / (2.0 * outer));
        Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, uv)
    };

    let mut vertices = Vec::with_capacity(6 * (slices * loops) as usize);
    for ring in 0..loops {
        for slice in 0..slices {
            let a = point(slice, ring);
            let b = point(slice, ring + 1);
            let c = point(slice + 1, ring + 1);
            let d = point(slice + 1, ring);

            vertices.extend_from_slice(&[a, b, c]);
            // a and d coincide at the centre of a full disk.
            if ring > 0 || inner > 0.0 {
                vertices.extend_from_slice(&[a, c, d]);
            }
        }
    }

    Ok(Mesh::new(vertices, Primitive::Triangles))
}
