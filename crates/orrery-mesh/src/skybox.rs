//! Skybox walls.
//!
//! Each face is one wall of an axis-aligned cube, seen from the centre. The
//! face's texture is mapped upright: the top row of the image lies along the
//! wall's `up` edge, and adjacent walls share edges with matching texels.

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, MeshError, Primitive, check_radius};
use crate::vertex::Vertex;

/// One wall of the skybox cube, named by where it sits relative to a viewer
/// looking down `-Z` with `+Y` up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkyboxFace {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl SkyboxFace {
    pub const ALL: [SkyboxFace; 6] = [
        SkyboxFace::Right,
        SkyboxFace::Left,
        SkyboxFace::Top,
        SkyboxFace::Bottom,
        SkyboxFace::Front,
        SkyboxFace::Back,
    ];

    /// Direction from the cube centre to the wall.
    pub fn outward(self) -> Vec3 {
        match self {
            SkyboxFace::Right => Vec3::X,
            SkyboxFace::Left => Vec3::NEG_X,
            SkyboxFace::Top => Vec3::Y,
            SkyboxFace::Bottom => Vec3::NEG_Y,
            SkyboxFace::Front => Vec3::NEG_Z,
            SkyboxFace::Back => Vec3::Z,
        }
    }

    /// Image-up direction when the wall is viewed from the centre.
    ///
    /// The ceiling's bottom edge meets the top of the front wall and its top
    /// edge lies on the back wall. The floor's top edge meets the bottom of
    /// the front wall.
    pub fn up(self) -> Vec3 {
        match self {
            SkyboxFace::Top => Vec3::Z,
            SkyboxFace::Bottom => Vec3::NEG_Z,
            _ => Vec3::Y,
        }
    }

    /// Lowercase name used for texture file lookup.
    pub fn name(self) -> &'static str {
        match self {
            SkyboxFace::Right => "right",
            SkyboxFace::Left => "left",
            SkyboxFace::Top => "top",
            SkyboxFace::Bottom => "bottom",
            SkyboxFace::Front => "front",
            SkyboxFace::Back => "back",
        }
    }
}

/// Generate two triangles covering one skybox wall at distance `radius`.
///
/// Normals point into the cube and the triangles wind counter-clockwise seen
/// from inside, so the wall survives back-face culling from the centre.
pub fn make_skybox_face(face: SkyboxFace, radius: f32) -> Result<Mesh, MeshError> {
    check_radius("skybox", "radius", radius)?;

    let out = face.outward();
    let up = face.up();
    let right = out.cross(up);
    let corner = |s: f32, t: f32| -> Vertex {
        let position = (out + right * s + up * t) * radius;
        let uv = Vec2::new((s + 1.0) * 0.5, (1.0 - t) * 0.5);
        Vertex::new(position, -out, uv)
    };

    let bottom_left = corner(-1.0, -1.0);
    let bottom_right = corner(1.0, -1.0);
    let top_right = corner(1.0, 1.0);
    let top_left = corner(-1.0, 1.0);

    Ok(Mesh::new(
        vec![
            bottom_left,
            bottom_right,
            top_right,
            bottom_left,
            top_right,
            top_left,
        ],
        Primitive::Triangles,
    ))
}

/// All six walls in [`SkyboxFace::ALL`] order.
pub fn make_skybox(radius: f32) -> Result<Vec<(SkyboxFace, Mesh)>, MeshError> {
    SkyboxFace::ALL
        .iter()
        .map(|&face| make_skybox_face(face, radius).map(|mesh| (face, mesh)))
        .collect()
}
