//! Procedural geometry for the orrery: UV spheres, ring annuli, orbit-path
//! circles and skybox walls.
//!
//! Generators are pure. The same parameters always yield the same vertices in
//! the same order, so triangle winding and face culling stay stable.

pub mod circle;
pub mod disk;
pub mod mesh;
pub mod skybox;
pub mod sphere;
pub mod vertex;

pub use circle::make_circle;
pub use disk::make_disk;
pub use mesh::{Mesh, MeshError, Primitive};
pub use skybox::{SkyboxFace, make_skybox, make_skybox_face};
pub use sphere::make_sphere;
pub use vertex::{VERTEX_ATTRIBUTES, VERTEX_LAYOUT, Vertex};
