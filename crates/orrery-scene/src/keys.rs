//! Identifiers linking draw commands to GPU resources.

use orrery_mesh::SkyboxFace;

/// Index of an orbiting body in [`SolarSystem::catalog`](crate::SolarSystem::catalog)
/// order: each planet followed by its satellite chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u16);

/// Which generated mesh a draw command uses.
///
/// The renderer uploads one buffer per key at setup. A key also determines
/// its texture through [`SolarSystem::texture_for`](crate::SolarSystem::texture_for).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKey {
    Skybox(SkyboxFace),
    Sun,
    Body(BodyId),
    Ring(BodyId),
    Orbit(BodyId),
}
