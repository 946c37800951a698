//! Scene model and per-frame traversal for the orrery.
//!
//! [`SolarSystem`] holds the static body table. [`SceneClock`] and
//! [`CameraFrame`] are the only state that changes between frames. Each frame
//! [`walk`] turns the three into an ordered [`FramePlan`] of draw commands.

pub mod body;
pub mod camera;
pub mod clock;
pub mod keys;
pub mod stack;
pub mod toggles;
pub mod walker;

pub use body::{Orbit, OrbitingBody, Ring, SceneFileError, Skybox, SolarSystem, Sun};
pub use camera::{CameraFrame, CameraInput, CameraRates, Projection};
pub use clock::SceneClock;
pub use keys::{BodyId, MeshKey};
pub use stack::{StackError, TransformStack};
pub use toggles::SceneToggles;
pub use walker::{DrawCommand, FramePlan, RING_EPSILON, Shading, walk, walk_with};
