//! Per-frame traversal of the body hierarchy.
//!
//! Bodies are placed by composing rotations and translations on a
//! [`TransformStack`] whose baseline is the view matrix moved to the scene
//! origin. Each planet's sequence, right-multiplied:
//!
//! 1. rotate 90° about X, turning the sphere's Z pole into the orbital axis
//! 2. rotate by the orbit inclination about Y (orbit path drawn here)
//! 3. rotate by the orbital angle about Z, translate by the orbit radius
//! 4. undo the orbital angle and the inclination
//! 5. push, rotate by the axial tilt about Y and the spin angle about Z,
//!    draw the body and its ring, pop
//! 6. satellites repeat steps 2 to 5 from the parent's orbital frame
//!
//! The walker reads its inputs only; the same inputs give the same plan.

use glam::{Mat4, Vec3, Vec4};
use orrery_mesh::SkyboxFace;

use crate::body::{OrbitingBody, SolarSystem};
use crate::clock::SceneClock;
use crate::keys::{BodyId, MeshKey};
use crate::stack::TransformStack;

/// Offset along the ring's normal separating its two faces.
pub const RING_EPSILON: f32 = 0.001;

/// How a draw is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Texture only; the sun and the skybox.
    Unlit,
    /// Texture modulated by the sun's light.
    Lit,
    /// Flat-coloured line list.
    Line,
}

/// One draw call with its composed model-view matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshKey,
    pub shading: Shading,
    pub model_view: Mat4,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    pub draws: Vec<DrawCommand>,
    /// Sun centre in eye space.
    pub light_position: Vec3,
}

/// Walk the scene with a fresh stack.
pub fn walk(system: &SolarSystem, clock: &SceneClock, view: Mat4, show_orbits: bool) -> FramePlan {
    let mut stack = TransformStack::default();
    let mut plan = FramePlan::default();
    walk_with(&mut stack, &mut plan, system, clock, view, show_orbits);
    plan
}

/// Walk the scene reusing `stack` and `plan` allocations.
///
/// `plan` is cleared first. On return the stack is back at its baseline.
pub fn walk_with(
    stack: &mut TransformStack,
    plan: &mut FramePlan,
    system: &SolarSystem,
    clock: &SceneClock,
    view: Mat4,
    show_orbits: bool,
) {
    let scene = view * Mat4::from_translation(system.scene_offset());
    stack.reset(scene);
    plan.draws.clear();
    plan.light_position = (scene * Vec4::W).truncate();

    let mut walker = Walker {
        stack,
        draws: &mut plan.draws,
        clock,
        show_orbits,
        next_id: 0,
    };

    for face in SkyboxFace::ALL {
        walker.draw(MeshKey::Skybox(face), Shading::Unlit);
    }

    let mark = walker.stack.depth();
    walker.stack.push();
    walker.stack.rotate_x(90.0);
    walker.stack.multiply(system.sun.spin(clock));
    walker.draw(MeshKey::Sun, Shading::Unlit);
    walker.stack.restore(mark);

    for body in &system.bodies {
        walker.stack.push();
        walker.stack.rotate_x(90.0);
        walker.body(body);
        walker.stack.restore(mark);
    }

    debug_assert_eq!(stack.depth(), 1, "transform stack unbalanced after traversal");
}

struct Walker<'a> {
    stack: &'a mut TransformStack,
    draws: &'a mut Vec<DrawCommand>,
    clock: &'a SceneClock,
    show_orbits: bool,
    next_id: u16,
}

impl Walker<'_> {
    fn draw(&mut self, mesh: MeshKey, shading: Shading) {
        let model_view = self.stack.top();
        self.draw_with(mesh, shading, model_view);
    }

    fn draw_with(&mut self, mesh: MeshKey, shading: Shading, model_view: Mat4) {
        self.draws.push(DrawCommand {
            mesh,
            shading,
            model_view,
        });
    }

    /// Place and draw `body` from its parent's orbital frame, then its
    /// satellites. Leaves the stack top at the body's centre.
    fn body(&mut self, body: &OrbitingBody) {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        if self.show_orbits {
            let path = self.stack.top() * body.orbit_plane();
            self.draw_with(MeshKey::Orbit(id), Shading::Line, path);
        }
        self.stack.multiply(body.placement(self.clock));

        let mark = self.stack.depth();
        self.stack.push();
        self.stack.multiply(body.spin(self.clock));
        self.draw(MeshKey::Body(id), Shading::Lit);
        if body.ring.is_some() {
            self.draw(MeshKey::Ring(id), Shading::Lit);
            self.stack.translate(Vec3::new(0.0, 0.0, RING_EPSILON));
            self.stack.rotate_x(180.0);
            self.draw(MeshKey::Ring(id), Shading::Lit);
        }
        self.stack.restore(mark);

        if let Some(satellite) = body.satellite.as_deref() {
            self.stack.push();
            self.body(satellite);
            self.stack.restore(mark);
        }
    }
}
