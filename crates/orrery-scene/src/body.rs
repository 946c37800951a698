//! Static description of the solar system.
//!
//! [`SolarSystem::default`] is the built-in table. A RON scene file with the
//! same shape can replace it at startup.

use std::path::Path;

use glam::{Mat4, Vec3};
use orrery_mesh::{Mesh, MeshError, SkyboxFace, make_circle, make_disk, make_skybox_face, make_sphere};
use serde::{Deserialize, Serialize};

use crate::clock::SceneClock;
use crate::keys::{BodyId, MeshKey};

/// Errors loading a scene file.
#[derive(Debug, thiserror::Error)]
pub enum SceneFileError {
    #[error("failed to read scene file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse scene file: {0}")]
    Parse(#[source] ron::error::SpannedError),
}

/// Orbit of a body around its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// Tilt of the orbital plane in degrees.
    pub inclination_deg: f32,
    /// Distance from the parent's centre.
    pub radius: f32,
    /// Orbital angle per degree of clock.
    pub rate: f32,
}

/// A flat ring around a body, drawn on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub slices: u32,
    pub loops: u32,
    /// Texture file; the body's own texture when absent.
    #[serde(default)]
    pub texture: Option<String>,
}

/// A planet or moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitingBody {
    pub name: String,
    pub texture: String,
    pub radius: f32,
    pub slices: u32,
    pub stacks: u32,
    pub orbit: Orbit,
    /// Tilt of the spin axis in degrees, applied after the orbital placement.
    pub axial_tilt_deg: f32,
    /// Spin angle per degree of clock.
    pub spin_rate: f32,
    #[serde(default)]
    pub ring: Option<Ring>,
    /// A moon orbiting this body; it may carry its own satellite.
    #[serde(default)]
    pub satellite: Option<Box<OrbitingBody>>,
}

/// The unlit centre body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub name: String,
    pub texture: String,
    pub radius: f32,
    pub slices: u32,
    pub stacks: u32,
    pub spin_rate: f32,
}

/// Textured cube surrounding the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skybox {
    /// Half-extent of the cube.
    pub radius: f32,
    /// Face textures are `<stem>_<face>.<extension>`.
    pub texture_stem: String,
    pub texture_extension: String,
}

impl Skybox {
    pub fn texture_for(&self, face: SkyboxFace) -> String {
        format!("{}_{}.{}", self.texture_stem, face.name(), self.texture_extension)
    }
}

/// The whole scene: sun, planets in draw order, and skybox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    pub sun: Sun,
    pub bodies: Vec<OrbitingBody>,
    pub skybox: Skybox,
    /// Translation from the view origin to the sun.
    pub scene_offset: [f32; 3],
    /// Vertices per orbit-path circle.
    pub orbit_path_points: u32,
}

impl OrbitingBody {
    /// Orbital angle in degrees at `clock`.
    pub fn orbital_angle(&self, clock: &SceneClock) -> f32 {
        clock.angle(self.orbit.rate)
    }

    /// Spin angle in degrees at `clock`.
    pub fn spin_angle(&self, clock: &SceneClock) -> f32 {
        clock.angle(self.spin_rate)
    }

    /// Rotation of the orbital plane about the parent's local Y axis.
    pub fn orbit_plane(&self) -> Mat4 {
        Mat4::from_rotation_y(self.orbit.inclination_deg.to_radians())
    }

    /// Moves from the parent's orbital frame to this body's centre.
    ///
    /// The orbital rotation and inclination are undone after the translation,
    /// so the body's own frame keeps a fixed orientation as it travels.
    pub fn placement(&self, clock: &SceneClock) -> Mat4 {
        let orbital = self.orbital_angle(clock).to_radians();
        self.orbit_plane()
            * Mat4::from_rotation_z(orbital)
            * Mat4::from_translation(Vec3::new(self.orbit.radius, 0.0, 0.0))
            * Mat4::from_rotation_z(-orbital)
            * self.orbit_plane().inverse()
    }

    /// Axial tilt followed by the current spin.
    pub fn spin(&self, clock: &SceneClock) -> Mat4 {
        Mat4::from_rotation_y(self.axial_tilt_deg.to_radians())
            * Mat4::from_rotation_z(self.spin_angle(clock).to_radians())
    }

    pub fn ring_texture(&self) -> &str {
        self.ring
            .as_ref()
            .and_then(|r| r.texture.as_deref())
            .unwrap_or(&self.texture)
    }
}

impl Sun {
    pub fn spin(&self, clock: &SceneClock) -> Mat4 {
        Mat4::from_rotation_z(clock.angle(self.spin_rate).to_radians())
    }
}

impl SolarSystem {
    /// Read a RON scene file.
    pub fn load(path: &Path) -> Result<Self, SceneFileError> {
        let contents = std::fs::read_to_string(path).map_err(SceneFileError::Read)?;
        let system = Self::from_ron(&contents)?;
        tracing::info!(
            "Loaded scene from {} ({} bodies)",
            path.display(),
            system.catalog().len()
        );
        Ok(system)
    }

    pub fn from_ron(contents: &str) -> Result<Self, SceneFileError> {
        ron::from_str(contents).map_err(SceneFileError::Parse)
    }

    pub fn scene_offset(&self) -> Vec3 {
        Vec3::from_array(self.scene_offset)
    }

    /// Every orbiting body in traversal order, each planet followed by its
    /// satellite chain. Positions in this list are the bodies' [`BodyId`]s.
    pub fn catalog(&self) -> Vec<&OrbitingBody> {
        let mut out = Vec::new();
        for body in &self.bodies {
            let mut next = Some(body);
            while let Some(b) = next {
                out.push(b);
                next = b.satellite.as_deref();
            }
        }
        out
    }

    pub fn body(&self, id: BodyId) -> Option<&OrbitingBody> {
        self.catalog().get(usize::from(id.0)).copied()
    }

    /// Texture file for a mesh, `None` for untextured orbit paths.
    pub fn texture_for(&self, key: MeshKey) -> Option<String> {
        match key {
            MeshKey::Skybox(face) => Some(self.skybox.texture_for(face)),
            MeshKey::Sun => Some(self.sun.texture.clone()),
            MeshKey::Body(id) => self.body(id).map(|b| b.texture.clone()),
            MeshKey::Ring(id) => self.body(id).map(|b| b.ring_texture().to_string()),
            MeshKey::Orbit(_) => None,
        }
    }

    /// Generate every mesh the walker can reference.
    pub fn build_meshes(&self) -> Result<Vec<(MeshKey, Mesh)>, MeshError> {
        let mut meshes = Vec::new();
        for face in SkyboxFace::ALL {
            meshes.push((
                MeshKey::Skybox(face),
                make_skybox_face(face, self.skybox.radius)?,
            ));
        }
        meshes.push((
            MeshKey::Sun,
            make_sphere(self.sun.radius, self.sun.slices, self.sun.stacks)?,
        ));

        for (index, body) in self.catalog().into_iter().enumerate() {
            let id = BodyId(index as u16);
            meshes.push((
                MeshKey::Body(id),
                make_sphere(body.radius, body.slices, body.stacks)?,
            ));
            if let Some(ring) = &body.ring {
                meshes.push((
                    MeshKey::Ring(id),
                    make_disk(ring.inner_radius, ring.outer_radius, ring.slices, ring.loops)?,
                ));
            }
            meshes.push((
                MeshKey::Orbit(id),
                make_circle(body.orbit.radius, self.orbit_path_points)?,
            ));
        }

        tracing::debug!("Generated {} meshes", meshes.len());
        Ok(meshes)
    }
}

fn planet(
    name: &str,
    (inclination_deg, axial_tilt_deg): (f32, f32),
    (radius, orbit_radius): (f32, f32),
    (slices, stacks): (u32, u32),
    (orbit_rate, spin_rate): (f32, f32),
) -> OrbitingBody {
    OrbitingBody {
        name: name.to_string(),
        texture: format!("{name}map.tga"),
        radius,
        slices,
        stacks,
        orbit: Orbit {
            inclination_deg,
            radius: orbit_radius,
            rate: orbit_rate,
        },
        axial_tilt_deg,
        spin_rate,
        ring: None,
        satellite: None,
    }
}

fn ring(inner_radius: f32, outer_radius: f32) -> Option<Ring> {
    Some(Ring {
        inner_radius,
        outer_radius,
        slices: 30,
        loops: 15,
        texture: None,
    })
}

impl Default for SolarSystem {
    fn default() -> Self {
        let mut earth = planet("earth", (0.00005, -23.44), (0.15, 2.2), (20, 10), (0.5, -7.0));
        earth.satellite = Some(Box::new(planet(
            "moon",
            (5.145, -5.0),
            (0.04, 0.2),
            (16, 8),
            (-2.0, 0.0),
        )));
        let mut saturn = planet("saturn", (2.484, -26.73), (0.3, 6.0), (30, 15), (0.27, 3.0));
        saturn.ring = ring(0.35, 0.65);
        let mut uranus = planet("uranus", (0.77, 97.77), (0.25, 7.0), (30, 15), (0.22, -4.0));
        uranus.ring = ring(0.3, 0.4);

        Self {
            sun: Sun {
                name: "sun".to_string(),
                texture: "sunmap.tga".to_string(),
                radius: 0.5,
                slices: 40,
                stacks: 20,
                spin_rate: 1.0,
            },
            bodies: vec![
                planet("mercury", (7.0, -0.027), (0.06, 0.85), (16, 8), (3.5, -5.0)),
                planet("venus", (3.4, -2.64), (0.15, 1.4), (20, 10), (2.0, 4.0)),
                earth,
                planet("mars", (1.85, -25.19), (0.1, 3.0), (20, 10), (0.4, 3.0)),
                planet("jupiter", (1.305, -3.12), (0.4, 4.5), (30, 15), (0.32, -2.0)),
                saturn,
                uranus,
                planet("neptune", (1.769, -29.58), (0.25, 8.0), (30, 15), (0.18, 2.0)),
                planet("pluto", (17.09, -119.591), (0.04, 9.0), (16, 8), (0.15, 1.0)),
            ],
            skybox: Skybox {
                radius: 20.0,
                texture_stem: "skybox".to_string(),
                texture_extension: "tga".to_string(),
            },
            scene_offset: [0.0, 0.0, -11.0],
            orbit_path_points: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn test_catalog_order() {
        let system = SolarSystem::default();
        let names: Vec<&str> = system.catalog().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "mercury", "venus", "earth", "moon", "mars", "jupiter", "saturn", "uranus",
                "neptune", "pluto"
            ]
        );
    }

    #[test]
    fn test_rings_and_satellites() {
        let system = SolarSystem::default();
        let ringed: Vec<&str> = system
            .catalog()
            .iter()
            .filter(|b| b.ring.is_some())
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(ringed, ["saturn", "uranus"]);
        let moon = system.body(BodyId(3)).unwrap();
        assert_eq!(moon.name, "moon");
        assert_eq!(moon.orbit.rate, -2.0);
    }

    #[test]
    fn test_mercury_orbital_angle() {
        let system = SolarSystem::default();
        let clock = SceneClock::at(100.0, 35.0);
        assert_eq!(system.bodies[0].orbital_angle(&clock), 350.0);
    }

    #[test]
    fn test_placement_reaches_orbit_radius() {
        let system = SolarSystem::default();
        for body in system.catalog() {
            for t in [0.0, 13.0, 250.0] {
                let clock = SceneClock::at(t, 35.0);
                let centre = body.placement(&clock).transform_point3(Vec3::ZERO);
                assert!((centre.length() - body.orbit.radius).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_placement_keeps_orientation() {
        let system = SolarSystem::default();
        let clock = SceneClock::at(77.0, 35.0);
        let placement = system.bodies[1].placement(&clock);
        let offset = placement.transform_point3(Vec3::ZERO);
        assert!(approx_mat(placement, Mat4::from_translation(offset)));
    }

    #[test]
    fn test_ring_texture_defaults_to_body() {
        let system = SolarSystem::default();
        let saturn = &system.bodies[5];
        assert_eq!(saturn.ring_texture(), "saturnmap.tga");
        assert_eq!(
            system.texture_for(MeshKey::Ring(BodyId(6))).as_deref(),
            Some("saturnmap.tga")
        );
    }

    #[test]
    fn test_texture_names() {
        let system = SolarSystem::default();
        assert_eq!(system.texture_for(MeshKey::Sun).as_deref(), Some("sunmap.tga"));
        assert_eq!(
            system.texture_for(MeshKey::Skybox(SkyboxFace::Front)).as_deref(),
            Some("skybox_front.tga")
        );
        assert_eq!(system.texture_for(MeshKey::Orbit(BodyId(0))), None);
        assert_eq!(system.texture_for(MeshKey::Body(BodyId(99))), None);
    }

    #[test]
    fn test_build_meshes_covers_every_key() {
        let system = SolarSystem::default();
        let meshes = system.build_meshes().unwrap();
        // 6 skybox faces, the sun, 10 bodies, 10 orbits, 2 rings.
        assert_eq!(meshes.len(), 6 + 1 + 10 + 10 + 2);
        assert!(meshes.iter().any(|(k, _)| *k == MeshKey::Ring(BodyId(7))));
    }

    #[test]
    fn test_build_meshes_rejects_bad_body() {
        let mut system = SolarSystem::default();
        system.bodies[0].slices = 2;
        assert!(system.build_meshes().is_err());
    }

    #[test]
    fn test_scene_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");
        let mut system = SolarSystem::default();
        system.bodies.truncate(3);
        let text = ron::ser::to_string_pretty(&system, ron::ser::PrettyConfig::new()).unwrap();
        std::fs::write(&path, text).unwrap();

        let loaded = SolarSystem::load(&path).unwrap();
        assert_eq!(loaded, system);
        assert_eq!(loaded.catalog().len(), 4);
    }

    #[test]
    fn test_scene_file_optional_fields() {
        let text = r#"(
            sun: (name: "sun", texture: "sun.png", radius: 1.0, slices: 8, stacks: 4, spin_rate: 1.0),
            bodies: [(
                name: "rock", texture: "rock.png", radius: 0.1, slices: 8, stacks: 4,
                orbit: (inclination_deg: 0.0, radius: 2.0, rate: 1.0),
                axial_tilt_deg: 0.0, spin_rate: 1.0,
            )],
            skybox: (radius: 10.0, texture_stem: "sky", texture_extension: "png"),
            scene_offset: (0.0, 0.0, -5.0),
            orbit_path_points: 32,
        )"#;
        let system = SolarSystem::from_ron(text).unwrap();
        assert!(system.bodies[0].ring.is_none());
        assert!(system.bodies[0].satellite.is_none());
    }

    #[test]
    fn test_missing_scene_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SolarSystem::load(&dir.path().join("absent.ron"));
        assert!(matches!(result, Err(SceneFileError::Read(_))));
    }
}
