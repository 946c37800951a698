//! Draws a [`FramePlan`] with the meshes and textures of one [`SolarSystem`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Mat4;
use orrery_scene::{FramePlan, MeshKey, Shading, SolarSystem};

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::error::InitError;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder, clear_color_from};
use crate::pipeline::{
    LINE_SHADER_SOURCE, LIT_SHADER_SOURCE, LinePipeline, LitPipeline, UNLIT_SHADER_SOURCE,
    UnlitPipeline,
};
use crate::shader::load_shader;
use crate::texture::{ManagedTexture, TextureManager};
use crate::uniforms::{DrawUniform, FrameUniforms, UniformArena, draw_uniform_layout, slot_offset};

const ENTRY_POINTS: &[&str] = &["vs_main", "fs_main"];

/// Asset and shading options of the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    /// Directory texture file names are resolved against.
    pub texture_dir: PathBuf,
    /// Fail startup instead of substituting a flat colour for a missing texture.
    pub require_textures: bool,
    pub ambient: f32,
    pub orbit_color: [f32; 3],
    pub clear_color: [f32; 3],
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("img"),
            require_textures: false,
            ambient: 0.15,
            orbit_color: [0.35, 0.45, 0.6],
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Colour substituted for a missing texture.
pub fn fallback_color(key: MeshKey) -> [u8; 4] {
    match key {
        MeshKey::Skybox(_) => [6, 6, 14, 255],
        MeshKey::Sun => [255, 208, 96, 255],
        MeshKey::Body(_) => [150, 150, 150, 255],
        MeshKey::Ring(_) => [190, 175, 140, 255],
        MeshKey::Orbit(_) => [255, 255, 255, 255],
    }
}

fn mesh_label(system: &SolarSystem, key: MeshKey) -> String {
    let body_name = |id| system.body(id).map_or("unknown", |b| b.name.as_str());
    match key {
        MeshKey::Skybox(face) => format!("skybox-{}", face.name()),
        MeshKey::Sun => system.sun.name.clone(),
        MeshKey::Body(id) => body_name(id).to_string(),
        MeshKey::Ring(id) => format!("{}-ring", body_name(id)),
        MeshKey::Orbit(id) => format!("{}-orbit", body_name(id)),
    }
}

/// GPU resources for one solar system and the pipelines that draw it.
pub struct SceneRenderer {
    lit: LitPipeline,
    unlit: UnlitPipeline,
    line: LinePipeline,
    uniform_layout: wgpu::BindGroupLayout,
    uniforms: UniformArena,
    meshes: HashMap<MeshKey, MeshBuffer>,
    textures: HashMap<MeshKey, Arc<ManagedTexture>>,
    depth: DepthBuffer,
    settings: RendererSettings,
    staging: Vec<DrawUniform>,
}

impl SceneRenderer {
    /// Build pipelines and upload every mesh and texture `system` can draw.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        system: &SolarSystem,
        settings: RendererSettings,
    ) -> Result<Self, InitError> {
        let lit_shader = load_shader(device, "lit", LIT_SHADER_SOURCE, ENTRY_POINTS)?;
        let unlit_shader = load_shader(device, "unlit", UNLIT_SHADER_SOURCE, ENTRY_POINTS)?;
        let line_shader = load_shader(device, "line", LINE_SHADER_SOURCE, ENTRY_POINTS)?;

        let uniform_layout = draw_uniform_layout(device);
        let mut texture_manager = TextureManager::new(device);
        let texture_layout = texture_manager.bind_group_layout();

        let lit = LitPipeline::new(
            device,
            &lit_shader,
            surface_format,
            &uniform_layout,
            texture_layout,
        );
        let unlit = UnlitPipeline::new(
            device,
            &unlit_shader,
            surface_format,
            &uniform_layout,
            texture_layout,
        );
        let line = LinePipeline::new(device, &line_shader, surface_format, &uniform_layout);

        let allocator = BufferAllocator::new(device);
        let mut meshes = HashMap::new();
        let mut textures = HashMap::new();
        for (key, mesh) in system.build_meshes()? {
            meshes.insert(key, allocator.upload_mesh(&mesh_label(system, key), &mesh));
            if let Some(file) = system.texture_for(key) {
                let texture = resolve_texture(
                    &mut texture_manager,
                    device,
                    queue,
                    &settings.texture_dir.join(file),
                    key,
                    settings.require_textures,
                )?;
                textures.insert(key, texture);
            }
        }
        log::info!(
            "Scene renderer ready: {} meshes, {} textures",
            meshes.len(),
            texture_manager.len()
        );

        let uniforms = UniformArena::new(device, &uniform_layout);
        Ok(Self {
            lit,
            unlit,
            line,
            uniform_layout,
            uniforms,
            meshes,
            textures,
            depth: DepthBuffer::new(device, width, height),
            settings,
            staging: Vec::new(),
        })
    }

    /// Build the renderer for a live render context.
    pub fn for_context(
        ctx: &RenderContext,
        system: &SolarSystem,
        settings: RendererSettings,
    ) -> Result<Self, InitError> {
        Self::new(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            ctx.size(),
            system,
            settings,
        )
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn has_texture(&self, key: MeshKey) -> bool {
        self.textures.contains_key(&key)
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Write the per-draw uniforms for `plan`.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        plan: &FramePlan,
        projection: Mat4,
    ) {
        let frame = FrameUniforms {
            projection,
            light_position: plan.light_position,
            line_color: self.settings.orbit_color,
            ambient: self.settings.ambient,
        };
        self.staging.clear();
        self.staging.extend(
            plan.draws
                .iter()
                .map(|draw| DrawUniform::new(draw.model_view, &frame)),
        );
        self.uniforms
            .upload(device, queue, &self.uniform_layout, &self.staging);
    }

    /// Record the draws of `plan` in order. [`prepare`](Self::prepare) must
    /// have been called with the same plan.
    pub fn record(&self, pass: &mut wgpu::RenderPass<'_>, plan: &FramePlan) {
        let mut bound: Option<Shading> = None;
        for (slot, draw) in plan.draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(&draw.mesh) else {
                log::debug!("No mesh uploaded for {:?}", draw.mesh);
                continue;
            };
            let texture = self.textures.get(&draw.mesh);
            if draw.shading != Shading::Line && texture.is_none() {
                log::debug!("No texture for {:?}", draw.mesh);
                continue;
            }

            if bound != Some(draw.shading) {
                pass.set_pipeline(match draw.shading {
                    Shading::Lit => &self.lit.pipeline,
                    Shading::Unlit => &self.unlit.pipeline,
                    Shading::Line => &self.line.pipeline,
                });
                bound = Some(draw.shading);
            }
            pass.set_bind_group(0, self.uniforms.bind_group(), &[slot_offset(slot)]);
            if let Some(texture) = texture
                && draw.shading != Shading::Line
            {
                pass.set_bind_group(1, &texture.bind_group, &[]);
            }
            mesh.bind(pass);
            mesh.draw(pass);
        }
    }

    /// Draw `plan` to the window surface and present it.
    pub fn render(
        &mut self,
        ctx: &RenderContext,
        plan: &FramePlan,
        projection: Mat4,
    ) -> Result<(), SurfaceError> {
        let surface_texture = ctx.get_current_texture()?;
        self.prepare(&ctx.device, &ctx.queue, plan, projection);

        let mut frame = FrameEncoder::new(&ctx.device, &ctx.queue, surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_color(clear_color_from(self.settings.clear_color))
            .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");
        if let Some(mut pass) = frame.begin_render_pass(&builder) {
            self.record(&mut pass, plan);
        }
        frame.submit();
        Ok(())
    }
}

fn resolve_texture(
    manager: &mut TextureManager,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
    key: MeshKey,
    required: bool,
) -> Result<Arc<ManagedTexture>, InitError> {
    match manager.load(device, queue, path) {
        Ok(texture) => Ok(texture),
        Err(source) if required => Err(InitError::Texture { key, source }),
        Err(err) => {
            log::warn!("{err}; drawing {key:?} in a flat colour");
            Ok(manager.flat(device, queue, fallback_color(key)))
        }
    }
}
