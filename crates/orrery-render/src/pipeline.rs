//! Render pipelines for the three shading modes of a frame plan.
//!
//! All three share the vertex layout from `orrery-mesh` and the per-draw
//! uniform block at group 0. Textured pipelines add the texture + sampler
//! bind group at group 1.

use orrery_mesh::VERTEX_LAYOUT;

use crate::depth::DepthBuffer;

/// Fixed parameters of one scene pipeline.
struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
}

fn create_scene_pipeline(device: &wgpu::Device, desc: &PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{}-layout", desc.label)),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[VERTEX_LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(DepthBuffer::stencil_state(true)),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Textured bodies lit by a point light at the sun.
pub struct LitPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl LitPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = create_scene_pipeline(
            device,
            &PipelineDesc {
                label: "lit-pipeline",
                shader,
                surface_format,
                bind_group_layouts: &[uniform_layout, texture_layout],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        Self { pipeline }
    }
}

/// Texture output as-is. Used for the sun and the skybox walls.
pub struct UnlitPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl UnlitPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = create_scene_pipeline(
            device,
            &PipelineDesc {
                label: "unlit-pipeline",
                shader,
                surface_format,
                bind_group_layouts: &[uniform_layout, texture_layout],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        Self { pipeline }
    }
}

/// Flat-coloured orbit paths.
pub struct LinePipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl LinePipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = create_scene_pipeline(
            device,
            &PipelineDesc {
                label: "line-pipeline",
                shader,
                surface_format,
                bind_group_layouts: &[uniform_layout],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
            },
        );
        Self { pipeline }
    }
}

/// Uniform block shared by every scene shader.
macro_rules! draw_uniform_wgsl {
    () => {
        r#"
struct DrawUniform {
    model_view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_position: vec4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u_draw: DrawUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};
"#
    };
}

/// Diffuse point light plus ambient, modulating the body texture.
pub const LIT_SHADER_SOURCE: &str = concat!(
    draw_uniform_wgsl!(),
    r#"
@group(1) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(1) @binding(1)
var s_diffuse: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) eye_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let eye = u_draw.model_view * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = u_draw.projection * eye;
    out.eye_position = eye.xyz;
    // Model-view is rigid, so it transforms normals directly.
    out.normal = (u_draw.model_view * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let l = normalize(u_draw.light_position.xyz - in.eye_position);
    let diffuse = max(dot(n, l), 0.0);
    let shade = min(u_draw.params.x + diffuse, 1.0);
    let base = textureSample(t_diffuse, s_diffuse, in.uv);
    return vec4<f32>(base.rgb * shade, base.a);
}
"#
);

pub const UNLIT_SHADER_SOURCE: &str = concat!(
    draw_uniform_wgsl!(),
    r#"
@group(1) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(1) @binding(1)
var s_diffuse: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = u_draw.projection * u_draw.model_view * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(t_diffuse, s_diffuse, in.uv);
}
"#
);

pub const LINE_SHADER_SOURCE: &str = concat!(
    draw_uniform_wgsl!(),
    r#"
@vertex
fn vs_main(in: VertexInput) -> @builtin(position) vec4<f32> {
    return u_draw.projection * u_draw.model_view * vec4<f32>(in.position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u_draw.color;
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{TextureManager, create_test_device_queue};
    use crate::uniforms::draw_uniform_layout;

    fn module(device: &wgpu::Device, source: &str) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    }

    #[test]
    fn test_sources_share_uniform_block() {
        for source in [LIT_SHADER_SOURCE, UNLIT_SHADER_SOURCE, LINE_SHADER_SOURCE] {
            assert!(source.contains("struct DrawUniform"));
            assert!(source.contains("@group(0) @binding(0)"));
        }
        assert!(!LINE_SHADER_SOURCE.contains("@group(1)"));
    }

    #[test]
    fn test_lit_shader_uses_light_and_ambient() {
        assert!(LIT_SHADER_SOURCE.contains("u_draw.light_position"));
        assert!(LIT_SHADER_SOURCE.contains("u_draw.params.x"));
    }

    #[test]
    fn test_pipelines_build() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let uniform_layout = draw_uniform_layout(&device);
        let textures = TextureManager::new(&device);
        let format = wgpu::TextureFormat::Bgra8UnormSrgb;

        let _lit = LitPipeline::new(
            &device,
            &module(&device, LIT_SHADER_SOURCE),
            format,
            &uniform_layout,
            textures.bind_group_layout(),
        );
        let _unlit = UnlitPipeline::new(
            &device,
            &module(&device, UNLIT_SHADER_SOURCE),
            format,
            &uniform_layout,
            textures.bind_group_layout(),
        );
        let _line = LinePipeline::new(
            &device,
            &module(&device, LINE_SHADER_SOURCE),
            format,
            &uniform_layout,
        );
    }
}
