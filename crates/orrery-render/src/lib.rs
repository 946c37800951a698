//! wgpu backend for the orrery: device and surface, mesh and texture upload,
//! the lit / unlit / line pipelines and the scene renderer that draws a
//! [`orrery_scene::FramePlan`].

pub mod buffer;
pub mod depth;
pub mod error;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use buffer::{BufferAllocator, MeshBuffer, topology_for};
pub use depth::DepthBuffer;
pub use error::InitError;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, clear_color_from};
pub use pipeline::{
    LINE_SHADER_SOURCE, LIT_SHADER_SOURCE, LinePipeline, LitPipeline, UNLIT_SHADER_SOURCE,
    UnlitPipeline,
};
pub use renderer::{RendererSettings, SceneRenderer, fallback_color};
pub use shader::{ShaderError, load_shader};
pub use texture::{
    ManagedTexture, TEXTURE_FORMAT, TextureError, TextureImage, TextureManager, load_texture_file,
    mip_level_count,
};
pub use uniforms::{DrawUniform, FrameUniforms, UNIFORM_STRIDE, UniformArena};
