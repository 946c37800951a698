use orrery_mesh::MeshError;
use orrery_scene::MeshKey;

use crate::gpu::RenderContextError;
use crate::shader::ShaderError;
use crate::texture::TextureError;

/// Startup failure of the render backend. Fatal for the application.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Context(#[from] RenderContextError),

    #[error("failed to generate scene meshes: {0}")]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("required texture for {key:?} is unavailable: {source}")]
    Texture {
        key: MeshKey,
        #[source]
        source: TextureError,
    },
}
