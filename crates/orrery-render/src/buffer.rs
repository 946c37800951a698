//! Vertex and index buffers for generated meshes.

use orrery_mesh::{Mesh, Primitive};
use wgpu::util::DeviceExt;

/// A mesh uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub topology: wgpu::PrimitiveTopology,
}

impl MeshBuffer {
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Topology a mesh is drawn with. Line loops are expanded to segment pairs
/// by [`Mesh::index_list`], so they draw as a line list.
pub fn topology_for(primitive: Primitive) -> wgpu::PrimitiveTopology {
    match primitive {
        Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
        Primitive::LineLoop => wgpu::PrimitiveTopology::LineList,
    }
}

/// Creates GPU buffers on one device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload `mesh` with a u32 index list matching its primitive.
    pub fn upload_mesh(&self, label: &str, mesh: &Mesh) -> MeshBuffer {
        let indices = mesh.index_list();
        let vertex_buffer = self.create_vertex_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(mesh.vertices()),
        );
        let index_buffer = self.create_index_buffer(&format!("{label}-indices"), &indices);
        log::debug!(
            "Uploaded mesh '{label}': {} vertices, {} indices",
            mesh.vertex_count(),
            indices.len()
        );

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            topology: topology_for(mesh.primitive()),
        }
    }

    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    pub fn create_index_buffer(&self, label: &str, data: &[u32]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}
