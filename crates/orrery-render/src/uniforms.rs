//! Per-draw uniform data in one dynamic-offset buffer.
//!
//! Each draw of a frame gets its own 256-byte slot. The whole frame is written
//! with a single `write_buffer` and each draw binds group 0 at its slot offset.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Distance between consecutive slots. Matches the default
/// `min_uniform_buffer_offset_alignment`.
pub const UNIFORM_STRIDE: u64 = 256;

const INITIAL_SLOTS: usize = 64;

/// Uniforms for one draw, mirroring `DrawUniform` in the WGSL sources.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Eye-space light position, `w = 1`.
    pub light_position: [f32; 4],
    /// Line colour for orbit paths.
    pub color: [f32; 4],
    /// `x` = ambient term.
    pub params: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<DrawUniform>() as u64 <= UNIFORM_STRIDE);

/// Values shared by every draw of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub light_position: Vec3,
    pub line_color: [f32; 3],
    pub ambient: f32,
}

impl DrawUniform {
    pub fn new(model_view: Mat4, frame: &FrameUniforms) -> Self {
        let [r, g, b] = frame.line_color;
        Self {
            model_view: model_view.to_cols_array_2d(),
            projection: frame.projection.to_cols_array_2d(),
            light_position: frame.light_position.extend(1.0).to_array(),
            color: [r, g, b, 1.0],
            params: [frame.ambient, 0.0, 0.0, 0.0],
        }
    }
}

/// Lay `uniforms` out at [`UNIFORM_STRIDE`] intervals.
pub fn pack_uniforms(uniforms: &[DrawUniform]) -> Vec<u8> {
    let stride = UNIFORM_STRIDE as usize;
    let mut bytes = vec![0u8; uniforms.len() * stride];
    for (slot, uniform) in bytes.chunks_exact_mut(stride).zip(uniforms) {
        let raw = bytemuck::bytes_of(uniform);
        slot[..raw.len()].copy_from_slice(raw);
    }
    bytes
}

/// Dynamic offset of `slot`.
pub fn slot_offset(slot: usize) -> wgpu::DynamicOffset {
    (slot as u64 * UNIFORM_STRIDE) as wgpu::DynamicOffset
}

/// Layout of group 0: one uniform buffer with a dynamic offset.
pub fn draw_uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("draw-uniform-bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
            },
            count: None,
        }],
    })
}

/// The frame's uniform buffer, grown when a frame has more draws than slots.
pub struct UniformArena {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

impl UniformArena {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let (buffer, bind_group) = Self::allocate(device, layout, INITIAL_SLOTS);
        Self {
            buffer,
            bind_group,
            capacity: INITIAL_SLOTS,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw-uniforms"),
            size: slots as u64 * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw-uniforms-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Write `uniforms` into slots `0..len`, reallocating if needed.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        uniforms: &[DrawUniform],
    ) {
        if uniforms.len() > self.capacity {
            let slots = uniforms.len().next_power_of_two();
            log::debug!("Growing draw uniform buffer to {slots} slots");
            let (buffer, bind_group) = Self::allocate(device, layout, slots);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = slots;
        }
        if !uniforms.is_empty() {
            queue.write_buffer(&self.buffer, 0, &pack_uniforms(uniforms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;

    fn frame() -> FrameUniforms {
        FrameUniforms {
            projection: Mat4::IDENTITY,
            light_position: Vec3::new(0.0, 0.0, -11.0),
            line_color: [0.35, 0.45, 0.6],
            ambient: 0.15,
        }
    }

    #[test]
    fn test_uniform_matches_wgsl_size() {
        // 2 x mat4x4<f32> + 3 x vec4<f32>
        assert_eq!(std::mem::size_of::<DrawUniform>(), 176);
    }

    #[test]
    fn test_uniform_fields() {
        let mv = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = DrawUniform::new(mv, &frame());
        assert_eq!(u.model_view[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.light_position, [0.0, 0.0, -11.0, 1.0]);
        assert_eq!(u.color, [0.35, 0.45, 0.6, 1.0]);
        assert_eq!(u.params[0], 0.15);
    }

    #[test]
    fn test_pack_places_each_draw_at_stride() {
        let a = DrawUniform::new(Mat4::IDENTITY, &frame());
        let b = DrawUniform::new(Mat4::from_scale(Vec3::splat(2.0)), &frame());
        let bytes = pack_uniforms(&[a, b]);
        assert_eq!(bytes.len(), 512);
        let size = std::mem::size_of::<DrawUniform>();
        assert_eq!(&bytes[..size], bytemuck::bytes_of(&a));
        assert!(bytes[size..256].iter().all(|&x| x == 0));
        assert_eq!(&bytes[256..256 + size], bytemuck::bytes_of(&b));
    }

    #[test]
    fn test_slot_offsets() {
        assert_eq!(slot_offset(0), 0);
        assert_eq!(slot_offset(1), 256);
        assert_eq!(slot_offset(30), 7680);
    }

    #[test]
    fn test_arena_grows() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let layout = draw_uniform_layout(&device);
        let mut arena = UniformArena::new(&device, &layout);
        assert_eq!(arena.capacity(), 64);

        let draws = vec![DrawUniform::new(Mat4::IDENTITY, &frame()); 100];
        arena.upload(&device, &queue, &layout, &draws);
        assert_eq!(arena.capacity(), 128);
    }
}
