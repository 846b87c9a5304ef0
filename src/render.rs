use bytemuck::{Pod, Zeroable};
use wgpu;
use std::num::NonZeroU64;

pub const MIN_ZOOM: f32 = 1.0; // Min zoom is 1:1 pixel mapping
pub const MAX_ZOOM: f32 = 64.0; // Max zoom factor
pub const ZOOM_FACTOR_STEP: f32 = 1.2; // How much each wheel step zooms
/// Starting cell size in pixels when a simulation opens.
pub const DEFAULT_ZOOM: f32 = 4.0;

// Dimensions of the cell snapshot buffer, shared with the fragment shader
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct GridParams {
    pub width: u32,
    pub height: u32,
    pub _pad: [u32; 2], // 16-byte uniform size
}

// View transform and display flags for the fragment shader
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ViewParams {
    pub zoom: f32,
    pub show_ghosts: u32,
    pub view_offset: [f32; 2], // vec2 alignment puts this at offset 8
}

pub fn create_render_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Render Bind Group Layout"),
        entries: &[
            // GridParams Uniform (Binding 0)
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<GridParams>() as u64),
                },
                count: None,
            },
            // Cell Snapshot Buffer (Binding 1)
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // ViewParams Uniform (Binding 2)
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<ViewParams>() as u64),
                },
                count: None,
            },
        ],
    })
}

pub fn create_render_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    grid_param_buffer: &wgpu::Buffer,
    cell_buffer: &wgpu::Buffer,
    view_param_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Render Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: grid_param_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 1, resource: cell_buffer.as_entire_binding() },
            wgpu::BindGroupEntry { binding: 2, resource: view_param_buffer.as_entire_binding() },
        ],
    })
}
