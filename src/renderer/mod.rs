pub mod bloom;
pub mod camera;
pub mod mesh;
pub mod renderer;
pub mod vertex;

/// Offscreen scene target; HDR so emissive colors survive until the bloom
/// threshold is applied.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
