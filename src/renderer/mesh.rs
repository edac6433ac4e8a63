use crate::atom::shell::ShellGroup;
use crate::renderer::vertex::SceneVertex;
use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};
use wgpu::util::DeviceExt;

// Tessellation matching the reference scene: spheres at 16x32, tori with
// 126 segments around the ring and 32 around the tube.
const SPHERE_LATITUDES: u32 = 16;
const SPHERE_LONGITUDES: u32 = 32;
const TORUS_RING_SEGMENTS: u32 = 126;
const TORUS_TUBE_SEGMENTS: u32 = 32;

/// CPU-side triangle soup appended to by the primitive generators.
#[derive(Default, Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<SceneVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a UV sphere with latitude/longitude subdivisions.
    pub fn push_sphere(&mut self, center: Vec3, radius: f32, color: [f32; 4]) {
        let base = self.vertices.len() as u32;

        for lat in 0..=SPHERE_LATITUDES {
            let theta = lat as f32 * PI / SPHERE_LATITUDES as f32;
            let sin_theta = theta.sin();
            let cos_theta = theta.cos();

            for lon in 0..=SPHERE_LONGITUDES {
                let phi = lon as f32 * TAU / SPHERE_LONGITUDES as f32;
                let x = phi.cos() * sin_theta;
                let y = cos_theta;
                let z = phi.sin() * sin_theta;

                self.vertices.push(SceneVertex::new(
                    center + Vec3::new(x, y, z) * radius,
                    color,
                ));
            }
        }

        for lat in 0..SPHERE_LATITUDES {
            for lon in 0..SPHERE_LONGITUDES {
                let first = base + lat * (SPHERE_LONGITUDES + 1) + lon;
                let second = first + SPHERE_LONGITUDES + 1;

                self.indices.extend_from_slice(&[
                    first,
                    second,
                    first + 1,
                    second,
                    second + 1,
                    first + 1,
                ]);
            }
        }
    }

    /// Appends a torus lying in the XY plane around `center`.
    pub fn push_torus(
        &mut self,
        center: Vec3,
        ring_radius: f32,
        tube_radius: f32,
        color: [f32; 4],
    ) {
        let base = self.vertices.len() as u32;

        for ring in 0..=TORUS_RING_SEGMENTS {
            let u = ring as f32 * TAU / TORUS_RING_SEGMENTS as f32;
            for tube in 0..=TORUS_TUBE_SEGMENTS {
                let v = tube as f32 * TAU / TORUS_TUBE_SEGMENTS as f32;
                let swept = ring_radius + tube_radius * v.cos();
                let position = Vec3::new(
                    swept * u.cos(),
                    swept * u.sin(),
                    tube_radius * v.sin(),
                );
                self.vertices.push(SceneVertex::new(center + position, color));
            }
        }

        for ring in 0..TORUS_RING_SEGMENTS {
            for tube in 0..TORUS_TUBE_SEGMENTS {
                let first = base + ring * (TORUS_TUBE_SEGMENTS + 1) + tube;
                let second = first + TORUS_TUBE_SEGMENTS + 1;

                self.indices.extend_from_slice(&[
                    first,
                    second,
                    first + 1,
                    second,
                    second + 1,
                    first + 1,
                ]);
            }
        }
    }
}

/// Bakes one shell group into two meshes: the opaque primitives
/// (particles and the shared path ring) and the translucent orbit rings.
pub fn bake_shell_group(group: &ShellGroup) -> (MeshData, MeshData) {
    let mut solid = MeshData::default();
    let mut translucent = MeshData::default();

    for particle in &group.particles {
        let [r, g, b] = particle.color;
        solid.push_sphere(particle.position, particle.radius, [r, g, b, 1.0]);
    }

    let path = &group.path_ring;
    solid.push_torus(path.center, path.ring_radius, path.tube_radius, path.color);

    for ring in &group.orbit_rings {
        translucent.push_torus(ring.center, ring.ring_radius, ring.tube_radius, ring.color);
    }

    (solid, translucent)
}

/// Vertex/index buffers for one baked mesh.
pub struct DrawBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl DrawBuffer {
    pub fn new(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: data.indices.len() as u32,
        }
    }

    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
}

/// GPU resources for one shell group: its two draw buffers plus the
/// model-matrix uniform carrying the accumulated rotation.
pub struct GroupMesh {
    pub solid: Option<DrawBuffer>,
    pub translucent: Option<DrawBuffer>,
    model_buffer: wgpu::Buffer,
    pub model_bind_group: wgpu::BindGroup,
}

impl GroupMesh {
    pub fn new(
        device: &wgpu::Device,
        model_layout: &wgpu::BindGroupLayout,
        group: &ShellGroup,
    ) -> Self {
        let (solid_data, translucent_data) = bake_shell_group(group);

        let solid = (!solid_data.is_empty())
            .then(|| DrawBuffer::new(device, "Shell Solid Buffer", &solid_data));
        let translucent = (!translucent_data.is_empty())
            .then(|| DrawBuffer::new(device, "Shell Orbit Ring Buffer", &translucent_data));

        let uniform = ModelUniform {
            model: Mat4::from_quat(group.rotation).to_cols_array_2d(),
        };
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shell Model Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
            label: Some("shell_model_bind_group"),
        });

        Self {
            solid,
            translucent,
            model_buffer,
            model_bind_group,
        }
    }

    pub fn write_rotation(&self, queue: &wgpu::Queue, group: &ShellGroup) {
        let uniform = ModelUniform {
            model: Mat4::from_quat(group.rotation).to_cols_array_2d(),
        };
        queue.write_buffer(&self.model_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::catalog::{AxisFlags, ShellKind, ShellSpec};

    fn spec(count: u32) -> ShellSpec {
        ShellSpec {
            kind: ShellKind::Proton,
            color: [0.0, 0.5, 0.0],
            angular_speed: 0.002,
            shell_radius: 7.0,
            particle_count: count,
            particle_size: 0.03,
            axes: AxisFlags::new(true, true, false),
        }
    }

    #[test]
    fn sphere_has_expected_vertex_and_index_counts() {
        let mut data = MeshData::default();
        data.push_sphere(Vec3::ZERO, 1.0, [1.0; 4]);
        let expected_vertices = ((SPHERE_LATITUDES + 1) * (SPHERE_LONGITUDES + 1)) as usize;
        let expected_indices = (SPHERE_LATITUDES * SPHERE_LONGITUDES * 6) as usize;
        assert_eq!(data.vertices.len(), expected_vertices);
        assert_eq!(data.indices.len(), expected_indices);
    }

    #[test]
    fn sphere_vertices_lie_on_the_radius() {
        let center = Vec3::new(3.0, -1.0, 2.0);
        let mut data = MeshData::default();
        data.push_sphere(center, 0.5, [1.0; 4]);
        for vertex in &data.vertices {
            let distance = (Vec3::from(vertex.position) - center).length();
            assert!((distance - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn torus_vertices_stay_inside_the_tube() {
        let mut data = MeshData::default();
        data.push_torus(Vec3::ZERO, 7.0, 0.1, [1.0; 4]);
        for vertex in &data.vertices {
            let p = Vec3::from(vertex.position);
            let radial = (p.x * p.x + p.y * p.y).sqrt();
            assert!((radial - 7.0).abs() <= 0.1 + 1e-5);
            assert!(p.z.abs() <= 0.1 + 1e-5);
        }
    }

    #[test]
    fn torus_indices_stay_in_bounds() {
        let mut data = MeshData::default();
        data.push_torus(Vec3::ZERO, 5.0, 0.01, [1.0; 4]);
        let count = data.vertices.len() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn baked_group_splits_solid_and_translucent() {
        let group = ShellGroup::build(spec(3));
        let (solid, translucent) = bake_shell_group(&group);

        // 3 spheres + 1 path torus vs 3 orbit tori.
        let sphere_vertices = ((SPHERE_LATITUDES + 1) * (SPHERE_LONGITUDES + 1)) as usize;
        let torus_vertices = ((TORUS_RING_SEGMENTS + 1) * (TORUS_TUBE_SEGMENTS + 1)) as usize;
        assert_eq!(solid.vertices.len(), 3 * sphere_vertices + torus_vertices);
        assert_eq!(translucent.vertices.len(), 3 * torus_vertices);
    }

    #[test]
    fn empty_shell_bakes_only_the_path_ring() {
        let group = ShellGroup::build(spec(0));
        let (solid, translucent) = bake_shell_group(&group);
        let torus_vertices = ((TORUS_RING_SEGMENTS + 1) * (TORUS_TUBE_SEGMENTS + 1)) as usize;
        assert_eq!(solid.vertices.len(), torus_vertices);
        assert!(translucent.is_empty());
    }

    #[test]
    fn translucent_vertices_carry_half_alpha() {
        let group = ShellGroup::build(spec(2));
        let (_, translucent) = bake_shell_group(&group);
        assert!(translucent.vertices.iter().all(|v| v.color[3] == 0.5));
    }
}
