use glam::{Mat4, Vec2, Vec3, Vec4};

/// Free orbit camera circling the atom at the origin.
///
/// Azimuth/elevation/distance parameterization; the initial pose sits 30
/// units down the +Z axis, matching the reference view.
pub struct OrbitCamera {
    pub target: Vec3,
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

pub const INITIAL_DISTANCE: f32 = 30.0;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 120.0;
const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl OrbitCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            azimuth: 0.0,
            elevation: 0.0,
            distance: INITIAL_DISTANCE,
            aspect,
            fovy: 45.0,
            znear: 0.1,
            zfar: 500.0,
        }
    }

    /// Eye position derived from the orbit parameters. At azimuth 0 and
    /// elevation 0 the eye is `distance` along +Z from the target.
    pub fn eye(&self) -> Vec3 {
        let cos_el = self.elevation.cos();
        let offset = Vec3::new(
            cos_el * self.azimuth.sin(),
            self.elevation.sin(),
            cos_el * self.azimuth.cos(),
        ) * self.distance;
        self.target + offset
    }

    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation =
            (self.elevation + delta_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.znear, self.zfar);

        // WGPU's coordinate system is different from OpenGL's, so we need this correction matrix.
        const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0, 0.0, 1.0,
        ]);

        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    /// Projects a world point to pixel coordinates, together with the
    /// pixels-per-world-unit scale at that depth. Returns `None` behind
    /// the eye.
    pub fn project_to_screen(
        &self,
        world: Vec3,
        viewport: Vec2,
    ) -> Option<(Vec2, f32)> {
        let clip = self.build_view_projection_matrix() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        let screen = Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        );

        let proj_scale = 1.0 / (self.fovy.to_radians() * 0.5).tan();
        let pixels_per_unit = proj_scale * viewport.y * 0.5 / clip.w;
        Some((screen, pixels_per_unit))
    }
}

// This is the data we'll send to the GPU.
// We need the `repr(C)` and bytemuck traits for memory layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &OrbitCamera) {
        self.view_proj = camera.build_view_projection_matrix().to_cols_array_2d();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_eye_is_thirty_units_down_z() {
        let camera = OrbitCamera::new(16.0 / 9.0);
        let eye = camera.eye();
        assert!((eye - Vec3::new(0.0, 0.0, 30.0)).length() < 1e-5);
    }

    #[test]
    fn elevation_is_clamped_at_the_poles() {
        let mut camera = OrbitCamera::new(1.0);
        camera.orbit(0.0, 10.0);
        assert!(camera.elevation < std::f32::consts::FRAC_PI_2);
        camera.orbit(0.0, -20.0);
        assert!(camera.elevation > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn zoom_stays_within_bounds() {
        let mut camera = OrbitCamera::new(1.0);
        camera.zoom(0.0001);
        assert!(camera.distance >= 2.0);
        camera.zoom(1e6);
        assert!(camera.distance <= 120.0);
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let camera = OrbitCamera::new(1.0);
        let (screen, _) = camera
            .project_to_screen(Vec3::ZERO, Vec2::new(800.0, 600.0))
            .unwrap();
        assert!((screen.x - 400.0).abs() < 1e-2);
        assert!((screen.y - 300.0).abs() < 1e-2);
    }

    #[test]
    fn points_behind_the_eye_are_rejected() {
        let camera = OrbitCamera::new(1.0);
        let behind = Vec3::new(0.0, 0.0, 100.0);
        assert!(camera
            .project_to_screen(behind, Vec2::new(800.0, 600.0))
            .is_none());
    }
}
