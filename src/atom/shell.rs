use crate::atom::catalog::ShellSpec;
use glam::{Quat, Vec3};
use std::f32::consts::TAU;

/// HDR multiplier applied to particle colors so they cross the bloom
/// threshold.
pub const EMISSIVE_INTENSITY: f32 = 25.0;

/// Tint shared by every per-particle orbit ring.
pub const ORBIT_RING_COLOR: [f32; 4] = [0.620, 0.804, 0.859, 0.5];
/// Tint shared by every orbital path ring.
pub const PATH_RING_COLOR: [f32; 4] = [0.631, 0.780, 1.0, 1.0];

/// A glowing sphere sitting on the shell circle.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub radius: f32,
    /// Emissive color, already scaled past 1.0 for bloom.
    pub color: [f32; 3],
}

/// A torus lying in the XY plane of the group's local frame.
#[derive(Clone, Copy, Debug)]
pub struct Ring {
    pub center: Vec3,
    pub ring_radius: f32,
    pub tube_radius: f32,
    pub color: [f32; 4],
}

/// Renderable primitives for one shell, plus its accumulated orientation.
///
/// Rebuilt whole on every selection change; never patched in place.
#[derive(Clone, Debug)]
pub struct ShellGroup {
    pub spec: ShellSpec,
    pub particles: Vec<Particle>,
    pub orbit_rings: Vec<Ring>,
    pub path_ring: Ring,
    pub rotation: Quat,
}

impl ShellGroup {
    pub fn build(spec: ShellSpec) -> Self {
        let count = spec.particle_count;
        let mut particles = Vec::with_capacity(count as usize);
        let mut orbit_rings = Vec::with_capacity(count as usize);

        let emissive = [
            spec.color[0] * EMISSIVE_INTENSITY,
            spec.color[1] * EMISSIVE_INTENSITY,
            spec.color[2] * EMISSIVE_INTENSITY,
        ];

        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let position = Vec3::new(
                angle.cos() * spec.shell_radius,
                angle.sin() * spec.shell_radius,
                0.0,
            );

            particles.push(Particle {
                position,
                radius: spec.particle_size,
                color: emissive,
            });

            orbit_rings.push(Ring {
                center: position,
                ring_radius: spec.shell_radius + spec.particle_size,
                tube_radius: spec.particle_size / 7.0,
                color: ORBIT_RING_COLOR,
            });
        }

        // The orbital path stays visible even for an unoccupied shell.
        let path_ring = Ring {
            center: Vec3::ZERO,
            ring_radius: spec.shell_radius,
            tube_radius: spec.particle_size / 6.0,
            color: PATH_RING_COLOR,
        };

        Self {
            spec,
            particles,
            orbit_rings,
            path_ring,
            rotation: Quat::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::catalog::{AxisFlags, ShellKind};

    fn spec(count: u32) -> ShellSpec {
        ShellSpec {
            kind: ShellKind::Electron,
            color: [0.1, 0.4, 1.0],
            angular_speed: 0.0035,
            shell_radius: 13.0,
            particle_count: count,
            particle_size: 0.02,
            axes: AxisFlags::new(true, false, true),
        }
    }

    #[test]
    fn build_emits_one_primitive_set_per_particle() {
        for n in [1u32, 2, 6, 12] {
            let group = ShellGroup::build(spec(n));
            assert_eq!(group.particles.len(), n as usize);
            assert_eq!(group.orbit_rings.len(), n as usize);
        }
    }

    #[test]
    fn particles_lie_on_the_shell_circle() {
        let group = ShellGroup::build(spec(7));
        for particle in &group.particles {
            assert!((particle.position.length() - 13.0).abs() < 1e-6);
            assert_eq!(particle.position.z, 0.0);
        }
    }

    #[test]
    fn particles_are_evenly_spaced() {
        let n = 5;
        let group = ShellGroup::build(spec(n));
        let step = TAU / n as f32;
        for (i, particle) in group.particles.iter().enumerate() {
            let expected = step * i as f32;
            let angle = particle.position.y.atan2(particle.position.x);
            let diff = (angle - expected).rem_euclid(TAU);
            assert!(diff < 1e-5 || (TAU - diff) < 1e-5, "particle {i}");
        }
    }

    #[test]
    fn empty_shell_still_has_its_path_ring() {
        let group = ShellGroup::build(spec(0));
        assert!(group.particles.is_empty());
        assert!(group.orbit_rings.is_empty());
        assert_eq!(group.path_ring.ring_radius, 13.0);
        assert_eq!(group.path_ring.center, Vec3::ZERO);
    }

    #[test]
    fn ring_radii_follow_particle_size() {
        let group = ShellGroup::build(spec(3));
        let orbit = &group.orbit_rings[0];
        assert!((orbit.ring_radius - (13.0 + 0.02)).abs() < 1e-6);
        assert!((orbit.tube_radius - 0.02 / 7.0).abs() < 1e-6);
        assert!((group.path_ring.tube_radius - 0.02 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn orbit_rings_are_centered_on_their_particles() {
        let group = ShellGroup::build(spec(4));
        for (particle, ring) in group.particles.iter().zip(&group.orbit_rings) {
            assert_eq!(particle.position, ring.center);
        }
    }

    #[test]
    fn particle_color_is_emissive() {
        let group = ShellGroup::build(spec(1));
        let color = group.particles[0].color;
        assert!(color[2] > 1.0, "particles must exceed the bloom threshold");
    }
}
