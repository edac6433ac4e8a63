use crate::atom::shell::ShellGroup;
use glam::Quat;

/// Advances a shell group's orientation by one frame.
///
/// Rotation is a fixed increment per invocation, so the apparent speed is
/// tied to the render cadence. Axes compose in X, Y, Z order about the
/// group's local frame; Z turns at double rate. The quaternion is
/// renormalized every step so long runs do not drift.
pub fn advance(group: &mut ShellGroup) {
    let axes = group.spec.axes;
    let speed = group.spec.angular_speed;
    let mut rotation = group.rotation;

    if axes.x {
        rotation *= Quat::from_rotation_x(speed);
    }
    if axes.y {
        rotation *= Quat::from_rotation_y(speed);
    }
    if axes.z {
        rotation *= Quat::from_rotation_z(speed * 2.0);
    }

    group.rotation = rotation.normalize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::catalog::{AxisFlags, ShellKind, ShellSpec};

    fn group(axes: AxisFlags, speed: f32) -> ShellGroup {
        ShellGroup::build(ShellSpec {
            kind: ShellKind::Neutron,
            color: [1.0; 3],
            angular_speed: speed,
            shell_radius: 5.0,
            particle_count: 2,
            particle_size: 0.025,
            axes,
        })
    }

    #[test]
    fn x_rotation_is_additive() {
        let speed = 0.002;
        let steps = 500;
        let mut stepped = group(AxisFlags::new(true, false, false), speed);
        for _ in 0..steps {
            advance(&mut stepped);
        }

        let expected = Quat::from_rotation_x(speed * steps as f32);
        assert!(
            stepped.rotation.angle_between(expected) < 1e-3,
            "net rotation diverged: {:?}",
            stepped.rotation
        );
    }

    #[test]
    fn z_axis_turns_at_double_rate() {
        let speed = 0.0035;
        let mut g = group(AxisFlags::new(false, false, true), speed);
        advance(&mut g);
        let expected = Quat::from_rotation_z(speed * 2.0);
        assert!(g.rotation.angle_between(expected) < 1e-6);
    }

    #[test]
    fn disabled_axes_leave_orientation_untouched() {
        let mut g = group(AxisFlags::new(false, false, false), 0.01);
        for _ in 0..10 {
            advance(&mut g);
        }
        assert_eq!(g.rotation, Quat::IDENTITY);
    }

    #[test]
    fn orientation_stays_normalized_over_long_runs() {
        let mut g = group(AxisFlags::new(true, true, true), 0.0035);
        for _ in 0..100_000 {
            advance(&mut g);
        }
        assert!((g.rotation.length() - 1.0).abs() < 1e-4);
    }
}
