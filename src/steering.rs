use crate::settings::EngineSettings;
use crate::vec2::Vec2;

/// Banded pointer force: repulsion inside the near band, a weak pull in the
/// mid band, nothing beyond the far threshold.
///
/// Both bands use strict `<` comparisons, so a distance exactly on the near
/// threshold contributes no force at all.
pub fn pointer_band_force(pos: Vec2, pointer: Vec2, s: &EngineSettings) -> Vec2 {
    let offset = pointer - pos;
    let distance = offset.length();
    if distance <= 0.0 {
        return Vec2::ZERO;
    }
    let dir = offset * (1.0 / distance);

    if distance < s.near_threshold {
        dir * (-(s.near_threshold - distance) * s.repulse_gain)
    } else if distance < s.far_threshold {
        dir * ((distance - s.near_threshold) * s.attract_gain)
    } else {
        Vec2::ZERO
    }
}

/// Arrival steering toward the rest target: full speed outside the arrival
/// radius, linearly reduced inside it, zero at the target. The resulting
/// steering force is limited to `max_force` and damped.
pub fn arrival_force(
    pos: Vec2,
    vel: Vec2,
    target: Vec2,
    max_speed: f32,
    max_force: f32,
    s: &EngineSettings,
) -> Vec2 {
    let offset = target - pos;
    let distance = offset.length();

    let speed = if distance < s.arrival_radius && s.arrival_radius > 0.0 {
        max_speed * distance / s.arrival_radius
    } else {
        max_speed
    };

    let desired = if distance > 0.0 {
        offset * (speed / distance)
    } else {
        Vec2::ZERO
    };

    let steer = (desired - vel).clamp_length(max_force);
    steer * s.steer_damping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EngineSettings {
        EngineSettings::default()
    }

    #[test]
    fn test_repulsion_points_away() {
        let s = settings();
        let force = pointer_band_force(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), &s);
        assert!(force.x < 0.0, "agent pushed away from a close pointer");
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn test_repulsion_stronger_when_closer() {
        let s = settings();
        let close = pointer_band_force(Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0), &s);
        let far = pointer_band_force(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), &s);
        assert!(close.length() > far.length());
    }

    #[test]
    fn test_attraction_points_toward() {
        let s = settings();
        let force = pointer_band_force(Vec2::new(0.0, 0.0), Vec2::new(150.0, 0.0), &s);
        assert!(force.x > 0.0, "mid-band pointer pulls the agent");
    }

    #[test]
    fn test_band_edge_is_force_free() {
        // Distance exactly on the near threshold: neither band applies
        let s = settings();
        let force = pointer_band_force(
            Vec2::new(0.0, 0.0),
            Vec2::new(s.near_threshold, 0.0),
            &s,
        );
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_beyond_far_threshold_is_force_free() {
        let s = settings();
        let at_far = pointer_band_force(Vec2::new(0.0, 0.0), Vec2::new(s.far_threshold, 0.0), &s);
        assert_eq!(at_far, Vec2::ZERO);
        let beyond = pointer_band_force(Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0), &s);
        assert_eq!(beyond, Vec2::ZERO);
    }

    #[test]
    fn test_coincident_pointer_is_force_free() {
        let s = settings();
        let force = pointer_band_force(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), &s);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_arrival_zero_at_target() {
        let s = settings();
        let target = Vec2::new(40.0, 40.0);
        let force = arrival_force(target, Vec2::ZERO, target, 3.0, 0.3, &s);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_arrival_slows_inside_radius() {
        let s = settings();
        // At rest, desired speed equals the steering magnitude before damping
        let near = arrival_force(Vec2::new(0.0, 0.0), Vec2::ZERO, Vec2::new(10.0, 0.0), 3.0, 10.0, &s);
        let far = arrival_force(Vec2::new(0.0, 0.0), Vec2::ZERO, Vec2::new(500.0, 0.0), 3.0, 10.0, &s);
        assert!(near.length() < far.length());
    }

    #[test]
    fn test_arrival_limited_by_max_force() {
        let s = settings();
        let max_force = 0.2;
        let force = arrival_force(
            Vec2::new(0.0, 0.0),
            Vec2::new(-3.0, 0.0),
            Vec2::new(500.0, 0.0),
            3.0,
            max_force,
            &s,
        );
        assert!(force.length() <= max_force * s.steer_damping + 1e-5);
    }
}
