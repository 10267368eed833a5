use crate::agent::Agent;
use crate::settings::EngineSettings;
use crate::vec2::Vec2;

/// Grid opacity below which connection lines are not worth computing
pub const VISIBILITY_GATE: f32 = 0.05;

/// One visible agent pair, annotated with its rendering alpha
#[derive(Debug, Clone, Copy)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub a_pos: Vec2,
    pub b_pos: Vec2,
    pub alpha: f32,
}

/// Enumerate every unordered agent pair within the connection radius exactly
/// once. Alpha falls linearly from `connection_max_alpha` at distance zero to
/// 0 at the radius. Skipped entirely while the grid is effectively invisible.
pub fn connections(
    agents: &[Agent],
    s: &EngineSettings,
    grid_opacity: f32,
) -> Vec<Connection> {
    if grid_opacity < VISIBILITY_GATE {
        return Vec::new();
    }

    let radius = s.connection_radius;
    let mut out = Vec::new();

    for i in 0..agents.len() {
        for j in (i + 1)..agents.len() {
            let d = agents[i].pos.distance_to(agents[j].pos);
            if d < radius {
                out.push(Connection {
                    a: agents[i].id,
                    b: agents[j].id,
                    a_pos: agents[i].pos,
                    b_pos: agents[j].pos,
                    alpha: s.connection_max_alpha * (1.0 - d / radius),
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn agents_at(positions: &[(f32, f32)]) -> Vec<Agent> {
        let s = EngineSettings::default();
        let mut rng = StdRng::seed_from_u64(11);
        positions
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| {
                let mut a = Agent::new(id, Vec2::new(x, y), 800.0, 600.0, &s, &mut rng);
                a.pos = Vec2::new(x, y);
                a
            })
            .collect()
    }

    #[test]
    fn test_each_pair_reported_once() {
        let s = EngineSettings::default();
        let agents = agents_at(&[(0.0, 0.0), (50.0, 0.0), (30.0, 40.0)]);
        let conns = connections(&agents, &s, 1.0);
        assert_eq!(conns.len(), 3);
        for c in &conns {
            assert!(c.a < c.b, "pairs enumerated with a < b only");
        }
    }

    #[test]
    fn test_alpha_independent_of_iteration_order() {
        let s = EngineSettings::default();
        let forward = agents_at(&[(0.0, 0.0), (60.0, 0.0)]);
        let reversed = agents_at(&[(60.0, 0.0), (0.0, 0.0)]);
        let a = connections(&forward, &s, 1.0);
        let b = connections(&reversed, &s, 1.0);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert!((a[0].alpha - b[0].alpha).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_falls_linearly() {
        let s = EngineSettings::default();
        let agents = agents_at(&[(0.0, 0.0), (50.0, 0.0)]);
        let conns = connections(&agents, &s, 1.0);
        let expected = s.connection_max_alpha * (1.0 - 50.0 / s.connection_radius);
        assert!((conns[0].alpha - expected).abs() < 1e-6);
    }

    #[test]
    fn test_radius_boundary_excluded() {
        let s = EngineSettings::default();
        let agents = agents_at(&[(0.0, 0.0), (s.connection_radius, 0.0)]);
        assert!(connections(&agents, &s, 1.0).is_empty());
    }

    #[test]
    fn test_visibility_gate_short_circuits() {
        let s = EngineSettings::default();
        let agents = agents_at(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(connections(&agents, &s, 0.04).is_empty());
        // Exactly at the gate still renders
        assert_eq!(connections(&agents, &s, VISIBILITY_GATE).len(), 1);
    }
}
