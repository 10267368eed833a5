use crate::agent::Agent;
use crate::settings::EngineSettings;
use crate::vec2::Vec2;
use rand::rngs::ThreadRng;

/// The particle field: owns the agent collection and the shared pointer
/// state, and advances the whole field one tick at a time.
pub struct FieldEngine {
    pub agents: Vec<Agent>,
    pub settings: EngineSettings,
    pub width: f32,
    pub height: f32,
    pub pointer: Vec2,
    pub pointer_inside: bool,
    rng: ThreadRng,
}

impl FieldEngine {
    /// Build the engine with agents laid out on a centered rest grid.
    /// Degenerate surface dimensions yield an empty (recoverable) field.
    pub fn new(width: f32, height: f32, settings: EngineSettings) -> Self {
        let mut engine = Self {
            agents: Vec::new(),
            settings,
            width,
            height,
            pointer: Vec2::new(width / 2.0, height / 2.0),
            pointer_inside: false,
            rng: rand::thread_rng(),
        };
        engine.build_agents();
        engine
    }

    fn build_agents(&mut self) {
        self.agents.clear();
        if self.width <= 0.0 || self.height <= 0.0 {
            return;
        }
        let count = self.settings.agent_count.min(self.settings.grid_capacity());
        for id in 0..count {
            let target = self.rest_position(id);
            self.agents.push(Agent::new(
                id,
                target,
                self.width,
                self.height,
                &self.settings,
                &mut self.rng,
            ));
        }
    }

    /// Rest position for an agent index on the centered grid
    fn rest_position(&self, index: usize) -> Vec2 {
        let cols = self.settings.grid_cols.max(1);
        let rows = self.settings.grid_rows.max(1);
        let grid_w = self.width * self.settings.grid_fill;
        let grid_h = self.height * self.settings.grid_fill;
        let cell_w = grid_w / cols as f32;
        let cell_h = grid_h / rows as f32;
        let start_x = (self.width - grid_w) / 2.0;
        let start_y = (self.height - grid_h) / 2.0;
        let col = index % cols;
        let row = index / cols;
        Vec2::new(
            start_x + cell_w * (col as f32 + 0.5),
            start_y + cell_h * (row as f32 + 0.5),
        )
    }

    /// Advance every agent one tick, in index order. Returns the ids newly
    /// captured on this tick.
    pub fn tick(&mut self, hovering_blocked: bool, round_active: bool) -> Vec<usize> {
        let mut newly_captured = Vec::new();
        for agent in &mut self.agents {
            let captured_now = agent.step(
                self.pointer,
                self.pointer_inside,
                hovering_blocked,
                round_active,
                &self.settings,
            );
            if captured_now {
                newly_captured.push(agent.id);
            }
        }
        newly_captured
    }

    /// Retarget every agent's rest position for the new surface dimensions.
    /// Positions, velocities, and capture flags are untouched; the agents
    /// drift to their new homes under normal steering. Degenerate dimensions
    /// are a no-op.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.width = width;
        self.height = height;
        for index in 0..self.agents.len() {
            self.agents[index].rest_target = self.rest_position(index);
        }
    }

    /// Last-write-wins pointer update with an inside-bounds check.
    /// Out-of-range coordinates are valid input; they just mark the pointer
    /// as outside the surface.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
        self.pointer_inside =
            x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height;
    }

    /// The pointer left the surface entirely.
    pub fn pointer_leave(&mut self) {
        self.pointer_inside = false;
    }

    /// Clear every agent's capture flag for a fresh round.
    pub fn reset_round(&mut self) {
        for agent in &mut self.agents {
            agent.captured = false;
        }
    }

    /// Surface center, used as the default burst origin
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout_count_and_centering() {
        let engine = FieldEngine::new(800.0, 600.0, EngineSettings::default());
        assert_eq!(engine.agents.len(), 80);

        // First rest position sits half a cell into the centered grid
        let s = &engine.settings;
        let grid_w = 800.0 * s.grid_fill;
        let cell_w = grid_w / s.grid_cols as f32;
        let expected_x = (800.0 - grid_w) / 2.0 + cell_w * 0.5;
        assert!((engine.agents[0].rest_target.x - expected_x).abs() < 1e-3);

        // Ids follow creation order
        for (i, agent) in engine.agents.iter().enumerate() {
            assert_eq!(agent.id, i);
        }
    }

    #[test]
    fn test_agent_count_capped_to_grid_capacity() {
        let settings = EngineSettings {
            agent_count: 500,
            ..Default::default()
        };
        let engine = FieldEngine::new(800.0, 600.0, settings);
        assert_eq!(engine.agents.len(), 80);
    }

    #[test]
    fn test_degenerate_surface_is_recoverable() {
        let engine = FieldEngine::new(0.0, 600.0, EngineSettings::default());
        assert!(engine.agents.is_empty());

        let engine = FieldEngine::new(800.0, -5.0, EngineSettings::default());
        assert!(engine.agents.is_empty());
    }

    #[test]
    fn test_resize_retargets_without_teleporting() {
        let mut engine = FieldEngine::new(800.0, 600.0, EngineSettings::default());
        engine.agents[3].captured = true;
        let pos_before: Vec<_> = engine.agents.iter().map(|a| a.pos).collect();
        let vel_before: Vec<_> = engine.agents.iter().map(|a| a.vel).collect();
        let target_before = engine.agents[0].rest_target;

        engine.resize(1200.0, 400.0);

        for (i, agent) in engine.agents.iter().enumerate() {
            assert_eq!(agent.pos, pos_before[i]);
            assert_eq!(agent.vel, vel_before[i]);
        }
        assert!(engine.agents[3].captured);
        assert!(engine.agents[0].rest_target.x != target_before.x);
    }

    #[test]
    fn test_resize_degenerate_noop() {
        let mut engine = FieldEngine::new(800.0, 600.0, EngineSettings::default());
        let targets: Vec<_> = engine.agents.iter().map(|a| a.rest_target).collect();
        engine.resize(0.0, 0.0);
        assert_eq!(engine.width, 800.0);
        for (i, agent) in engine.agents.iter().enumerate() {
            assert_eq!(agent.rest_target, targets[i]);
        }
    }

    #[test]
    fn test_pointer_bounds_check() {
        let mut engine = FieldEngine::new(800.0, 600.0, EngineSettings::default());
        engine.set_pointer(400.0, 300.0);
        assert!(engine.pointer_inside);

        // The origin is a valid inside position, not a sentinel
        engine.set_pointer(0.0, 0.0);
        assert!(engine.pointer_inside);

        engine.set_pointer(-1.0, 300.0);
        assert!(!engine.pointer_inside);
        engine.set_pointer(400.0, 601.0);
        assert!(!engine.pointer_inside);

        engine.set_pointer(400.0, 300.0);
        engine.pointer_leave();
        assert!(!engine.pointer_inside);
    }

    #[test]
    fn test_tick_reports_each_capture_once() {
        let mut engine = FieldEngine::new(800.0, 600.0, EngineSettings::default());
        let target = engine.agents[0].pos;
        engine.set_pointer(target.x, target.y);

        let newly = engine.tick(false, true);
        assert!(newly.contains(&0));

        let again = engine.tick(false, true);
        assert!(!again.contains(&0), "agent 0 already captured");
    }

    #[test]
    fn test_reset_round_clears_captures() {
        let mut engine = FieldEngine::new(800.0, 600.0, EngineSettings::default());
        let target = engine.agents[0].pos;
        engine.set_pointer(target.x, target.y);
        engine.tick(false, true);
        assert!(engine.agents[0].captured);

        engine.reset_round();
        assert!(engine.agents.iter().all(|a| !a.captured));
    }
}
