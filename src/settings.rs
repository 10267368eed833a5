use serde::{Deserialize, Serialize};

/// All field-engine tunables consolidated into one struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    // === Field Layout ===
    /// Number of agents in the field (capped to grid capacity)
    pub agent_count: usize,
    /// Grid columns for rest positions
    pub grid_cols: usize,
    /// Grid rows for rest positions
    pub grid_rows: usize,
    /// Fraction of each surface dimension covered by the rest grid (0.5-1.0)
    pub grid_fill: f32,
    /// Initial position jitter as a fraction of the surface dimensions
    pub spawn_jitter: f32,

    // === Agent Personality Ranges ===
    /// Per-agent max speed, sampled uniformly from this range
    pub max_speed_min: f32,
    pub max_speed_max: f32,
    /// Per-agent max steering force, sampled uniformly from this range
    pub max_force_min: f32,
    pub max_force_max: f32,
    /// Per-agent render radius in surface units
    pub radius_min: f32,
    pub radius_max: f32,

    // === Pointer Interaction ===
    /// Agents closer than this to the pointer become captured
    pub capture_radius: f32,
    /// Repulsion applies below this pointer distance
    pub near_threshold: f32,
    /// Attraction applies between near_threshold and this distance
    pub far_threshold: f32,
    /// Repulsion force per unit of penetration into the near band
    pub repulse_gain: f32,
    /// Attraction force per unit of distance into the mid band
    pub attract_gain: f32,
    /// Speed multiplier for captured agents chasing the pointer
    pub follow_gain: f32,
    /// Per-tick position blend toward the pointer for captured agents (0-1)
    pub follow_lerp: f32,

    // === Homing ===
    /// Arrival slowdown radius around each rest target
    pub arrival_radius: f32,
    /// Damping applied to the homing steering force
    pub steer_damping: f32,

    // === Connections ===
    /// Agent pairs closer than this render a connecting line
    pub connection_radius: f32,
    /// Line alpha at zero distance, falling linearly to 0 at the radius
    pub connection_max_alpha: f32,

    // === Capture Game ===
    /// Captured-agent size growth per capture
    pub size_step: f32,
    /// Per-tick drift of the captured-agent fade scalar
    pub fade_step: f32,

    // === Celebration ===
    /// Grid opacity while the celebration bursts run
    pub celebration_grid_opacity: f32,
    /// Burst schedule, in milliseconds after the trigger
    pub burst_offsets_ms: Vec<u64>,
    /// When the grid opacity is restored to 1
    pub opacity_restore_ms: u64,
    /// When the round deactivates and the counter starts fading
    pub complete_to_fade_ms: u64,
    /// Delay from fade start to the round reset
    pub fade_to_reset_ms: u64,
    /// Sparks per burst
    pub burst_count: usize,
    /// Burst cone width in degrees
    pub burst_spread: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            // Layout
            agent_count: 80,
            grid_cols: 10,
            grid_rows: 8,
            grid_fill: 0.95,
            spawn_jitter: 0.05,

            // Personality
            max_speed_min: 1.0,
            max_speed_max: 3.0,
            max_force_min: 0.1,
            max_force_max: 0.3,
            radius_min: 2.0,
            radius_max: 4.0,

            // Pointer
            capture_radius: 60.0,
            near_threshold: 120.0,
            far_threshold: 200.0,
            repulse_gain: 0.05,
            attract_gain: 0.01,
            follow_gain: 2.0,
            follow_lerp: 0.1,

            // Homing
            arrival_radius: 100.0,
            steer_damping: 0.1,

            // Connections
            connection_radius: 100.0,
            connection_max_alpha: 0.08,

            // Game
            size_step: 0.01,
            fade_step: 0.02,

            // Celebration
            celebration_grid_opacity: 0.05,
            burst_offsets_ms: vec![0, 800, 1600, 2400],
            opacity_restore_ms: 2000,
            complete_to_fade_ms: 4000,
            fade_to_reset_ms: 1000,
            burst_count: 100,
            burst_spread: 70.0,
        }
    }
}

impl EngineSettings {
    /// Grid capacity: the number of rest positions available
    pub fn grid_capacity(&self) -> usize {
        self.grid_cols * self.grid_rows
    }

    /// Adjust agent count within bounds (takes effect on the next round reset)
    pub fn adjust_agent_count(&mut self, delta: i32) {
        let new_val = (self.agent_count as i32 + delta).clamp(10, 400);
        self.agent_count = new_val as usize;
    }

    /// Adjust capture radius within bounds
    pub fn adjust_capture_radius(&mut self, delta: f32) {
        self.capture_radius = (self.capture_radius + delta).clamp(20.0, 120.0);
    }

    /// Adjust the inner pointer band within bounds
    pub fn adjust_near_threshold(&mut self, delta: f32) {
        self.near_threshold = (self.near_threshold + delta).clamp(40.0, 160.0);
    }

    /// Adjust the outer pointer band within bounds
    pub fn adjust_far_threshold(&mut self, delta: f32) {
        self.far_threshold = (self.far_threshold + delta).clamp(160.0, 320.0);
    }

    /// Adjust repulsion gain within bounds
    pub fn adjust_repulse_gain(&mut self, delta: f32) {
        self.repulse_gain = (self.repulse_gain + delta).clamp(0.01, 0.2);
    }

    /// Adjust attraction gain within bounds
    pub fn adjust_attract_gain(&mut self, delta: f32) {
        self.attract_gain = (self.attract_gain + delta).clamp(0.0, 0.05);
    }

    /// Adjust follow gain within bounds
    pub fn adjust_follow_gain(&mut self, delta: f32) {
        self.follow_gain = (self.follow_gain + delta).clamp(1.0, 4.0);
    }

    /// Adjust connection radius within bounds
    pub fn adjust_connection_radius(&mut self, delta: f32) {
        self.connection_radius = (self.connection_radius + delta).clamp(40.0, 200.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_ordered() {
        let s = EngineSettings::default();
        assert!(s.capture_radius < s.near_threshold);
        assert!(s.near_threshold < s.far_threshold);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut s = EngineSettings::default();
        s.adjust_capture_radius(1000.0);
        assert_eq!(s.capture_radius, 120.0);
        s.adjust_capture_radius(-1000.0);
        assert_eq!(s.capture_radius, 20.0);

        s.adjust_near_threshold(1000.0);
        s.adjust_far_threshold(-1000.0);
        // Clamp ranges keep the bands from inverting
        assert!(s.near_threshold <= s.far_threshold);

        s.adjust_agent_count(-1000);
        assert_eq!(s.agent_count, 10);
        s.adjust_agent_count(1000);
        assert_eq!(s.agent_count, 400);
    }

    #[test]
    fn test_grid_capacity() {
        let s = EngineSettings::default();
        assert_eq!(s.grid_capacity(), 80);
    }
}
