use crate::canvas;
use crate::celebration::Celebration;
use crate::effects::SparkOverlay;
use crate::engine::FieldEngine;
use crate::game::CaptureGame;
use crate::graph::{self, Connection};
use crate::presets::PresetManager;
use crate::settings::EngineSettings;
use crate::vec2::Vec2;

/// Frames a transient status notice stays visible
const NOTICE_TTL: u32 = 90;

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    Agents,
    Attract,
    Capture,
    Connect,
    Far,
    Follow,
    Near,
    Repulse,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Agents,
            Focus::Agents => Focus::Attract,
            Focus::Attract => Focus::Capture,
            Focus::Capture => Focus::Connect,
            Focus::Connect => Focus::Far,
            Focus::Far => Focus::Follow,
            Focus::Follow => Focus::Near,
            Focus::Near => Focus::Repulse,
            Focus::Repulse => Focus::Agents, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Repulse,
            Focus::Agents => Focus::Repulse, // Loop back
            Focus::Attract => Focus::Agents,
            Focus::Capture => Focus::Attract,
            Focus::Connect => Focus::Capture,
            Focus::Far => Focus::Connect,
            Focus::Follow => Focus::Far,
            Focus::Near => Focus::Follow,
            Focus::Repulse => Focus::Near,
        }
    }

    /// Get the line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Agents => 0,
            Focus::Attract => 1,
            Focus::Capture => 2,
            Focus::Connect => 3,
            Focus::Far => 4,
            Focus::Follow => 5,
            Focus::Near => 6,
            Focus::Repulse => 7,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state: the field engine plus the capture game and the
/// celebration controller it feeds, and the sidebar UI state around them.
pub struct App {
    pub engine: FieldEngine,
    pub game: CaptureGame,
    pub celebration: Celebration,
    pub sparks: SparkOverlay,
    pub presets: PresetManager,
    /// Captured-agent fade scalar, drifting toward 0 during the celebration
    pub fade_opacity: f32,
    /// True while the pointer hovers the sidebar or the help overlay
    pub hovering_blocked: bool,
    pub paused: bool,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    /// Anchor for the capture counter caption: the first-captured agent
    pub counter_anchor: Option<Vec2>,
    /// Connections computed for the current frame
    pub connections: Vec<Connection>,
    pub notice: Option<(String, u32)>,
    preset_idx: Option<usize>,
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16, settings: EngineSettings) -> Self {
        let (surface_w, surface_h) = canvas::surface_size(canvas_width, canvas_height);
        let engine = FieldEngine::new(surface_w, surface_h, settings);
        let game = CaptureGame::new(engine.agents.len());
        Self {
            engine,
            game,
            celebration: Celebration::new(),
            sparks: SparkOverlay::new(),
            presets: PresetManager::new(),
            fade_opacity: 1.0,
            hovering_blocked: false,
            paused: false,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            counter_anchor: None,
            connections: Vec::new(),
            notice: None,
            preset_idx: None,
        }
    }

    /// Advance one frame: celebration timers, effect sparks, then the field
    /// itself (unless paused), feeding new captures into the game.
    pub fn tick(&mut self, now_ms: u64) {
        let origin = self.engine.center();
        let reset_due =
            self.celebration
                .tick(now_ms, &self.engine.settings, &mut self.sparks, origin);
        if reset_due {
            self.game.reset();
            self.engine.reset_round();
            self.counter_anchor = None;
        }

        let fade_step = self.engine.settings.fade_step;
        if self.celebration.fade_out_captured {
            self.fade_opacity = (self.fade_opacity - fade_step).max(0.0);
        } else {
            self.fade_opacity = (self.fade_opacity + fade_step).min(1.0);
        }

        self.sparks.tick();

        if let Some((_, ttl)) = &mut self.notice {
            *ttl = ttl.saturating_sub(1);
            if *ttl == 0 {
                self.notice = None;
            }
        }

        if self.paused {
            return;
        }

        self.connections = graph::connections(
            &self.engine.agents,
            &self.engine.settings,
            self.celebration.grid_opacity,
        );

        let newly_captured = self
            .engine
            .tick(self.hovering_blocked, self.celebration.round_active);
        if !newly_captured.is_empty() {
            let completed = self
                .game
                .on_agents_captured(&newly_captured, &self.engine.settings);
            if completed {
                self.celebration
                    .trigger(now_ms, &self.engine.settings, &mut self.sparks, origin);
            }
        }

        self.counter_anchor = self
            .game
            .first_captured()
            .and_then(|id| self.engine.agents.get(id))
            .map(|agent| agent.pos);
    }

    /// Forward a pointer position in surface coordinates
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.engine.set_pointer(x, y);
    }

    /// The pointer left the surface
    pub fn pointer_leave(&mut self) {
        self.engine.pointer_leave();
    }

    /// Manually start the win sequence, same as a completed round would
    pub fn trigger_celebration(&mut self, now_ms: u64) {
        let origin = self.engine.center();
        self.celebration
            .trigger(now_ms, &self.engine.settings, &mut self.sparks, origin);
    }

    /// Resize the field to match a new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (surface_w, surface_h) = canvas::surface_size(canvas_width, canvas_height);
        if self.engine.agents.is_empty() && surface_w > 0.0 && surface_h > 0.0 {
            // A field that started degenerate gets its first real layout now
            let settings = self.engine.settings.clone();
            self.engine = FieldEngine::new(surface_w, surface_h, settings);
            self.game = CaptureGame::new(self.engine.agents.len());
        } else {
            self.engine.resize(surface_w, surface_h);
        }
    }

    /// Abort any celebration in progress and start a fresh round. Rebuilds
    /// the field when the configured agent count changed.
    pub fn reset_round(&mut self) {
        self.celebration.reset();
        let wanted = self
            .engine
            .settings
            .agent_count
            .min(self.engine.settings.grid_capacity());
        if wanted != self.engine.agents.len() {
            let settings = self.engine.settings.clone();
            self.engine = FieldEngine::new(self.engine.width, self.engine.height, settings);
            self.game = CaptureGame::new(self.engine.agents.len());
        } else {
            self.engine.reset_round();
            self.game.reset();
        }
        self.fade_opacity = 1.0;
        self.counter_anchor = None;
    }

    /// Replace the settings wholesale (preset application) and restart
    pub fn apply_settings(&mut self, settings: EngineSettings) {
        self.engine = FieldEngine::new(self.engine.width, self.engine.height, settings);
        self.game = CaptureGame::new(self.engine.agents.len());
        self.celebration.reset();
        self.fade_opacity = 1.0;
        self.counter_anchor = None;
        self.connections.clear();
    }

    /// Cycle through built-in and user presets
    pub fn cycle_preset(&mut self, dir: i32) {
        let count = self.presets.all_presets().count();
        if count == 0 {
            return;
        }
        let idx = match self.preset_idx {
            Some(i) => (i as i32 + dir).rem_euclid(count as i32) as usize,
            None => {
                if dir >= 0 {
                    0
                } else {
                    count - 1
                }
            }
        };
        self.preset_idx = Some(idx);
        let preset = self.presets.all_presets().nth(idx).cloned();
        if let Some(preset) = preset {
            self.apply_settings(preset.settings);
            self.set_notice(format!("{}: {}", preset.name, preset.description));
        }
    }

    pub fn set_notice(&mut self, text: String) {
        self.notice = Some((text, NOTICE_TTL));
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Agents => {
                self.engine.settings.adjust_agent_count(5);
                self.set_notice("agent count applies on reset (R)".to_string());
            }
            Focus::Attract => self.engine.settings.adjust_attract_gain(0.005),
            Focus::Capture => self.engine.settings.adjust_capture_radius(5.0),
            Focus::Connect => self.engine.settings.adjust_connection_radius(10.0),
            Focus::Far => self.engine.settings.adjust_far_threshold(10.0),
            Focus::Follow => self.engine.settings.adjust_follow_gain(0.25),
            Focus::Near => self.engine.settings.adjust_near_threshold(10.0),
            Focus::Repulse => self.engine.settings.adjust_repulse_gain(0.01),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Agents => {
                self.engine.settings.adjust_agent_count(-5);
                self.set_notice("agent count applies on reset (R)".to_string());
            }
            Focus::Attract => self.engine.settings.adjust_attract_gain(-0.005),
            Focus::Capture => self.engine.settings.adjust_capture_radius(-5.0),
            Focus::Connect => self.engine.settings.adjust_connection_radius(-10.0),
            Focus::Far => self.engine.settings.adjust_far_threshold(-10.0),
            Focus::Follow => self.engine.settings.adjust_follow_gain(-0.25),
            Focus::Near => self.engine.settings.adjust_near_threshold(-10.0),
            Focus::Repulse => self.engine.settings.adjust_repulse_gain(-0.01),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }
}
