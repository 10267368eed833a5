use crate::effects::{BurstParams, EffectSink, BURST_PALETTE};
use crate::scheduler::TaskQueue;
use crate::settings::EngineSettings;
use crate::vec2::Vec2;

/// Where the celebration currently is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Bursting,
    FadingOut,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Phase::Idle => "Idle",
            Phase::Bursting => "Bursting",
            Phase::FadingOut => "Fading",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Burst,
    RestoreOpacity,
    BeginFade,
    FinishReset,
}

/// The win sequence: a timer cascade of burst effects and opacity/flag
/// changes, ending in an automatic round reset.
///
/// All timing goes through the [`TaskQueue`], driven by the caller's clock;
/// nothing here touches wall time, and dropping the controller cancels any
/// pending steps.
#[derive(Debug, Clone)]
pub struct Celebration {
    phase: Phase,
    /// True while captures count and captured agents chase the pointer;
    /// cleared for the fade-out tail of the celebration.
    pub round_active: bool,
    /// Connection-grid opacity, dimmed while bursts run
    pub grid_opacity: f32,
    /// Drives the captured-agent fade during the celebration
    pub fade_out_captured: bool,
    steps: TaskQueue<Step>,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            round_active: true,
            grid_opacity: 1.0,
            fade_out_captured: false,
            steps: TaskQueue::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start the win sequence. A trigger while one is already running is
    /// ignored. Returns true when the trigger took effect.
    pub fn trigger(
        &mut self,
        now_ms: u64,
        s: &EngineSettings,
        sink: &mut dyn EffectSink,
        origin: Vec2,
    ) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Bursting;
        self.round_active = true;
        self.fade_out_captured = true;
        self.grid_opacity = s.celebration_grid_opacity;

        for &offset in &s.burst_offsets_ms {
            self.steps.schedule_at(now_ms + offset, Step::Burst);
        }
        self.steps
            .schedule_at(now_ms + s.opacity_restore_ms, Step::RestoreOpacity);
        self.steps
            .schedule_at(now_ms + s.complete_to_fade_ms, Step::BeginFade);
        self.steps.schedule_at(
            now_ms + s.complete_to_fade_ms + s.fade_to_reset_ms,
            Step::FinishReset,
        );

        // The zero-offset burst fires on the triggering call itself
        self.tick(now_ms, s, sink, origin);
        true
    }

    /// Run every step due at `now_ms`. Returns true when the sequence just
    /// finished and the capture game should be reset.
    pub fn tick(
        &mut self,
        now_ms: u64,
        s: &EngineSettings,
        sink: &mut dyn EffectSink,
        origin: Vec2,
    ) -> bool {
        let mut reset_due = false;
        for step in self.steps.drain_due(now_ms) {
            match step {
                Step::Burst => sink.burst(BurstParams {
                    count: s.burst_count,
                    spread_deg: s.burst_spread,
                    origin,
                    palette: &BURST_PALETTE,
                }),
                Step::RestoreOpacity => self.grid_opacity = 1.0,
                Step::BeginFade => {
                    self.phase = Phase::FadingOut;
                    self.round_active = false;
                }
                Step::FinishReset => {
                    self.phase = Phase::Idle;
                    self.round_active = true;
                    self.grid_opacity = 1.0;
                    self.fade_out_captured = false;
                    reset_due = true;
                }
            }
        }
        reset_due
    }

    /// Abort the sequence and return to a clean idle state (manual reset)
    pub fn reset(&mut self) {
        self.steps.clear();
        self.phase = Phase::Idle;
        self.round_active = true;
        self.grid_opacity = 1.0;
        self.fade_out_captured = false;
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
