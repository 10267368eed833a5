use crate::vec2::Vec2;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;

/// Celebration palette for burst sparks
pub const BURST_PALETTE: [Color; 5] = [
    Color::Rgb(0x9b, 0x87, 0xf5),
    Color::Rgb(0xd9, 0x46, 0xef),
    Color::Rgb(0xf9, 0x73, 0x16),
    Color::Rgb(0x0e, 0xa5, 0xe9),
    Color::Rgb(0x8b, 0x5c, 0xf6),
];

/// One fire-and-forget celebratory burst
#[derive(Debug, Clone)]
pub struct BurstParams {
    pub count: usize,
    /// Cone width in degrees, centered on straight up
    pub spread_deg: f32,
    pub origin: Vec2,
    pub palette: &'static [Color],
}

/// Consumer of celebration bursts. The engine side only ever calls
/// `burst`; what the sink does with it is its own business.
pub trait EffectSink {
    fn burst(&mut self, params: BurstParams);
}

const SPARK_GRAVITY: f32 = 0.08;
const SPARK_DRAG: f32 = 0.02;

/// A short-lived burst spark with simple ballistic motion
#[derive(Debug, Clone)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub life: u32,
}

impl Spark {
    /// Advance one tick. Returns false once expired.
    fn tick(&mut self) -> bool {
        if self.life == 0 {
            return false;
        }
        self.life -= 1;
        self.vel.y += SPARK_GRAVITY;
        self.vel = self.vel * (1.0 - SPARK_DRAG);
        self.pos += self.vel;
        true
    }
}

/// Terminal-side effect sink: turns bursts into a pool of decaying sparks
/// that the canvas draws over the field.
pub struct SparkOverlay {
    sparks: Vec<Spark>,
    total_spawned: usize,
    rng: ThreadRng,
}

impl SparkOverlay {
    pub fn new() -> Self {
        Self {
            sparks: Vec::new(),
            total_spawned: 0,
            rng: rand::thread_rng(),
        }
    }

    /// Advance all sparks one tick and drop the expired ones
    pub fn tick(&mut self) {
        self.sparks.retain_mut(|spark| spark.tick());
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    /// Cumulative sparks spawned since startup
    pub fn total_spawned(&self) -> usize {
        self.total_spawned
    }
}

impl Default for SparkOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectSink for SparkOverlay {
    fn burst(&mut self, params: BurstParams) {
        let half_spread = params.spread_deg.to_radians() / 2.0;
        for _ in 0..params.count {
            let angle = -std::f32::consts::FRAC_PI_2
                + self.rng.gen_range(-half_spread..=half_spread);
            let speed = self.rng.gen_range(1.5..5.0);
            let color = params
                .palette
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(Color::White);
            self.sparks.push(Spark {
                pos: params.origin,
                vel: Vec2::from_angle(angle) * speed,
                color,
                life: self.rng.gen_range(20..50),
            });
        }
        self.total_spawned += params.count;
    }
}
