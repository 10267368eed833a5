use crate::vec2::Vec2;
use ratatui::style::Color;

/// Braille dot canvas for high-resolution terminal graphics.
/// Each Braille character covers a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Draw layers, low to high; a higher layer wins the cell's color
pub const LAYER_LINE: u8 = 0;
pub const LAYER_AGENT: u8 = 1;
pub const LAYER_CAPTURED: u8 = 2;
pub const LAYER_SPARK: u8 = 3;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Accumulates dots, line segments, and discs in surface coordinates
/// (2 dots per cell horizontally, 4 vertically), then emits colored cells.
pub struct BrailleCanvas {
    width_cells: u16,
    height_cells: u16,
    pattern: Vec<u8>,
    layer: Vec<u8>,
    color: Vec<Color>,
}

impl BrailleCanvas {
    pub fn new(width_cells: u16, height_cells: u16) -> Self {
        let cells = width_cells as usize * height_cells as usize;
        Self {
            width_cells,
            height_cells,
            pattern: vec![0; cells],
            layer: vec![0; cells],
            color: vec![Color::Reset; cells],
        }
    }

    /// Plot one dot at surface coordinates. Out-of-bounds dots are ignored.
    pub fn dot(&mut self, x: f32, y: f32, layer: u8, color: Color) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let ix = x as usize;
        let iy = y as usize;
        if ix >= self.width_cells as usize * 2 || iy >= self.height_cells as usize * 4 {
            return;
        }
        let cell = (iy / 4) * self.width_cells as usize + ix / 2;
        if self.pattern[cell] == 0 || layer >= self.layer[cell] {
            self.layer[cell] = layer;
            self.color[cell] = color;
        }
        self.pattern[cell] |= BRAILLE_DOTS[ix % 2][iy % 4];
    }

    /// Plot a line segment between two surface points (Bresenham over dots)
    pub fn line(&mut self, a: Vec2, b: Vec2, layer: u8, color: Color) {
        let mut x0 = a.x.round() as i64;
        let mut y0 = a.y.round() as i64;
        let x1 = b.x.round() as i64;
        let y1 = b.y.round() as i64;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.dot(x0 as f32, y0 as f32, layer, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Plot a filled disc centered on a surface point
    pub fn disc(&mut self, center: Vec2, radius: f32, layer: u8, color: Color) {
        let r = radius.max(0.5);
        let r_sq = r * r;
        let span = r.ceil() as i32;
        for dy in -span..=span {
            for dx in -span..=span {
                if (dx * dx + dy * dy) as f32 <= r_sq {
                    self.dot(center.x + dx as f32, center.y + dy as f32, layer, color);
                }
            }
        }
    }

    /// Emit every non-empty cell as a Braille character
    pub fn cells(&self) -> Vec<BrailleCell> {
        let mut out = Vec::new();
        for cy in 0..self.height_cells {
            for cx in 0..self.width_cells {
                let idx = cy as usize * self.width_cells as usize + cx as usize;
                let pattern = self.pattern[idx];
                if pattern != 0 {
                    let ch = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    out.push(BrailleCell {
                        x: cx,
                        y: cy,
                        char: ch,
                        color: self.color[idx],
                    });
                }
            }
        }
        out
    }
}

/// Surface dimensions (in dots) for a canvas of the given cell size
pub fn surface_size(width_cells: u16, height_cells: u16) -> (f32, f32) {
    (
        (width_cells as usize * 2) as f32,
        (height_cells as usize * 4) as f32,
    )
}

/// Gray shade for a 0..1 intensity, gamma-lifted so faint lines stay visible
pub fn shade(intensity: f32) -> Color {
    let value = (intensity.clamp(0.0, 1.0).sqrt() * 255.0) as u8;
    Color::Rgb(value, value, value)
}
