use ratatui::prelude::*;

/// Braille dot positions within a 2x4 cell:
/// (0,0)=0x01 (1,0)=0x08
/// (0,1)=0x02 (1,1)=0x10
/// (0,2)=0x04 (1,2)=0x20
/// (0,3)=0x40 (1,3)=0x80
pub const DOT_MAP: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

pub type Rgb = (u8, u8, u8);

/// A canvas for sub-character braille rendering.
/// Each terminal character cell maps to a 2x4 grid of dots; every dot
/// remembers the color it was last drawn with.
pub struct BrailleCanvas {
    pub grid: Vec<Option<Rgb>>,
    pub grid_w: usize,
    pub grid_h: usize,
    char_w: usize,
    char_h: usize,
}

impl BrailleCanvas {
    /// Create a new braille canvas for the given character dimensions.
    pub fn new(char_w: usize, char_h: usize) -> Self {
        let grid_w = char_w * 2;
        let grid_h = char_h * 4;
        Self {
            grid: vec![None; grid_w * grid_h],
            grid_w,
            grid_h,
            char_w,
            char_h,
        }
    }

    /// Set a single dot on the braille grid (bounds-checked).
    #[inline]
    pub fn set(&mut self, gx: isize, gy: isize, color: Rgb) {
        if gx >= 0 && gy >= 0 && (gx as usize) < self.grid_w && (gy as usize) < self.grid_h {
            self.grid[gy as usize * self.grid_w + gx as usize] = Some(color);
        }
    }

    /// Plot at fractional coordinates, rounding to the nearest dot.
    pub fn point(&mut self, x: f64, y: f64, color: Rgb) {
        if self.near_grid(x, y, 0.0) {
            self.set(x.round() as isize, y.round() as isize, color);
        }
    }

    fn near_grid(&self, x: f64, y: f64, margin: f64) -> bool {
        x.is_finite()
            && y.is_finite()
            && x >= -margin - 1.0
            && y >= -margin - 1.0
            && x <= self.grid_w as f64 + margin
            && y <= self.grid_h as f64 + margin
    }

    /// Clip a segment to the grid (Liang-Barsky). `None` when nothing of it
    /// is visible or an endpoint is not finite.
    fn clip(&self, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (xmax, ymax) = (self.grid_w as f64 - 0.5, self.grid_h as f64 - 0.5);
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for (p, q) in [
            (-dx, from.0 + 0.5),
            (dx, xmax - from.0),
            (-dy, from.1 + 0.5),
            (dy, ymax - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((
            (from.0 + t0 * dx, from.1 + t0 * dy),
            (from.0 + t1 * dx, from.1 + t1 * dy),
        ))
    }

    /// Draw a line using Bresenham's algorithm, clipped to the grid first so
    /// the cost is bounded by the canvas size.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };
        let mut x0 = from.0.round() as isize;
        let mut y0 = from.1.round() as isize;
        let x1 = to.0.round() as isize;
        let y1 = to.1.round() as isize;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: isize = if x0 < x1 { 1 } else { -1 };
        let sy: isize = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x0, y0, color);

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

    pub fn polyline(&mut self, points: &[(f64, f64)], color: Rgb) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
        if let [only] = points {
            self.point(only.0, only.1, color);
        }
    }

    /// Filled square of side `2·half + 1` dots.
    pub fn blot(&mut self, x: f64, y: f64, half: isize, color: Rgb) {
        if !self.near_grid(x, y, half as f64) {
            return;
        }
        let cx = x.round() as isize;
        let cy = y.round() as isize;
        for gy in cy - half..=cy + half {
            for gx in cx - half..=cx + half {
                self.set(gx, gy, color);
            }
        }
    }

    /// Encode braille grid to characters and write to the frame buffer.
    /// A cell takes the color of the last lit dot found in it.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        for cy in 0..self.char_h.min(area.height as usize) {
            for cx in 0..self.char_w.min(area.width as usize) {
                let mut braille: u8 = 0;
                let mut color = None;

                for (dx, col) in DOT_MAP.iter().enumerate() {
                    for (dy, &bit) in col.iter().enumerate() {
                        let gx = cx * 2 + dx;
                        let gy = cy * 4 + dy;
                        if let Some(dot) = self.grid[gy * self.grid_w + gx] {
                            braille |= bit;
                            color = Some(dot);
                        }
                    }
                }

                if let Some((r, g, b)) = color {
                    let ch = char::from_u32(0x2800 + braille as u32).unwrap_or(' ');
                    let cell = frame
                        .buffer_mut()
                        .cell_mut((area.x + cx as u16, area.y + cy as u16));
                    if let Some(cell) = cell {
                        cell.set_char(ch);
                        cell.set_fg(Color::Rgb(r, g, b));
                    }
                }
            }
        }
    }
}
