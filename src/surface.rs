use crate::color::Rgb565;
use crate::font::{glyph, GLYPH_HEIGHT, GLYPH_WIDTH};

/// A fixed-size RGB565 pixel buffer with clipped drawing primitives.
///
/// With double buffering enabled every primitive targets an off-screen
/// buffer and [`Surface::present`] copies it to the visible buffer in one
/// bulk copy. Without it, primitives write the visible buffer directly.
#[derive(Debug, Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    visible: Vec<Rgb565>,
    back: Option<Vec<Rgb565>>,
}

impl Surface {
    /// Creates a black, single-buffered surface.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            visible: vec![Rgb565::BLACK; width * height],
            back: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Enables or disables the off-screen buffer. Enabling starts from black.
    pub fn set_double_buffer(&mut self, enabled: bool) {
        self.back = enabled.then(|| vec![Rgb565::BLACK; self.width * self.height]);
    }

    #[must_use]
    pub fn is_double_buffered(&self) -> bool {
        self.back.is_some()
    }

    /// Copies the off-screen buffer to the visible one. No-op when single-buffered.
    pub fn present(&mut self) {
        if let Some(back) = &self.back {
            self.visible.copy_from_slice(back);
        }
    }

    /// Pixels currently on screen, row-major.
    #[must_use]
    pub fn visible(&self) -> &[Rgb565] {
        &self.visible
    }

    /// Reads one visible pixel.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        let index = self.index_of(x, y)?;
        Some(self.visible[index])
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        self.plot(i64::from(x), i64::from(y), color);
    }

    /// Fills the part of the rectangle that overlaps the surface.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565) {
        if width <= 0 || height <= 0 {
            return;
        }

        let (x, y) = (i64::from(x), i64::from(y));
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = (x + i64::from(width)).min(self.width as i64);
        let end_y = (y + i64::from(height)).min(self.height as i64);
        if start_x >= end_x || start_y >= end_y {
            return;
        }

        let stride = self.width;
        let (start_x, end_x) = (start_x as usize, end_x as usize);
        let target = self.target_mut();
        for row in start_y as usize..end_y as usize {
            let offset = row * stride;
            target[offset + start_x..offset + end_x].fill(color);
        }
    }

    /// Draws a 1-pixel border just inside the rectangle.
    pub fn outline_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565) {
        self.fill_rect(x, y, width, 1, color);
        self.fill_rect(x, y.saturating_add(height - 1), width, 1, color);
        self.fill_rect(x, y, 1, height, color);
        self.fill_rect(x.saturating_add(width - 1), y, 1, height, color);
    }

    pub fn hline(&mut self, x: i32, y: i32, width: i32, color: Rgb565) {
        self.fill_rect(x, y, width, 1, color);
    }

    pub fn vline(&mut self, x: i32, y: i32, height: i32, color: Rgb565) {
        self.fill_rect(x, y, 1, height, color);
    }

    /// Midpoint circle outline.
    pub fn draw_circle(&mut self, center_x: i32, center_y: i32, radius: i32, color: Rgb565) {
        if radius < 0 || !self.box_overlaps(center_x, center_y, radius) {
            return;
        }

        let (cx, cy) = (i64::from(center_x), i64::from(center_y));
        let mut x: i64 = 0;
        let mut y = i64::from(radius);
        let mut decision = 3 - 2 * y;

        while x <= y {
            for (dx, dy) in [(x, y), (y, x)] {
                self.plot(cx + dx, cy + dy, color);
                self.plot(cx - dx, cy + dy, color);
                self.plot(cx + dx, cy - dy, color);
                self.plot(cx - dx, cy - dy, color);
            }

            if decision < 0 {
                decision += 4 * x + 6;
            } else {
                decision += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
    }

    /// Fills every pixel within `radius` of the center. Only rows and columns
    /// on the surface are visited.
    pub fn fill_circle(&mut self, center_x: i32, center_y: i32, radius: i32, color: Rgb565) {
        if radius < 0 || !self.box_overlaps(center_x, center_y, radius) {
            return;
        }

        let (cx, cy, r) = (i64::from(center_x), i64::from(center_y), i64::from(radius));
        let radius_sq = i128::from(r) * i128::from(r);
        let first_row = (cy - r).max(0);
        let last_row = (cy + r).min(self.height as i64 - 1);
        let first_col = (cx - r).max(0);
        let last_col = (cx + r).min(self.width as i64 - 1);

        for py in first_row..=last_row {
            let dy = i128::from(py - cy);
            for px in first_col..=last_col {
                let dx = i128::from(px - cx);
                if dx * dx + dy * dy <= radius_sq {
                    self.plot(px, py, color);
                }
            }
        }
    }

    pub fn clear(&mut self, color: Rgb565) {
        self.target_mut().fill(color);
    }

    /// Draws one character. Characters without a glyph leave the surface untouched.
    pub fn draw_glyph(&mut self, x: i32, y: i32, ch: char, color: Rgb565) {
        let Some(rows) = glyph(ch) else {
            return;
        };

        let (x, y) = (i64::from(x), i64::from(y));
        if x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        if x + i64::from(GLYPH_WIDTH) <= 0 || y + i64::from(GLYPH_HEIGHT) <= 0 {
            return;
        }

        for (row, bits) in (0..GLYPH_HEIGHT).zip(rows.iter()) {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x80 >> col) != 0 {
                    self.plot(x + i64::from(col), y + i64::from(row), color);
                }
            }
        }
    }

    /// Draws `text` left to right on a single line.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Rgb565) {
        let mut pen_x = x;
        for ch in text.chars() {
            self.draw_glyph(pen_x, y, ch, color);
            pen_x = pen_x.saturating_add(GLYPH_WIDTH);
        }
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.index_of_wide(i64::from(x), i64::from(y))
    }

    fn index_of_wide(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// `draw_pixel` on widened coordinates, for offsets that may leave `i32`.
    fn plot(&mut self, x: i64, y: i64, color: Rgb565) {
        if let Some(index) = self.index_of_wide(x, y) {
            self.target_mut()[index] = color;
        }
    }

    /// Whether the square of side `2r + 1` around the center touches the surface.
    fn box_overlaps(&self, center_x: i32, center_y: i32, radius: i32) -> bool {
        let (cx, cy, r) = (i64::from(center_x), i64::from(center_y), i64::from(radius));
        cx + r >= 0 && cy + r >= 0 && cx - r < self.width as i64 && cy - r < self.height as i64
    }

    fn target_mut(&mut self) -> &mut [Rgb565] {
        match &mut self.back {
            Some(back) => back,
            None => &mut self.visible,
        }
    }
}
