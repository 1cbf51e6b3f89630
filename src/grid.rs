use crate::color::Rgb565;
use crate::config::GridSize;
use crate::snake::Position;
use crate::surface::Surface;

/// Maps logical grid cells onto surface pixels.
///
/// The cell size is `surface width / grid width`. The surface dimensions
/// must be exact multiples of the grid; configuration validation enforces
/// that, so no check happens here.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridMapper {
    bounds: GridSize,
    cell_size: i32,
}

impl GridMapper {
    #[must_use]
    pub fn new(surface_width: usize, bounds: GridSize) -> Self {
        let cells = usize::from(bounds.width.max(1));
        Self {
            bounds,
            cell_size: i32::try_from(surface_width / cells).unwrap_or(i32::MAX),
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Top-left pixel of a cell.
    #[must_use]
    pub fn cell_to_pixel(&self, position: Position) -> (i32, i32) {
        (
            position.x.saturating_mul(self.cell_size),
            position.y.saturating_mul(self.cell_size),
        )
    }

    /// Fills a cell inset by one pixel on each side, leaving a 1px gap.
    pub fn draw_cell(&self, surface: &mut Surface, position: Position, color: Rgb565) {
        let (x, y) = self.cell_to_pixel(position);
        let inner = self.cell_size - 2;
        surface.fill_rect(x.saturating_add(1), y.saturating_add(1), inner, inner, color);
    }

    /// Draws the full-cell outline in `border`, then the inset fill.
    pub fn draw_cell_bordered(
        &self,
        surface: &mut Surface,
        position: Position,
        fill: Rgb565,
        border: Rgb565,
    ) {
        let (x, y) = self.cell_to_pixel(position);
        surface.outline_rect(x, y, self.cell_size, self.cell_size, border);
        self.draw_cell(surface, position, fill);
    }

    /// Draws the grid lines on every cell boundary, both outer edges included.
    pub fn draw_grid_lines(&self, surface: &mut Surface, color: Rgb565) {
        let width = i32::from(self.bounds.width).saturating_mul(self.cell_size);
        let height = i32::from(self.bounds.height).saturating_mul(self.cell_size);

        for column in 0..=i32::from(self.bounds.width) {
            surface.vline(column.saturating_mul(self.cell_size), 0, height, color);
        }
        for row in 0..=i32::from(self.bounds.height) {
            surface.hline(0, row.saturating_mul(self.cell_size), width, color);
        }
    }
}
