use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::color::Rgb565;
use crate::driver::FrameSink;
use crate::surface::Surface;

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "\u{2580}";

/// Owns terminal lifecycle (raw mode + alternate screen) for one game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = restore_terminal();
                Err(error)
            }
        }
    }
}

impl FrameSink for TerminalSession {
    type Error = io::Error;

    fn show(&mut self, surface: &Surface) -> io::Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(FramebufferView::new(surface), area);
        })?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Leaves raw mode and the alternate screen. Safe to call more than once,
/// including from a panic hook.
pub fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Draws the visible framebuffer downscaled into half-block cells, centered
/// in the target area. Each terminal cell shows two vertically stacked
/// samples.
pub struct FramebufferView<'a> {
    surface: &'a Surface,
}

impl<'a> FramebufferView<'a> {
    #[must_use]
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }
}

impl Widget for FramebufferView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = (self.surface.width(), self.surface.height());
        let scale = downscale_factor(width, height, area.width, area.height);

        let columns = width.div_ceil(scale).min(usize::from(area.width));
        let rows = height.div_ceil(scale * 2).min(usize::from(area.height));
        let left = area.x + centering_offset(area.width, columns);
        let top = area.y + centering_offset(area.height, rows);

        for row in 0..rows {
            for column in 0..columns {
                let upper = sample(self.surface, scale, column, row * 2);
                let lower = sample(self.surface, scale, column, row * 2 + 1);

                let (Ok(x), Ok(y)) = (u16::try_from(column), u16::try_from(row)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((left + x, top + y)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(terminal_color(upper))
                        .set_bg(terminal_color(lower));
                }
            }
        }
    }
}

/// Smallest integer factor that fits `width × height` pixels into
/// `columns × rows` half-block cells. Never below 1.
#[must_use]
pub fn downscale_factor(width: usize, height: usize, columns: u16, rows: u16) -> usize {
    let columns = usize::from(columns.max(1));
    let pixel_rows = usize::from(rows.max(1)) * 2;

    width
        .div_ceil(columns)
        .max(height.div_ceil(pixel_rows))
        .max(1)
}

/// Reads the pixel at the middle of the `scale × scale` block at
/// (`column`, `pixel_row`) in downscaled coordinates. Blocks hanging off
/// the surface read as black.
#[must_use]
pub fn sample(surface: &Surface, scale: usize, column: usize, pixel_row: usize) -> Rgb565 {
    let x = column * scale + scale / 2;
    let y = pixel_row * scale + scale / 2;

    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => surface.pixel(x, y).unwrap_or(Rgb565::BLACK),
        _ => Rgb565::BLACK,
    }
}

#[must_use]
pub fn terminal_color(color: Rgb565) -> Color {
    let (r, g, b) = color.to_rgb888();
    Color::Rgb(r, g, b)
}

fn centering_offset(available: u16, used: usize) -> u16 {
    let used = u16::try_from(used).unwrap_or(available);
    available.saturating_sub(used) / 2
}
