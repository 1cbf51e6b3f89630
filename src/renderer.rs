use crate::config::Palette;
use crate::font::{text_width, GLYPH_HEIGHT};
use crate::game::{GameState, GameStatus};
use crate::grid::GridMapper;
use crate::surface::Surface;

const SCORE_ORIGIN: (i32, i32) = (10, 10);
const PAUSE_BOX: (i32, i32) = (100, 40);
const GAME_OVER_BOX: (i32, i32) = (160, 60);
const LINE_SPACING: i32 = 8;

/// Scene flags that are not part of the game state.
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions<'a> {
    pub palette: &'a Palette,
    pub show_grid: bool,
}

/// Redraws the full scene from immutable state.
pub fn render(
    surface: &mut Surface,
    mapper: &GridMapper,
    state: &GameState,
    options: SceneOptions<'_>,
) {
    let palette = options.palette;
    surface.clear(palette.background);

    if options.show_grid {
        mapper.draw_grid_lines(surface, palette.grid);
    }

    render_snake(surface, mapper, state, palette);
    mapper.draw_cell_bordered(surface, state.food, palette.food, palette.food_border);

    let (x, y) = SCORE_ORIGIN;
    surface.draw_string(x, y, &format!("SCORE: {}", state.score), palette.text);

    match state.status {
        GameStatus::Paused => render_overlay(surface, PAUSE_BOX, &["PAUSED"], palette),
        GameStatus::Over => render_overlay(
            surface,
            GAME_OVER_BOX,
            &["GAME OVER", "PRESS R TO RESTART"],
            palette,
        ),
        GameStatus::Running => {}
    }
}

fn render_snake(surface: &mut Surface, mapper: &GridMapper, state: &GameState, palette: &Palette) {
    for (index, segment) in state.snake.segments().enumerate() {
        let color = if index == 0 {
            palette.snake_head
        } else {
            palette.snake_body
        };
        mapper.draw_cell(surface, *segment, color);
    }
}

/// Draws a box centered on the surface with each line centered inside it.
fn render_overlay(
    surface: &mut Surface,
    (width, height): (i32, i32),
    lines: &[&str],
    palette: &Palette,
) {
    let center_x = i32::try_from(surface.width() / 2).unwrap_or(0);
    let center_y = i32::try_from(surface.height() / 2).unwrap_or(0);
    surface.fill_rect(
        center_x - width / 2,
        center_y - height / 2,
        width,
        height,
        palette.overlay,
    );

    let line_count = i32::try_from(lines.len()).unwrap_or(0);
    let block_height = line_count * GLYPH_HEIGHT + (line_count - 1).max(0) * LINE_SPACING;
    let mut y = center_y - block_height / 2;
    for line in lines {
        surface.draw_string(center_x - text_width(line) / 2, y, line, palette.text);
        y += GLYPH_HEIGHT + LINE_SPACING;
    }
}
