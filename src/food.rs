use rand::Rng;
use tracing::debug;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Picks a random cell for food, trying up to `attempts` samples.
///
/// The first sample not covered by the snake wins. When every sample lands
/// on the snake the last one is used anyway, so placement always terminates
/// even on a nearly full board.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    attempts: u32,
) -> Position {
    let mut candidate = random_cell(rng, bounds);

    for _ in 1..attempts.max(1) {
        if !snake.occupies(candidate) {
            return candidate;
        }
        candidate = random_cell(rng, bounds);
    }

    if snake.occupies(candidate) {
        debug!(
            x = candidate.x,
            y = candidate.y,
            attempts,
            "no free cell found for food; placing on the snake"
        );
    }

    candidate
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> Position {
    Position::new(
        rng.gen_range(0..i32::from(bounds.width.max(1))),
        rng.gen_range(0..i32::from(bounds.height.max(1))),
    )
}
