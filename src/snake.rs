use crate::config::{GridSize, MAX_SNAKE_LENGTH};
use crate::input::{direction_change_is_valid, Direction};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step along `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
        }
    }
}

/// Snake body stored in fixed capacity, head first.
///
/// `capacity` is the logical limit for the current board (its cell count)
/// and never exceeds the storage capacity [`MAX_SNAKE_LENGTH`].
#[derive(Debug, Clone)]
pub struct Snake {
    body: heapless::Vec<Position, MAX_SNAKE_LENGTH>,
    capacity: usize,
    direction: Direction,
    next_direction: Direction,
}

impl Snake {
    /// Lays out `length` cells facing right, head at the board center and
    /// the body trailing left.
    #[must_use]
    pub fn centered(bounds: GridSize, length: usize) -> Self {
        let center = Position::new(i32::from(bounds.width / 2), i32::from(bounds.height / 2));
        let capacity = bounds.total_cells().clamp(1, MAX_SNAKE_LENGTH);

        let mut body = heapless::Vec::new();
        for offset in (0..length.clamp(1, capacity)).filter_map(|i| i32::try_from(i).ok()) {
            let _ = body.push(Position::new(center.x - offset, center.y));
        }

        Self {
            body,
            capacity,
            direction: Direction::Right,
            next_direction: Direction::Right,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Segments beyond `capacity` are dropped.
    #[must_use]
    pub fn from_segments(segments: &[Position], direction: Direction, capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_SNAKE_LENGTH);
        let mut body = heapless::Vec::new();
        for segment in segments.iter().take(capacity) {
            let _ = body.push(*segment);
        }

        Self {
            body,
            capacity,
            direction,
            next_direction: direction,
        }
    }

    /// Stores `direction` for the next tick unless it reverses the committed
    /// direction. Returns whether it was accepted.
    pub fn set_next_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.next_direction = direction;
        true
    }

    /// Makes the pending direction current.
    pub fn commit_direction(&mut self) {
        self.direction = self.next_direction;
    }

    /// Returns the head position one step along the committed direction.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().stepped(self.direction)
    }

    /// Moves every segment one slot toward the tail and puts `new_head` in
    /// front. With `grow` set and room left, the old tail is kept, so the
    /// snake ends up one segment longer.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        let len = self.body.len();
        if len == 0 {
            let _ = self.body.push(new_head);
            return;
        }

        if grow && len < self.capacity {
            let tail = self.body[len - 1];
            let _ = self.body.push(tail);
        }

        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = new_head;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body.first().copied().unwrap_or(Position::new(0, 0))
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if a segment other than the head occupies `position`.
    #[must_use]
    pub fn body_occupies(&self, position: Position) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.body.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the committed movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction the next tick will commit.
    #[must_use]
    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::input::Direction;

    use super::{Position, Snake};

    const BOARD: GridSize = GridSize {
        width: 10,
        height: 10,
    };

    fn segments(snake: &Snake) -> Vec<Position> {
        snake.segments().copied().collect()
    }

    #[test]
    fn centered_snake_trails_left_of_the_head() {
        let snake = Snake::centered(BOARD, 3);

        assert_eq!(
            segments(&snake),
            vec![
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5)
            ]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.capacity(), 100);
    }

    #[test]
    fn advance_shifts_segments_toward_the_tail() {
        let mut snake = Snake::centered(BOARD, 3);

        snake.advance(Position::new(6, 5), false);

        assert_eq!(
            segments(&snake),
            vec![
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(4, 5)
            ]
        );
    }

    #[test]
    fn growth_keeps_previous_tail() {
        let mut snake = Snake::centered(BOARD, 3);

        snake.advance(Position::new(6, 5), true);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.segments().last(), Some(&Position::new(3, 5)));
    }

    #[test]
    fn growth_is_capped_at_capacity() {
        let mut snake = Snake::from_segments(
            &[Position::new(1, 0), Position::new(0, 0)],
            Direction::Right,
            2,
        );

        snake.advance(Position::new(2, 0), true);

        assert!(snake.is_full());
        assert_eq!(
            segments(&snake),
            vec![Position::new(2, 0), Position::new(1, 0)]
        );
    }

    #[test]
    fn reversal_is_rejected_and_last_valid_direction_wins() {
        let mut snake = Snake::centered(BOARD, 3);

        assert!(!snake.set_next_direction(Direction::Left));
        assert!(snake.set_next_direction(Direction::Up));
        assert!(snake.set_next_direction(Direction::Down));
        snake.commit_direction();

        assert_eq!(snake.direction(), Direction::Down);
        assert_eq!(snake.next_head_position(), Position::new(5, 6));
    }

    #[test]
    fn body_occupancy_excludes_the_head() {
        let snake = Snake::centered(BOARD, 3);

        assert!(snake.occupies(Position::new(5, 5)));
        assert!(!snake.body_occupies(Position::new(5, 5)));
        assert!(snake.body_occupies(Position::new(3, 5)));
    }

    #[test]
    fn bounds_check_rejects_every_edge() {
        assert!(Position::new(0, 0).is_within_bounds(BOARD));
        assert!(Position::new(9, 9).is_within_bounds(BOARD));
        assert!(!Position::new(-1, 0).is_within_bounds(BOARD));
        assert!(!Position::new(0, -1).is_within_bounds(BOARD));
        assert!(!Position::new(10, 0).is_within_bounds(BOARD));
        assert!(!Position::new(0, 10).is_within_bounds(BOARD));
    }
}
